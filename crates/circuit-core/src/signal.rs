//! # Signal Values
//!
//! The values exchanged between pins are opaque to the engine. It only needs to
//! copy them along connections, compare them, and produce a zero value for
//! inputs that nothing drives yet.

use std::fmt::Debug;

/// A value carried by a pin.
///
/// `Default::default()` is the zero/falsy value assigned to every input until a
/// connection drives it.
pub trait Signal: Clone + PartialEq + Default + Debug + 'static {
    /// Whether the value counts as "on" for display purposes.
    ///
    /// Renderers use this to pick the active style for pins and wires.
    fn is_active(&self) -> bool;
}

impl Signal for bool {
    fn is_active(&self) -> bool {
        *self
    }
}

macro_rules! numeric_signal {
    ($($ty:ty),*) => {
        $(
            impl Signal for $ty {
                fn is_active(&self) -> bool {
                    *self != (0 as $ty)
                }
            }
        )*
    };
}

numeric_signal!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);
