//! # Input Snapshot
//!
//! The host samples pointer and keyboard state once per frame and hands it to
//! the editor. Nothing here is event-driven; press/release edges are derived
//! by comparing consecutive snapshots.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keyboard modifiers held this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifiersState {
    /// Shift is held; reverses the rotate shortcut.
    pub shift: bool,
    /// Ctrl is held.
    pub ctrl: bool,
    /// Alt / Option is held.
    pub alt: bool,
    /// Meta / Command is held.
    pub meta: bool,
}

/// Mouse buttons held down this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MouseButtons {
    /// Left button: drags components, palette items and wires.
    pub left: bool,
    /// Right button is held. The editor ignores it.
    pub right: bool,
    /// Middle button: pans the view.
    pub middle: bool,
}

/// Keys the editor reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Delete,
    Backspace,
    Escape,
    /// Rotate the hovered component a quarter turn (counter-clockwise with shift).
    R,
}

/// Input state for a single frame.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InputState {
    /// Pointer position in view space (pixels).
    pub mouse_pos: Vec2,
    /// Buttons held this frame. Presses are derived against the previous frame.
    pub mouse_buttons: MouseButtons,
    /// Raw vertical scroll this frame, positive zooms in.
    pub scroll_delta: f32,
    /// Keyboard modifiers held this frame.
    pub modifiers: ModifiersState,
    /// Keys pressed this frame.
    pub pressed_keys: Vec<Key>,
    /// Size of the canvas viewport in pixels.
    pub screen_size: Vec2,
    /// False while the pointer is over host UI outside the canvas (a palette, a dialog).
    pub pointer_over_canvas: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            mouse_pos: Vec2::ZERO,
            mouse_buttons: MouseButtons::default(),
            scroll_delta: 0.0,
            modifiers: ModifiersState::default(),
            pressed_keys: Vec::new(),
            screen_size: Vec2::new(800.0, 600.0),
            pointer_over_canvas: true,
        }
    }
}

impl InputState {
    /// True if `key` is in this frame's `pressed_keys`.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.pressed_keys.contains(&key)
    }
}
