//! # Components
//!
//! A component pairs an immutable [`ComponentDescriptor`] with per-instance state:
//! a fresh behavior object, fixed-length input/output value vectors and the
//! placement arguments (position, rotation, free-form extras).

use std::f32::consts::FRAC_PI_2;
use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::signal::Signal;
use crate::workspace::{ComponentId, PinDirection};

/// Number of input and output pins a behavior exposes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinCounts {
    pub inputs: usize,
    pub outputs: usize,
}

impl PinCounts {
    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }
}

/// Simulation behavior of a component.
///
/// `update` is called once per tick after propagation, so `inputs` always holds
/// values produced by the previous tick.
pub trait Simulatable<V: Signal> {
    /// Pin arity. Read once when the instance is created.
    fn pin_counts(&self) -> PinCounts;

    /// Value an output holds before the first tick.
    fn initial_output(&self, _index: usize) -> V {
        V::default()
    }

    /// Reads `inputs` and writes new values into `outputs`.
    fn update(&mut self, inputs: &[V], outputs: &mut [V]);
}

/// Shared factory producing fresh behavior state for every instance.
pub type BehaviorFactory<V> = Arc<dyn Fn() -> Box<dyn Simulatable<V>> + Send + Sync>;

/// Immutable description of a pluggable component type.
pub struct ComponentDescriptor<V: Signal> {
    /// Globally unique registry key.
    pub name: String,
    pub description: String,
    pub version: String,
    create: BehaviorFactory<V>,
}

impl<V: Signal> ComponentDescriptor<V> {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        create: F,
    ) -> Self
    where
        F: Fn() -> Box<dyn Simulatable<V>> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            create: Arc::new(create),
        }
    }

    /// Instantiates fresh behavior state.
    pub fn create(&self) -> Box<dyn Simulatable<V>> {
        (self.create)()
    }
}

impl<V: Signal> fmt::Debug for ComponentDescriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Placement arguments of a component instance.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentArgs {
    /// Workspace-space centre of the component.
    pub position: Vec2,
    /// Rotation in quarter turns (clockwise in screen space).
    #[serde(default)]
    pub rotation: i32,
    /// Anything else the editor or a plugin wants to attach.
    #[serde(default, flatten)]
    pub extra: Map<String, Value>,
}

impl ComponentArgs {
    /// Arguments placing a component at `position` with no rotation.
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, quarter_turns: i32) -> Self {
        self.rotation = quarter_turns.rem_euclid(4);
        self
    }

    /// Rotation angle in radians (`rotation * π/2`).
    pub fn rotation_radians(&self) -> f32 {
        self.rotation as f32 * FRAC_PI_2
    }
}

/// A live component inside a workspace.
pub struct ComponentInstance<V: Signal> {
    id: ComponentId,
    descriptor: Arc<ComponentDescriptor<V>>,
    behavior: Box<dyn Simulatable<V>>,
    pub(crate) inputs: Vec<V>,
    pub(crate) outputs: Vec<V>,
    pub args: ComponentArgs,
}

impl<V: Signal> ComponentInstance<V> {
    pub(crate) fn instantiate(
        id: ComponentId,
        descriptor: Arc<ComponentDescriptor<V>>,
        mut args: ComponentArgs,
    ) -> Self {
        args.rotation = args.rotation.rem_euclid(4);
        let behavior = descriptor.create();
        let counts = behavior.pin_counts();
        let inputs = vec![V::default(); counts.inputs];
        let outputs = (0..counts.outputs)
            .map(|index| behavior.initial_output(index))
            .collect();

        Self {
            id,
            descriptor,
            behavior,
            inputs,
            outputs,
            args,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Registry name of the component type.
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &Arc<ComponentDescriptor<V>> {
        &self.descriptor
    }

    pub fn inputs(&self) -> &[V] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[V] {
        &self.outputs
    }

    /// Mutable access to output values (e.g. an editor toggling a switch).
    ///
    /// Handed out as a slice so the arity cannot change.
    pub fn outputs_mut(&mut self) -> &mut [V] {
        &mut self.outputs
    }

    /// Value currently held by a pin, if the index is in range.
    pub fn pin_value(&self, direction: PinDirection, index: usize) -> Option<&V> {
        match direction {
            PinDirection::Input => self.inputs.get(index),
            PinDirection::Output => self.outputs.get(index),
        }
    }

    pub fn pin_count(&self, direction: PinDirection) -> usize {
        match direction {
            PinDirection::Input => self.inputs.len(),
            PinDirection::Output => self.outputs.len(),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.args.position
    }

    pub fn rotation(&self) -> i32 {
        self.args.rotation
    }

    pub fn behavior(&self) -> &dyn Simulatable<V> {
        self.behavior.as_ref()
    }

    pub fn behavior_mut(&mut self) -> &mut dyn Simulatable<V> {
        self.behavior.as_mut()
    }

    /// Runs the behavior against the current input snapshot.
    pub(crate) fn update(&mut self) {
        self.behavior.update(&self.inputs, &mut self.outputs);
    }
}

impl<V: Signal> fmt::Debug for ComponentInstance<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentInstance")
            .field("id", &self.id)
            .field("name", &self.descriptor.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
