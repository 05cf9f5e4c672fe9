//! # Workspace Graph
//!
//! The workspace owns component instances and the connections between their pins.
//! Storage follows a flat arena layout (`SlotMap`) with separate order vectors,
//! so ids stay stable across removals while iteration keeps insertion order.
//!
//! Invariant: an input pin has at most one incoming connection. Outputs fan out
//! freely, and connections from a component back into itself are allowed.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::{SlotMap, new_key_type};
use uuid::Uuid;

use crate::component::{ComponentArgs, ComponentDescriptor, ComponentInstance};
use crate::error::GraphError;
use crate::signal::Signal;

new_key_type! {
    /// Unique identifier for a component instance.
    pub struct ComponentId;
    /// Unique identifier for a connection.
    pub struct ConnectionId;
}

/// Stable identifier of a workspace, used to bind renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkspaceId(pub Uuid);

impl WorkspaceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WorkspaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinDirection {
    Input,
    Output,
}

impl PinDirection {
    pub fn opposite(self) -> Self {
        match self {
            PinDirection::Input => PinDirection::Output,
            PinDirection::Output => PinDirection::Input,
        }
    }
}

/// Address of a single pin: `(component, direction, index)`.
///
/// Pins are never addressed by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinInfo {
    pub component: ComponentId,
    pub direction: PinDirection,
    pub index: usize,
}

impl PinInfo {
    pub fn input(component: ComponentId, index: usize) -> Self {
        Self {
            component,
            direction: PinDirection::Input,
            index,
        }
    }

    pub fn output(component: ComponentId, index: usize) -> Self {
        Self {
            component,
            direction: PinDirection::Output,
            index,
        }
    }
}

/// A directed edge from an output pin to an input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub source: PinInfo,
    pub target: PinInfo,
}

impl Connection {
    /// True if either end sits on `component`.
    pub fn touches(&self, component: ComponentId) -> bool {
        self.source.component == component || self.target.component == component
    }

    /// True if either end is exactly `pin`.
    pub fn references(&self, pin: &PinInfo) -> bool {
        self.source == *pin || self.target == *pin
    }
}

/// The graph of components and connections for one editing session.
pub struct Workspace<V: Signal> {
    id: WorkspaceId,
    name: String,
    components: SlotMap<ComponentId, ComponentInstance<V>>,
    /// Insertion order, also the update order of the scheduler.
    order: Vec<ComponentId>,
    connections: SlotMap<ConnectionId, Connection>,
    connection_order: Vec<ConnectionId>,
    /// Input pin `(component, index)` → the connection driving it.
    drivers: HashMap<(ComponentId, usize), ConnectionId>,
}

impl<V: Signal> Workspace<V> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: WorkspaceId::new(),
            name: name.into(),
            components: SlotMap::with_key(),
            order: Vec::new(),
            connections: SlotMap::with_key(),
            connection_order: Vec::new(),
            drivers: HashMap::new(),
        }
    }

    pub fn id(&self) -> WorkspaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instantiates `descriptor` and appends it to the component order.
    ///
    /// Inputs start at the zero value; outputs take the behavior's initial values.
    pub fn add_component(
        &mut self,
        descriptor: &Arc<ComponentDescriptor<V>>,
        args: ComponentArgs,
    ) -> ComponentId {
        let id = self.components.insert_with_key(|key| {
            ComponentInstance::instantiate(key, Arc::clone(descriptor), args)
        });
        self.order.push(id);

        let component = &self.components[id];
        tracing::info!(
            workspace = %self.name,
            component = %descriptor.name,
            id = ?id,
            inputs = component.inputs.len(),
            outputs = component.outputs.len(),
            "Added component"
        );
        id
    }

    /// Removes a component together with every connection touching its pins.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<ComponentInstance<V>, GraphError> {
        let component = self
            .components
            .remove(id)
            .ok_or(GraphError::ComponentNotFound(id))?;
        self.order.retain(|&other| other != id);

        let doomed: HashSet<ConnectionId> = self
            .connections
            .iter()
            .filter(|(_, c)| c.touches(id))
            .map(|(cid, _)| cid)
            .collect();
        for &connection_id in &doomed {
            if let Some(connection) = self.connections.remove(connection_id) {
                self.drivers
                    .remove(&(connection.target.component, connection.target.index));
            }
        }
        self.connection_order.retain(|cid| !doomed.contains(cid));

        tracing::info!(
            workspace = %self.name,
            component = %component.name(),
            id = ?id,
            connections_removed = doomed.len(),
            "Removed component"
        );
        Ok(component)
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentInstance<V>> {
        self.components.get(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut ComponentInstance<V>> {
        self.components.get_mut(id)
    }

    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Components in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &ComponentInstance<V>> + '_ {
        self.order.iter().filter_map(|&id| self.components.get(id))
    }

    pub fn component_ids(&self) -> &[ComponentId] {
        &self.order
    }

    pub fn component_count(&self) -> usize {
        self.order.len()
    }

    pub fn component_position(&self, id: ComponentId) -> Option<Vec2> {
        self.components.get(id).map(|c| c.args.position)
    }

    /// Moves a component. Overlap with other components is not checked.
    pub fn set_component_position(&mut self, id: ComponentId, position: Vec2) -> Result<(), GraphError> {
        let component = self
            .components
            .get_mut(id)
            .ok_or(GraphError::ComponentNotFound(id))?;
        component.args.position = position;
        Ok(())
    }

    pub fn component_rotation(&self, id: ComponentId) -> Option<i32> {
        self.components.get(id).map(|c| c.args.rotation)
    }

    /// Sets rotation in quarter turns, normalised to `0..4`.
    pub fn set_component_rotation(&mut self, id: ComponentId, quarter_turns: i32) -> Result<(), GraphError> {
        let component = self
            .components
            .get_mut(id)
            .ok_or(GraphError::ComponentNotFound(id))?;
        component.args.rotation = quarter_turns.rem_euclid(4);
        Ok(())
    }

    pub fn rotate_component(&mut self, id: ComponentId, delta: i32) -> Result<i32, GraphError> {
        let current = self
            .component_rotation(id)
            .ok_or(GraphError::ComponentNotFound(id))?;
        let rotation = (current.rem_euclid(4) + delta.rem_euclid(4)).rem_euclid(4);
        self.set_component_rotation(id, rotation)?;
        Ok(rotation)
    }

    /// Connects an output pin to an input pin.
    ///
    /// There is no implicit replace: an input that already has a driver must be
    /// disconnected first.
    pub fn connect_pins(&mut self, source: PinInfo, target: PinInfo) -> Result<ConnectionId, GraphError> {
        if source.direction != PinDirection::Output || target.direction != PinDirection::Input {
            return Err(GraphError::InvalidDirection {
                from: source.direction,
                to: target.direction,
            });
        }
        self.validate_pin(&source)?;
        self.validate_pin(&target)?;

        if let Some(&existing) = self.drivers.get(&(target.component, target.index)) {
            tracing::debug!(workspace = %self.name, pin = ?target, "Rejected connection to driven input");
            return Err(GraphError::PinAlreadyDriven {
                pin: target,
                existing,
            });
        }

        let id = self.connections.insert(Connection { source, target });
        self.connection_order.push(id);
        self.drivers.insert((target.component, target.index), id);

        tracing::debug!(workspace = %self.name, source = ?source, target = ?target, "Connected pins");
        Ok(id)
    }

    /// Removes a connection. Unknown or already-removed ids are ignored.
    pub fn disconnect(&mut self, id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.remove(id)?;
        self.connection_order.retain(|&other| other != id);
        let key = (connection.target.component, connection.target.index);
        if self.drivers.get(&key) == Some(&id) {
            self.drivers.remove(&key);
        }
        Some(connection)
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(id)
    }

    /// Connections in insertion order.
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, &Connection)> + '_ {
        self.connection_order
            .iter()
            .filter_map(|&id| self.connections.get(id).map(|c| (id, c)))
    }

    pub fn connection_count(&self) -> usize {
        self.connection_order.len()
    }

    /// True iff some connection references exactly this pin.
    pub fn is_pin_connected(&self, pin: &PinInfo) -> bool {
        match pin.direction {
            PinDirection::Input => self.drivers.contains_key(&(pin.component, pin.index)),
            PinDirection::Output => self.connections.values().any(|c| c.source == *pin),
        }
    }

    /// The connection driving an input pin, if any.
    pub fn driver_of(&self, pin: &PinInfo) -> Option<ConnectionId> {
        if pin.direction != PinDirection::Input {
            return None;
        }
        self.drivers.get(&(pin.component, pin.index)).copied()
    }

    fn validate_pin(&self, pin: &PinInfo) -> Result<(), GraphError> {
        let component = self
            .components
            .get(pin.component)
            .ok_or(GraphError::ComponentNotFound(pin.component))?;
        let count = component.pin_count(pin.direction);
        if pin.index >= count {
            return Err(GraphError::PinOutOfRange {
                pin: *pin,
                direction: pin.direction,
                count,
            });
        }
        Ok(())
    }

    /// Copies every source output into its target input.
    ///
    /// Only inputs are written, so every read sees the previous tick's outputs.
    pub(crate) fn propagate(&mut self) -> usize {
        let mut propagated = 0;
        for &connection_id in &self.connection_order {
            let Some(connection) = self.connections.get(connection_id) else {
                continue;
            };
            let Some(value) = self
                .components
                .get(connection.source.component)
                .and_then(|c| c.outputs.get(connection.source.index))
                .cloned()
            else {
                continue;
            };
            if let Some(target) = self.components.get_mut(connection.target.component)
                && let Some(slot) = target.inputs.get_mut(connection.target.index)
            {
                *slot = value;
                propagated += 1;
            }
        }
        propagated
    }

    /// Runs every behavior once, in insertion order.
    pub(crate) fn update_components(&mut self) -> usize {
        let mut updated = 0;
        for &id in &self.order {
            if let Some(component) = self.components.get_mut(id) {
                component.update();
                updated += 1;
            }
        }
        updated
    }
}

impl<V: Signal> fmt::Debug for Workspace<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("components", &self.order.len())
            .field("connections", &self.connection_order.len())
            .finish()
    }
}
