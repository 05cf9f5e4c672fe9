//! Error types for registration and graph mutation.

use thiserror::Error;

use crate::workspace::{ComponentId, ConnectionId, PinDirection, PinInfo};

/// Errors raised while registering or looking up descriptors.
///
/// These are fatal to the individual call only. The caller decides whether a
/// failed registration should abort startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("a descriptor named '{0}' is already registered")]
    DuplicateName(String),

    #[error("no descriptor named '{0}' is registered")]
    NotFound(String),
}

/// Errors raised by workspace graph operations.
///
/// A rejected operation never mutates the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("connections must run from an output to an input (got {from:?} -> {to:?})")]
    InvalidDirection { from: PinDirection, to: PinDirection },

    #[error("input pin {pin:?} is already driven by connection {existing:?}")]
    PinAlreadyDriven { pin: PinInfo, existing: ConnectionId },

    #[error("component {0:?} is not part of this workspace")]
    ComponentNotFound(ComponentId),

    #[error("pin {pin:?} is out of range (component has {count} {direction:?} pins)")]
    PinOutOfRange {
        pin: PinInfo,
        direction: PinDirection,
        count: usize,
    },
}
