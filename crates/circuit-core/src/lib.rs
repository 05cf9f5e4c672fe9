//! # Circuit Core
//!
//! `circuit_core` is the simulation half of the circuit builder: the component
//! registry, the workspace graph of components, pins and connections, and the
//! tick scheduler that moves values through it.
//!
//! ## Core Architecture
//! - **Registry (`src/registry.rs`)**: name → [`ComponentDescriptor`] lookup.
//! - **Workspace (`src/workspace.rs`)**: owns instances and connections, enforces the single-driver rule.
//! - **Scheduler (`src/scheduler.rs`)**: propagate-then-update ticks, safe on cyclic graphs.
//!
//! Nothing here knows about views, widgets or pixels; that lives in `circuit_canvas`.

pub mod component;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod signal;
pub mod workspace;

pub use component::{
    BehaviorFactory, ComponentArgs, ComponentDescriptor, ComponentInstance, PinCounts, Simulatable,
};
pub use error::{GraphError, RegistryError};
pub use registry::ComponentRegistry;
pub use scheduler::{Scheduler, TickStats};
pub use signal::Signal;
pub use workspace::{
    ComponentId, Connection, ConnectionId, PinDirection, PinInfo, Workspace, WorkspaceId,
};
