//! Errors raised by the canvas layer. Registry and graph errors come from
//! `circuit_core` and are re-exported here.

use circuit_core::WorkspaceId;
use thiserror::Error;

pub use circuit_core::{GraphError, RegistryError};

/// Errors raised when addressing the renderer of a workspace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// No session, and so no renderer, exists for this workspace id.
    #[error("no renderer bound to workspace {0}")]
    RendererNotFound(WorkspaceId),
}
