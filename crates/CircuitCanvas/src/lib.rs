//! # CircuitCanvas
//!
//! `circuit_canvas` is the editing half of the circuit builder. It pairs the
//! simulation graph from `circuit_core` with widgets, a pan/zoom view, cursor
//! hit-testing and pluggable renderers that emit display lists for a host to draw.
//!
//! ## Core Architecture
//! - **Widgets (`src/widget.rs`)**: visual descriptors paired with components by name.
//! - **View (`src/view.rs`)**: workspace ↔ view transform with smoothed zoom.
//! - **Hit-testing (`src/hit_test.rs`)**: rotated pin placement and pointer resolution.
//! - **Renderers (`src/renderer.rs`, `src/painter.rs`)**: registry, binding and the built-in canvas renderer.
//! - **Editor (`src/interaction.rs`)**: drag state machine driven by per-frame input snapshots.
//!
//! ## Startup
//! Registration happens on a [`CircuitBuilder`]. [`CircuitBuilder::init`] loads
//! renderers and widget images once and yields a [`Circuit`], after which the
//! registries are read-only.

pub mod catalog;
pub mod config;
pub mod error;
pub mod input;
pub mod interaction;
pub mod math;
pub mod painter;
pub mod render;
pub mod renderer;
pub mod session;
pub mod stats;
pub mod view;
pub mod widget;

use std::collections::HashMap;
use std::sync::Arc;

use circuit_core::{
    ComponentDescriptor, ComponentRegistry, RegistryError, Signal, Workspace, WorkspaceId,
};

pub use catalog::{CatalogEntry, Registry};
pub use config::{CanvasConfig, EditorConfig, GridMode};
pub use error::RenderError;
pub use interaction::{Editor, EditorEvent, InteractionMode};
pub use painter::{CanvasRenderer, canvas_renderer};
pub use render::{DrawCommand, RenderList};
pub use renderer::{RendererDescriptor, RendererFactory, RendererInstance, Viewport};
pub use session::Session;
pub use widget::{ImageHandle, ImageLoader, RenderImage, Renderable, WidgetDescriptor};

use renderer::RendererRegistry;
use widget::WidgetRegistry;

/// Collects component, widget and renderer registrations before startup.
pub struct CircuitBuilder<V: Signal> {
    components: ComponentRegistry<V>,
    widgets: WidgetRegistry<V>,
    renderers: RendererRegistry<V>,
}

impl<V: Signal> Default for CircuitBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Signal> CircuitBuilder<V> {
    pub fn new() -> Self {
        Self {
            components: ComponentRegistry::new(),
            widgets: WidgetRegistry::new(),
            renderers: RendererRegistry::new(),
        }
    }

    pub fn register_component(
        &mut self,
        descriptor: ComponentDescriptor<V>,
    ) -> Result<Arc<ComponentDescriptor<V>>, RegistryError> {
        self.components.register(descriptor)
    }

    /// The component named by `descriptor.name` must already be registered.
    pub fn register_component_widget(
        &mut self,
        descriptor: WidgetDescriptor<V>,
    ) -> Result<(), RegistryError> {
        self.widgets.register(descriptor, &self.components)
    }

    pub fn register_renderer(&mut self, descriptor: RendererDescriptor<V>) -> Result<(), RegistryError> {
        self.renderers.register(descriptor)
    }

    /// Loads every renderer and widget image once, then freezes the registries.
    ///
    /// Renderers whose `load` fails are dropped. Images that fail to load are
    /// logged and their components skipped when drawing.
    pub async fn init(self, loader: &dyn ImageLoader) -> Circuit<V> {
        let Self {
            components,
            mut widgets,
            renderers,
        } = self;

        let renderers = renderers.load_all().await;
        if !widgets.load_images(loader).await {
            tracing::warn!("Some widget images failed to load; affected components will not be drawn");
        }

        tracing::info!(
            components = components.len(),
            widgets = widgets.len(),
            renderers = renderers.len(),
            "Circuit initialised"
        );
        Circuit {
            registry: Arc::new(Registry::new(components, widgets)),
            renderers,
            sessions: HashMap::new(),
        }
    }
}

/// Initialised registries plus every open workspace session.
pub struct Circuit<V: Signal> {
    registry: Arc<Registry<V>>,
    renderers: RendererRegistry<V>,
    sessions: HashMap<WorkspaceId, Session<V>>,
}

impl<V: Signal> Circuit<V> {
    pub fn registry(&self) -> &Arc<Registry<V>> {
        &self.registry
    }

    /// Components merged with their widgets, sorted by (category, name).
    pub fn catalog(&self) -> Vec<CatalogEntry<'_, V>> {
        self.registry.catalog()
    }

    /// Names of the renderers that loaded successfully.
    pub fn renderer_names(&self) -> Vec<&str> {
        self.renderers.iter().map(|r| r.name.as_str()).collect()
    }

    /// Creates a workspace bound to the first loaded renderer.
    ///
    /// Returns `None` when no renderer is available or the name is taken.
    pub fn create_workspace(&mut self, name: &str, viewport: Viewport) -> Option<WorkspaceId> {
        if self.sessions.values().any(|s| s.workspace().name() == name) {
            tracing::error!(workspace = %name, "Workspace name already in use");
            return None;
        }
        let Some(descriptor) = self.renderers.first() else {
            tracing::error!(workspace = %name, "No renderer available for workspace");
            return None;
        };

        let workspace = Workspace::new(name);
        let renderer = descriptor
            .factory
            .create(Arc::clone(&self.registry), &workspace, viewport);
        let id = workspace.id();
        tracing::info!(workspace = %name, %id, renderer = %descriptor.name, "Created workspace");

        self.sessions
            .insert(id, Session::new(workspace, renderer, Arc::clone(&self.registry)));
        Some(id)
    }

    pub fn remove_workspace(&mut self, id: WorkspaceId) -> Option<Workspace<V>> {
        let session = self.sessions.remove(&id)?;
        tracing::info!(%id, "Removed workspace");
        Some(session.into_workspace())
    }

    pub fn session(&self, id: WorkspaceId) -> Option<&Session<V>> {
        self.sessions.get(&id)
    }

    pub fn session_mut(&mut self, id: WorkspaceId) -> Option<&mut Session<V>> {
        self.sessions.get_mut(&id)
    }

    pub fn workspace(&self, id: WorkspaceId) -> Option<&Workspace<V>> {
        self.session(id).map(Session::workspace)
    }

    pub fn workspace_mut(&mut self, id: WorkspaceId) -> Option<&mut Workspace<V>> {
        self.session_mut(id).map(Session::workspace_mut)
    }

    pub fn renderer(&self, id: WorkspaceId) -> Result<&dyn RendererInstance<V>, RenderError> {
        self.session(id)
            .map(Session::renderer)
            .ok_or(RenderError::RendererNotFound(id))
    }

    pub fn renderer_mut(&mut self, id: WorkspaceId) -> Result<&mut dyn RendererInstance<V>, RenderError> {
        self.session_mut(id)
            .map(Session::renderer_mut)
            .ok_or(RenderError::RendererNotFound(id))
    }

    /// Runs one frame for a workspace; see [`Session::frame`].
    pub fn frame(&mut self, id: WorkspaceId, dt: f32) -> Result<RenderList, RenderError> {
        self.session_mut(id)
            .map(|session| session.frame(dt))
            .ok_or(RenderError::RendererNotFound(id))
    }
}
