//! # Renderer Registry
//!
//! Renderers are pluggable. Each one is described by a [`RendererDescriptor`]
//! whose factory is loaded once at startup and then asked for one
//! [`RendererInstance`] per workspace.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use circuit_core::{ComponentId, PinInfo, RegistryError, Signal, Workspace, WorkspaceId};
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::Registry;
use crate::hit_test::CursorInfo;
use crate::render::RenderList;
use crate::stats::RenderStats;
use crate::view::View;

/// The area a renderer draws into.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Size in pixels.
    pub size: Vec2,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// A renderer bound to exactly one workspace.
///
/// Driven once per frame with [`on_update`](RendererInstance::on_update) then
/// [`on_render`](RendererInstance::on_render). Cursor state read through
/// [`cursor_info`](RendererInstance::cursor_info) reflects the last render.
pub trait RendererInstance<V: Signal> {
    fn name(&self) -> &str;

    fn workspace_id(&self) -> WorkspaceId;

    /// Advances view smoothing. Independent of `dt` apart from frame statistics.
    fn on_update(&mut self, dt: f32);

    /// Lays out the frame, refreshes cursor info and returns the display list.
    fn on_render(&mut self, dt: f32, workspace: &Workspace<V>) -> RenderList;

    fn resize(&mut self, viewport: Viewport);

    fn view(&self) -> &View;

    fn view_to_workspace(&self, view_pos: Vec2) -> Vec2 {
        self.view().to_workspace(view_pos)
    }

    fn workspace_to_view(&self, workspace_pos: Vec2) -> Vec2 {
        self.view().to_view(workspace_pos)
    }

    /// Pointer position in view space, `None` once it leaves the viewport.
    fn set_cursor_position(&mut self, view_pos: Option<Vec2>);

    fn cursor_info(&self) -> &CursorInfo;

    fn component_under_cursor(&self) -> Option<ComponentId> {
        self.cursor_info().component
    }

    /// Workspace position of a pin, with the component's rotation applied.
    ///
    /// `None` for pins of components that are not drawn, so no wire ends on them.
    fn pin_position(&self, workspace: &Workspace<V>, pin: &PinInfo) -> Option<Vec2>;

    /// Shows a wire from `source` to `end` (workspace space) until cleared.
    fn render_temporary_connection(&mut self, source: PinInfo, end: Vec2);

    fn clear_temporary_connection(&mut self);

    /// Multiplies the target zoom by `1 + amount`, clamped.
    fn modify_zoom(&mut self, amount: f32);

    fn pan_by(&mut self, view_delta: Vec2);

    fn set_grid_visible(&mut self, visible: bool);

    fn is_grid_visible(&self) -> bool;

    fn set_grid_snap_spacing(&mut self, spacing: f32);

    fn grid_snap_spacing(&self) -> f32;

    fn set_show_render_stats(&mut self, show: bool);

    /// Counters from the most recent `on_render`.
    fn render_stats(&self) -> &RenderStats;
}

/// Builds renderer instances. `load` runs once before the first `create`.
#[async_trait]
pub trait RendererFactory<V: Signal>: Send + Sync {
    /// Pulls in the renderer's own dependencies. `false` aborts this renderer.
    async fn load(&self) -> bool;

    fn create(
        &self,
        registry: Arc<Registry<V>>,
        workspace: &Workspace<V>,
        viewport: Viewport,
    ) -> Box<dyn RendererInstance<V>>;
}

pub struct RendererDescriptor<V: Signal> {
    pub name: String,
    pub description: String,
    pub version: String,
    pub factory: Arc<dyn RendererFactory<V>>,
}

impl<V: Signal> RendererDescriptor<V> {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        factory: Arc<dyn RendererFactory<V>>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            factory,
        }
    }
}

impl<V: Signal> Clone for RendererDescriptor<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            version: self.version.clone(),
            factory: Arc::clone(&self.factory),
        }
    }
}

impl<V: Signal> fmt::Debug for RendererDescriptor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RendererDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Renderers in registration order.
pub struct RendererRegistry<V: Signal> {
    renderers: Vec<RendererDescriptor<V>>,
}

impl<V: Signal> Default for RendererRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Signal> RendererRegistry<V> {
    pub fn new() -> Self {
        Self {
            renderers: Vec::new(),
        }
    }

    pub fn register(&mut self, descriptor: RendererDescriptor<V>) -> Result<(), RegistryError> {
        if self.get(&descriptor.name).is_some() {
            tracing::warn!(renderer = %descriptor.name, "Renderer already registered");
            return Err(RegistryError::DuplicateName(descriptor.name));
        }
        tracing::info!(renderer = %descriptor.name, version = %descriptor.version, "Registered renderer");
        self.renderers.push(descriptor);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RendererDescriptor<V>> {
        self.renderers.iter().find(|r| r.name == name)
    }

    pub fn first(&self) -> Option<&RendererDescriptor<V>> {
        self.renderers.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RendererDescriptor<V>> + '_ {
        self.renderers.iter()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Runs every factory's `load` once, keeping only the renderers that succeed.
    pub async fn load_all(self) -> Self {
        let mut loaded = Vec::with_capacity(self.renderers.len());
        for descriptor in self.renderers {
            if descriptor.factory.load().await {
                tracing::info!(renderer = %descriptor.name, "Renderer loaded");
                loaded.push(descriptor);
            } else {
                tracing::error!(renderer = %descriptor.name, "Renderer failed to load");
            }
        }
        Self { renderers: loaded }
    }
}
