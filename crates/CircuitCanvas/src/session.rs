//! A workspace together with the renderer bound to it and its scheduler.

use std::sync::Arc;

use circuit_core::{
    ComponentArgs, ComponentId, RegistryError, Scheduler, Signal, TickStats, Workspace, WorkspaceId,
};

use crate::catalog::Registry;
use crate::render::RenderList;
use crate::renderer::RendererInstance;

pub struct Session<V: Signal> {
    workspace: Workspace<V>,
    renderer: Box<dyn RendererInstance<V>>,
    scheduler: Scheduler,
    registry: Arc<Registry<V>>,
    last_tick: TickStats,
}

impl<V: Signal> Session<V> {
    pub(crate) fn new(
        workspace: Workspace<V>,
        renderer: Box<dyn RendererInstance<V>>,
        registry: Arc<Registry<V>>,
    ) -> Self {
        Self {
            workspace,
            renderer,
            scheduler: Scheduler::new(),
            registry,
            last_tick: TickStats::default(),
        }
    }

    pub(crate) fn into_workspace(self) -> Workspace<V> {
        self.workspace
    }

    pub fn id(&self) -> WorkspaceId {
        self.workspace.id()
    }

    pub fn workspace(&self) -> &Workspace<V> {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace<V> {
        &mut self.workspace
    }

    pub fn renderer(&self) -> &dyn RendererInstance<V> {
        self.renderer.as_ref()
    }

    pub fn renderer_mut(&mut self) -> &mut dyn RendererInstance<V> {
        self.renderer.as_mut()
    }

    /// Both halves at once, for code that edits the graph based on cursor state.
    pub fn parts_mut(&mut self) -> (&mut Workspace<V>, &mut dyn RendererInstance<V>) {
        (&mut self.workspace, self.renderer.as_mut())
    }

    pub fn registry(&self) -> &Arc<Registry<V>> {
        &self.registry
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Stats of the tick run by the most recent [`Session::frame`].
    pub fn last_tick(&self) -> TickStats {
        self.last_tick
    }

    /// Looks up `name` in the registry and adds an instance of it.
    pub fn add_component(&mut self, name: &str, args: ComponentArgs) -> Result<ComponentId, RegistryError> {
        let descriptor = self.registry.lookup(name)?;
        Ok(self.workspace.add_component(&descriptor, args))
    }

    /// One frame: view smoothing, one simulation tick, then render.
    pub fn frame(&mut self, dt: f32) -> RenderList {
        self.renderer.on_update(dt);
        self.last_tick = self.scheduler.step(&mut self.workspace);
        self.renderer.on_render(dt, &self.workspace)
    }
}
