//! # Editor Interaction
//!
//! The drag state machine behind the editor. The host hands it one
//! [`InputState`] per frame; it reads hover state from the bound renderer,
//! edits the workspace and reports what happened as [`EditorEvent`]s.
//!
//! Presses are detected by comparing mouse buttons with the previous frame.
//! Scrolling zooms in every mode.

use circuit_core::{
    ComponentArgs, ComponentId, Connection, ConnectionId, GraphError, PinDirection, PinInfo,
    RegistryError, Signal, Workspace,
};
use glam::Vec2;

use crate::config::{EditorConfig, GridMode};
use crate::input::{InputState, Key, MouseButtons};
use crate::math;
use crate::renderer::{RendererInstance, Viewport};
use crate::session::Session;

/// Events emitted by the editor to the host application.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    /// A palette item was dropped onto the canvas.
    ComponentAdded { id: ComponentId, name: String },
    /// A palette drag ended outside the canvas or was escaped.
    PaletteDragCancelled { name: String },
    /// A component drag finished; positions are workspace space.
    ComponentMoved { id: ComponentId, from: Vec2, to: Vec2 },
    /// A component drag was abandoned and the component put back.
    ComponentDragCancelled { id: ComponentId },
    /// The hovered component was deleted with its connections.
    ComponentRemoved { id: ComponentId },
    /// New rotation in quarter turns, `0..4`.
    ComponentRotated { id: ComponentId, rotation: i32 },
    /// A dragged wire became a connection.
    Connected { id: ConnectionId, connection: Connection },
    /// `connect_pins` refused the connection; the graph is unchanged.
    ConnectionRejected { from: PinInfo, to: PinInfo, error: GraphError },
    /// A wire was released over nothing or escaped.
    ConnectionCancelled { source: PinInfo },
}

/// The current state of user interaction.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionMode {
    /// Nothing in progress; hover shortcuts (delete, rotate) are live.
    Idle,
    /// A component picked from the host's palette is following the pointer.
    DraggingPaletteItem { component: String },
    /// A placed component follows the pointer.
    DraggingComponent {
        component: ComponentId,
        /// Where to put it back if the drag is cancelled.
        original_position: Vec2,
    },
    /// The middle button is dragging the view.
    Panning {
        /// Pointer position at the previous frame (view space).
        last_pointer: Vec2,
    },
    /// A wire is being drawn out of `source`.
    DrawingConnection { source: PinInfo },
}

/// Drag-interaction state machine fed with one [`InputState`] per frame.
///
/// Hover information comes from the renderer's last `on_render`, so call
/// [`Editor::handle_input`] before [`Session::frame`] each frame.
pub struct Editor {
    /// Grid mode, snapping and scroll sensitivity.
    pub config: EditorConfig,
    mode: InteractionMode,
    previous_buttons: MouseButtons,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config,
            mode: InteractionMode::Idle,
            previous_buttons: MouseButtons::default(),
        }
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    pub fn set_grid_mode<V: Signal>(&mut self, mode: GridMode, renderer: &mut dyn RendererInstance<V>) {
        self.config.grid_mode = mode;
        self.apply_grid_mode(renderer);
    }

    fn apply_grid_mode<V: Signal>(&self, renderer: &mut dyn RendererInstance<V>) {
        let visible = match self.config.grid_mode {
            GridMode::Show => true,
            GridMode::ShowWhilstDragging => {
                matches!(self.mode, InteractionMode::DraggingPaletteItem { .. })
            }
            GridMode::Hide => false,
        };
        if renderer.is_grid_visible() != visible {
            renderer.set_grid_visible(visible);
        }
    }

    /// Starts dragging a palette item. Called by the host's picker on press.
    pub fn begin_palette_drag<V: Signal>(
        &mut self,
        session: &mut Session<V>,
        component: &str,
    ) -> Result<(), RegistryError> {
        session.registry().lookup(component)?;
        tracing::debug!(component, "Palette drag started");
        self.mode = InteractionMode::DraggingPaletteItem {
            component: component.to_string(),
        };
        self.apply_grid_mode(session.renderer_mut());
        Ok(())
    }

    /// Pointer position in workspace space, snapped when grid snapping is on.
    fn pointer_workspace<V: Signal>(&self, renderer: &dyn RendererInstance<V>, pointer: Vec2) -> Vec2 {
        let position = renderer.view_to_workspace(pointer);
        if self.config.grid_snap {
            math::snap_to_grid(position, renderer.grid_snap_spacing())
        } else {
            position
        }
    }

    /// Processes one frame of input and returns what changed.
    pub fn handle_input<V: Signal>(
        &mut self,
        session: &mut Session<V>,
        input: &InputState,
    ) -> Vec<EditorEvent> {
        let mut events = Vec::new();

        {
            let renderer = session.renderer_mut();
            if renderer.view().viewport_size != input.screen_size {
                renderer.resize(Viewport {
                    size: input.screen_size,
                });
            }
            renderer.set_cursor_position(input.pointer_over_canvas.then_some(input.mouse_pos));
            if input.scroll_delta != 0.0 && input.pointer_over_canvas {
                renderer.modify_zoom(input.scroll_delta / self.config.scroll_divisor);
            }
        }

        let next_mode = match self.mode.clone() {
            InteractionMode::Idle => self.handle_idle(session, input, &mut events),
            InteractionMode::DraggingPaletteItem { component } => {
                self.handle_palette_drag(session, input, component, &mut events)
            }
            InteractionMode::DraggingComponent {
                component,
                original_position,
            } => self.handle_component_drag(session, input, component, original_position, &mut events),
            InteractionMode::Panning { last_pointer } => {
                Self::handle_panning(session.renderer_mut(), input, last_pointer)
            }
            InteractionMode::DrawingConnection { source } => {
                self.handle_drawing_connection(session, input, source, &mut events)
            }
        };

        if let Some(mode) = next_mode {
            tracing::trace!(?mode, "Interaction mode changed");
            self.mode = mode;
        }
        self.apply_grid_mode(session.renderer_mut());
        self.previous_buttons = input.mouse_buttons;
        events
    }

    fn pressed(&self, input: &InputState) -> MouseButtons {
        MouseButtons {
            left: input.mouse_buttons.left && !self.previous_buttons.left,
            right: input.mouse_buttons.right && !self.previous_buttons.right,
            middle: input.mouse_buttons.middle && !self.previous_buttons.middle,
        }
    }

    fn handle_idle<V: Signal>(
        &self,
        session: &mut Session<V>,
        input: &InputState,
        events: &mut Vec<EditorEvent>,
    ) -> Option<InteractionMode> {
        let (workspace, renderer) = session.parts_mut();
        let cursor = *renderer.cursor_info();
        let pressed = self.pressed(input);

        if input.pointer_over_canvas
            && let Some(id) = cursor.component
        {
            if input.key_pressed(Key::Delete) || input.key_pressed(Key::Backspace) {
                if workspace.remove_component(id).is_ok() {
                    events.push(EditorEvent::ComponentRemoved { id });
                }
                return None;
            }
            if input.key_pressed(Key::R) {
                let delta = if input.modifiers.shift { -1 } else { 1 };
                if let Ok(rotation) = workspace.rotate_component(id, delta) {
                    events.push(EditorEvent::ComponentRotated { id, rotation });
                }
            }
        }

        if !input.pointer_over_canvas {
            return None;
        }

        if pressed.middle {
            return Some(InteractionMode::Panning {
                last_pointer: input.mouse_pos,
            });
        }

        if pressed.left {
            if let Some(source) = cursor.pin() {
                let end = renderer.view_to_workspace(input.mouse_pos);
                renderer.render_temporary_connection(source, end);
                return Some(InteractionMode::DrawingConnection { source });
            }
            if let Some(component) = cursor.component
                && let Some(original_position) = workspace.component_position(component)
            {
                return Some(InteractionMode::DraggingComponent {
                    component,
                    original_position,
                });
            }
        }
        None
    }

    fn handle_palette_drag<V: Signal>(
        &self,
        session: &mut Session<V>,
        input: &InputState,
        component: String,
        events: &mut Vec<EditorEvent>,
    ) -> Option<InteractionMode> {
        if input.key_pressed(Key::Escape) {
            events.push(EditorEvent::PaletteDragCancelled { name: component });
            return Some(InteractionMode::Idle);
        }
        if input.mouse_buttons.left {
            return None;
        }

        if !input.pointer_over_canvas {
            events.push(EditorEvent::PaletteDragCancelled { name: component });
            return Some(InteractionMode::Idle);
        }

        let position = self.pointer_workspace(session.renderer(), input.mouse_pos);
        match session.add_component(&component, ComponentArgs::at(position)) {
            Ok(id) => events.push(EditorEvent::ComponentAdded {
                id,
                name: component,
            }),
            Err(e) => {
                tracing::warn!(component = %component, error = %e, "Dropped palette item is no longer registered");
                events.push(EditorEvent::PaletteDragCancelled { name: component });
            }
        }
        Some(InteractionMode::Idle)
    }

    fn handle_component_drag<V: Signal>(
        &self,
        session: &mut Session<V>,
        input: &InputState,
        component: ComponentId,
        original_position: Vec2,
        events: &mut Vec<EditorEvent>,
    ) -> Option<InteractionMode> {
        let (workspace, renderer) = session.parts_mut();
        if !workspace.contains_component(component) {
            return Some(InteractionMode::Idle);
        }

        let cancelled = input.key_pressed(Key::Escape)
            || (!input.mouse_buttons.left && !input.pointer_over_canvas);
        if cancelled {
            if let Err(error) = workspace.set_component_position(component, original_position) {
                tracing::warn!(%error, "Could not restore dragged component");
            }
            events.push(EditorEvent::ComponentDragCancelled { id: component });
            return Some(InteractionMode::Idle);
        }

        if input.pointer_over_canvas {
            let position = self.pointer_workspace(renderer, input.mouse_pos);
            if let Err(error) = workspace.set_component_position(component, position) {
                tracing::warn!(%error, "Could not move dragged component");
            }
        }

        if !input.mouse_buttons.left {
            let to = workspace
                .component_position(component)
                .unwrap_or(original_position);
            events.push(EditorEvent::ComponentMoved {
                id: component,
                from: original_position,
                to,
            });
            return Some(InteractionMode::Idle);
        }
        None
    }

    fn handle_panning<V: Signal>(
        renderer: &mut dyn RendererInstance<V>,
        input: &InputState,
        last_pointer: Vec2,
    ) -> Option<InteractionMode> {
        renderer.pan_by(input.mouse_pos - last_pointer);
        if input.mouse_buttons.middle {
            Some(InteractionMode::Panning {
                last_pointer: input.mouse_pos,
            })
        } else {
            Some(InteractionMode::Idle)
        }
    }

    fn handle_drawing_connection<V: Signal>(
        &self,
        session: &mut Session<V>,
        input: &InputState,
        source: PinInfo,
        events: &mut Vec<EditorEvent>,
    ) -> Option<InteractionMode> {
        let (workspace, renderer) = session.parts_mut();

        if input.key_pressed(Key::Escape) || !workspace.contains_component(source.component) {
            renderer.clear_temporary_connection();
            events.push(EditorEvent::ConnectionCancelled { source });
            return Some(InteractionMode::Idle);
        }

        if input.mouse_buttons.left {
            let end = renderer.view_to_workspace(input.mouse_pos);
            renderer.render_temporary_connection(source, end);
            return None;
        }

        renderer.clear_temporary_connection();
        let target = renderer.cursor_info().pin().filter(|_| input.pointer_over_canvas);
        match target {
            Some(target) if target != source => {
                Self::finish_connection(workspace, source, target, events);
            }
            _ => events.push(EditorEvent::ConnectionCancelled { source }),
        }
        Some(InteractionMode::Idle)
    }

    /// Connects two pins whichever end the drag started from.
    fn finish_connection<V: Signal>(
        workspace: &mut Workspace<V>,
        start: PinInfo,
        end: PinInfo,
        events: &mut Vec<EditorEvent>,
    ) {
        let (from, to) = match start.direction {
            PinDirection::Output => (start, end),
            PinDirection::Input => (end, start),
        };
        match workspace.connect_pins(from, to) {
            Ok(id) => events.push(EditorEvent::Connected {
                id,
                connection: Connection {
                    source: from,
                    target: to,
                },
            }),
            Err(error) => {
                tracing::debug!(%error, "Connection rejected");
                events.push(EditorEvent::ConnectionRejected { from, to, error });
            }
        }
    }
}
