//! # Canvas Renderer
//!
//! The built-in renderer. It lays out every component with a loaded widget
//! image, culls against the viewport, resolves the cursor and emits a
//! [`RenderList`] in this order: grid anchors, widget images, pins, hovered
//! pins, connections, the temporary connection, the stats overlay.

use std::sync::Arc;

use async_trait::async_trait;
use bitflags::bitflags;
use circuit_core::{
    ComponentInstance, PinDirection, PinInfo, Signal, Workspace, WorkspaceId,
};
use glam::Vec2;

use crate::catalog::Registry;
use crate::config::{CanvasConfig, PinStyle};
use crate::hit_test::{ComponentLayout, CursorInfo, HitTester};
use crate::math::{self, Aabb};
use crate::render::{DrawCommand, RenderList};
use crate::renderer::{RendererDescriptor, RendererFactory, RendererInstance, Viewport};
use crate::stats::{FrameTimer, RenderStats};
use crate::view::View;
use crate::widget::Widget;

pub const CANVAS_RENDERER_NAME: &str = "canvas";

bitflags! {
    /// Render state of a pin for the current frame.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct PinFlags: u8 {
        /// The pin is an input.
        const INPUT = 1 << 0;
        /// The pin carries an active value.
        const ACTIVE = 1 << 1;
        /// The cursor is over the pin.
        const HOVERED = 1 << 2;
        /// The pin is where the temporary connection starts.
        const TEMPORARY_SOURCE = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TemporaryConnection {
    source: PinInfo,
    end: Vec2,
}

#[derive(Clone, Copy, Debug)]
struct PinRender {
    pin: PinInfo,
    position_view: Vec2,
    flags: PinFlags,
}

/// Renderer producing a display list for a host-side 2D canvas.
pub struct CanvasRenderer<V: Signal> {
    workspace: WorkspaceId,
    registry: Arc<Registry<V>>,
    config: CanvasConfig,
    view: View,
    cursor: CursorInfo,
    temporary_connection: Option<TemporaryConnection>,
    frame_timer: FrameTimer,
    hit_tester: HitTester,
    stats: RenderStats,
}

impl<V: Signal> CanvasRenderer<V> {
    pub fn new(
        registry: Arc<Registry<V>>,
        workspace: WorkspaceId,
        viewport: Viewport,
        config: CanvasConfig,
    ) -> Self {
        Self {
            workspace,
            registry,
            config,
            view: View::new(viewport.size),
            cursor: CursorInfo::default(),
            temporary_connection: None,
            frame_timer: FrameTimer::new(),
            hit_tester: HitTester::new(),
            stats: RenderStats::default(),
        }
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut CanvasConfig {
        &mut self.config
    }

    fn widget_for(&self, component: &ComponentInstance<V>) -> Option<&Widget<V>> {
        self.registry.widget(component.name())
    }

    /// Layout of a component that is drawn this frame, `None` when its image is not loaded.
    fn layout(&self, component: &ComponentInstance<V>, widget: &Widget<V>) -> Option<ComponentLayout> {
        let image = widget.renderable().render_image(component);
        widget.image(&image.image)?;
        Some(ComponentLayout::new(
            component.id(),
            component.position(),
            component.rotation(),
            image.size,
            &self.view,
        ))
    }

    fn local_pin_position(widget: &Widget<V>, direction: PinDirection, index: usize) -> Vec2 {
        match direction {
            PinDirection::Input => widget.renderable().input_pin_position(index),
            PinDirection::Output => widget.renderable().output_pin_position(index),
        }
    }

    fn is_temporary_source(&self, pin: &PinInfo) -> bool {
        self.temporary_connection
            .is_some_and(|connection| connection.source == *pin)
    }

    /// Snaps to the hovered pin unless it is an input that is already driven.
    fn temporary_connection_end(&self, workspace: &Workspace<V>, connection: &TemporaryConnection) -> Vec2 {
        if let Some(pin) = self.cursor.pin()
            && !(pin.direction == PinDirection::Input && workspace.is_pin_connected(&pin))
            && let Some(position) = self.pin_position(workspace, &pin)
        {
            return position;
        }
        connection.end
    }

    /// Anchors sit on snap points. When those are closer than
    /// `anchor.min_spacing` pixels the stride doubles until they are not,
    /// which bounds the anchor count by the viewport area.
    fn draw_grid(&self, draw_list: &mut RenderList) {
        let anchor = &self.config.grid.anchor;
        let zoom = self.view.zoom;
        let mut spacing = self.config.grid.spacing;
        if !spacing.is_finite() || spacing <= 0.0 || zoom <= 0.0 {
            return;
        }
        let min_spacing_view = anchor.min_spacing.max(1.0);
        while spacing * zoom < min_spacing_view {
            spacing *= 2.0;
        }

        let radius = (anchor.radius * zoom).clamp(anchor.radius_min, anchor.radius_max);

        let top_left = self.view.to_workspace(Vec2::ZERO);
        let first = Vec2::new(
            math::grid_floor(top_left.x, spacing),
            math::grid_floor(top_left.y, spacing),
        );
        let first_view = self.view.to_view(first);
        let spacing_view = spacing * zoom;
        let repeats = ((self.view.viewport_size - first_view) / spacing_view).floor();
        if !repeats.is_finite() || repeats.min_element() < 0.0 {
            return;
        }

        for i in 0..=(repeats.x as u32) {
            for j in 0..=(repeats.y as u32) {
                draw_list.push(DrawCommand::Circle {
                    center: first_view + Vec2::new(i as f32, j as f32) * spacing_view,
                    radius,
                    fill: anchor.fill_color,
                    stroke: anchor.line_color,
                    stroke_width: anchor.border_thickness,
                });
            }
        }
    }

    fn pin_circle(center: Vec2, radius: f32, style: &PinStyle) -> DrawCommand {
        DrawCommand::Circle {
            center,
            radius,
            fill: style.fill_color,
            stroke: style.line_color,
            stroke_width: style.line_width,
        }
    }
}

impl<V: Signal> RendererInstance<V> for CanvasRenderer<V> {
    fn name(&self) -> &str {
        CANVAS_RENDERER_NAME
    }

    fn workspace_id(&self) -> WorkspaceId {
        self.workspace
    }

    fn on_update(&mut self, dt: f32) {
        self.frame_timer.record(dt);
        self.view.step_zoom(self.config.zoom.speed);
    }

    fn on_render(&mut self, _dt: f32, workspace: &Workspace<V>) -> RenderList {
        let mut draw_list = RenderList::new();
        self.cursor.clear_hover();
        self.hit_tester.clear();

        if self.config.grid.visible {
            self.draw_grid(&mut draw_list);
        }

        let zoom = self.view.zoom;
        let viewport = self.view.viewport_aabb();
        let pin_radius_view = self.config.pin.radius * zoom;
        let hover_radius_view = pin_radius_view * self.config.pin.hover_radius_multiplier;

        let registry = Arc::clone(&self.registry);
        let mut pins: Vec<PinRender> = Vec::new();
        let mut total_pins = 0;
        let mut rendered_components = 0;

        for component in workspace.components() {
            let Some(widget) = registry.widget(component.name()) else {
                continue;
            };
            let render_image = widget.renderable().render_image(component);
            let Some(handle) = widget.image(&render_image.image) else {
                tracing::debug!(
                    widget = %widget.name(),
                    image = %render_image.image,
                    "Widget image not loaded, skipping component"
                );
                continue;
            };
            let layout = ComponentLayout::new(
                component.id(),
                component.position(),
                component.rotation(),
                render_image.size,
                &self.view,
            );

            total_pins += component.inputs().len() + component.outputs().len();
            let pin_infos = (0..component.inputs().len())
                .map(|i| PinInfo::input(component.id(), i))
                .chain((0..component.outputs().len()).map(|i| PinInfo::output(component.id(), i)));
            for pin in pin_infos {
                let local = Self::local_pin_position(widget, pin.direction, pin.index);
                let position_view = self.view.to_view(layout.pin_position(local));
                if !Aabb::around(position_view, pin_radius_view).overlaps(&viewport) {
                    continue;
                }

                let mut flags = PinFlags::empty();
                flags.set(PinFlags::INPUT, pin.direction == PinDirection::Input);
                flags.set(
                    PinFlags::ACTIVE,
                    component
                        .pin_value(pin.direction, pin.index)
                        .is_some_and(V::is_active),
                );
                flags.set(PinFlags::TEMPORARY_SOURCE, self.is_temporary_source(&pin));

                self.hit_tester.add_pin(pin, position_view, hover_radius_view);
                pins.push(PinRender {
                    pin,
                    position_view,
                    flags,
                });
            }

            if !layout.aabb_view.overlaps(&viewport) {
                continue;
            }
            draw_list.push(DrawCommand::Image {
                image: handle,
                size: layout.size,
                transform: layout.image_transform(&self.view),
            });
            self.hit_tester.add_body(layout.id, layout.aabb_view);
            rendered_components += 1;
        }

        if let Some(point) = self.cursor.position_view {
            self.cursor.apply(self.hit_tester.resolve(point));
        }
        let hovered = self.cursor.pin();
        for render in &mut pins {
            render.flags.set(PinFlags::HOVERED, hovered == Some(render.pin));
        }

        let pin_config = &self.config.pin;
        for render in &pins {
            let style = if render.flags.contains(PinFlags::ACTIVE) {
                &pin_config.active
            } else {
                &pin_config.regular
            };
            draw_list.push(Self::pin_circle(render.position_view, pin_radius_view, style));
        }
        for render in pins
            .iter()
            .filter(|r| r.flags.intersects(PinFlags::HOVERED | PinFlags::TEMPORARY_SOURCE))
        {
            draw_list.push(Self::pin_circle(
                render.position_view,
                pin_radius_view,
                &pin_config.hover,
            ));
        }

        for (_, connection) in workspace.connections() {
            let (Some(start), Some(end)) = (
                self.pin_position(workspace, &connection.source),
                self.pin_position(workspace, &connection.target),
            ) else {
                continue;
            };
            let active = workspace
                .component(connection.source.component)
                .and_then(|c| c.pin_value(PinDirection::Output, connection.source.index))
                .is_some_and(V::is_active);
            let style = if active {
                &self.config.connection.active
            } else {
                &self.config.connection.regular
            };
            draw_list.push(DrawCommand::Line {
                start: self.view.to_view(start),
                end: self.view.to_view(end),
                color: style.color,
                width: style.width * zoom,
            });
        }

        if let Some(temporary) = self.temporary_connection
            && let Some(start) = self.pin_position(workspace, &temporary.source)
        {
            let end = self.temporary_connection_end(workspace, &temporary);
            let style = &self.config.connection.temporary;
            draw_list.push(DrawCommand::Line {
                start: self.view.to_view(start),
                end: self.view.to_view(end),
                color: style.color,
                width: style.width * zoom,
            });
        }

        self.stats = RenderStats {
            rendered_components,
            total_components: workspace.component_count(),
            rendered_pins: pins.len(),
            total_pins,
            connections: workspace.connection_count(),
            zoom,
            average_frame_time: self.frame_timer.average(),
            fps: self.frame_timer.fps(),
        };

        if self.config.stats.visible {
            let stats = &self.config.stats;
            draw_list.push(DrawCommand::Text {
                pos: Vec2::new(stats.margin.x, self.view.viewport_size.y - stats.margin.y),
                text: self.stats.to_string(),
                color: stats.text_color,
                size: stats.font_size,
            });
        }

        draw_list
    }

    fn resize(&mut self, viewport: Viewport) {
        self.view.viewport_size = viewport.size;
    }

    fn view(&self) -> &View {
        &self.view
    }

    fn set_cursor_position(&mut self, view_pos: Option<Vec2>) {
        self.cursor.position_view = view_pos;
        self.cursor.position_workspace = view_pos.map(|p| self.view.to_workspace(p));
    }

    fn cursor_info(&self) -> &CursorInfo {
        &self.cursor
    }

    fn pin_position(&self, workspace: &Workspace<V>, pin: &PinInfo) -> Option<Vec2> {
        let component = workspace.component(pin.component)?;
        if pin.index >= component.pin_count(pin.direction) {
            return None;
        }
        let widget = self.widget_for(component)?;
        let layout = self.layout(component, widget)?;
        let local = Self::local_pin_position(widget, pin.direction, pin.index);
        Some(layout.pin_position(local))
    }

    fn render_temporary_connection(&mut self, source: PinInfo, end: Vec2) {
        self.temporary_connection = Some(TemporaryConnection { source, end });
    }

    fn clear_temporary_connection(&mut self) {
        self.temporary_connection = None;
    }

    fn modify_zoom(&mut self, amount: f32) {
        self.view.modify_zoom(amount, &self.config.zoom);
    }

    fn pan_by(&mut self, view_delta: Vec2) {
        self.view.pan_by(view_delta);
    }

    fn set_grid_visible(&mut self, visible: bool) {
        self.config.grid.visible = visible;
    }

    fn is_grid_visible(&self) -> bool {
        self.config.grid.visible
    }

    fn set_grid_snap_spacing(&mut self, spacing: f32) {
        self.config.grid.spacing = spacing;
    }

    fn grid_snap_spacing(&self) -> f32 {
        self.config.grid.spacing
    }

    fn set_show_render_stats(&mut self, show: bool) {
        self.config.stats.visible = show;
    }

    fn render_stats(&self) -> &RenderStats {
        &self.stats
    }
}

/// Factory for [`CanvasRenderer`]. Has nothing to load.
#[derive(Clone, Debug, Default)]
pub struct CanvasRendererFactory {
    pub config: CanvasConfig,
}

#[async_trait]
impl<V: Signal> RendererFactory<V> for CanvasRendererFactory {
    async fn load(&self) -> bool {
        true
    }

    fn create(
        &self,
        registry: Arc<Registry<V>>,
        workspace: &Workspace<V>,
        viewport: Viewport,
    ) -> Box<dyn RendererInstance<V>> {
        tracing::debug!(workspace = %workspace.name(), "Creating canvas renderer");
        Box::new(CanvasRenderer::new(
            registry,
            workspace.id(),
            viewport,
            self.config.clone(),
        ))
    }
}

/// Descriptor registering the canvas renderer with `config`.
pub fn canvas_renderer<V: Signal>(config: CanvasConfig) -> RendererDescriptor<V> {
    RendererDescriptor::new(
        CANVAS_RENDERER_NAME,
        "Display-list renderer for 2D canvas hosts",
        env!("CARGO_PKG_VERSION"),
        Arc::new(CanvasRendererFactory { config }),
    )
}
