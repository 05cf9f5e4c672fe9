#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use circuit_canvas::{
    CanvasConfig, Circuit, CircuitBuilder, ImageHandle, ImageLoader, RenderImage, Renderable,
    Viewport, WidgetDescriptor, canvas_renderer,
};
use circuit_core::{ComponentDescriptor, ComponentInstance, PinCounts, Simulatable, WorkspaceId};
use glam::Vec2;

pub const WIDGET_SIZE: Vec2 = Vec2::new(100.0, 50.0);

pub struct PowerSource;

impl Simulatable<bool> for PowerSource {
    fn pin_counts(&self) -> PinCounts {
        PinCounts::new(0, 1)
    }

    fn initial_output(&self, _index: usize) -> bool {
        true
    }

    fn update(&mut self, _inputs: &[bool], outputs: &mut [bool]) {
        outputs[0] = true;
    }
}

pub struct NotGate;

impl Simulatable<bool> for NotGate {
    fn pin_counts(&self) -> PinCounts {
        PinCounts::new(1, 1)
    }

    fn update(&mut self, inputs: &[bool], outputs: &mut [bool]) {
        outputs[0] = !inputs[0];
    }
}

/// Has no widget, so it simulates but is never drawn.
pub struct Hidden;

impl Simulatable<bool> for Hidden {
    fn pin_counts(&self) -> PinCounts {
        PinCounts::new(1, 0)
    }

    fn update(&mut self, _inputs: &[bool], _outputs: &mut [bool]) {}
}

/// 100x50 box with inputs on the left edge and outputs on the right.
pub struct BoxWidget;

impl Renderable<bool> for BoxWidget {
    fn render_image(&self, component: &ComponentInstance<bool>) -> RenderImage {
        let lit = component.outputs().first().copied().unwrap_or(false);
        RenderImage::new(if lit { "on" } else { "off" }, WIDGET_SIZE)
    }

    fn input_pin_position(&self, _index: usize) -> Vec2 {
        Vec2::new(0.0, 25.0)
    }

    fn output_pin_position(&self, _index: usize) -> Vec2 {
        Vec2::new(100.0, 25.0)
    }
}

/// Hands out sequential handles; files listed in `failing` error instead.
#[derive(Default)]
pub struct TestLoader {
    pub failing: HashSet<String>,
    next: AtomicU64,
}

impl TestLoader {
    pub fn failing(files: &[&str]) -> Self {
        Self {
            failing: files.iter().map(|f| f.to_string()).collect(),
            next: AtomicU64::new(0),
        }
    }
}

#[async_trait]
impl ImageLoader for TestLoader {
    async fn load_image(&self, _widget: &str, file: &str) -> anyhow::Result<ImageHandle> {
        if self.failing.contains(file) {
            anyhow::bail!("404: {file}");
        }
        Ok(ImageHandle(self.next.fetch_add(1, Ordering::Relaxed)))
    }
}

pub fn widget(name: &str, display_name: &str, category: &str, prefix: &str) -> WidgetDescriptor<bool> {
    WidgetDescriptor::new(name, display_name, category, || Box::new(BoxWidget))
        .with_icon(format!("{prefix}.icon.png"))
        .with_image("on", format!("{prefix}.on.png"))
        .with_image("off", format!("{prefix}.off.png"))
}

/// Builder with power, not and hidden components plus the canvas renderer.
pub fn builder() -> CircuitBuilder<bool> {
    let mut builder = CircuitBuilder::new();
    builder
        .register_component(ComponentDescriptor::new("power", "Always on", "1.0.0", || {
            Box::new(PowerSource)
        }))
        .unwrap();
    builder
        .register_component(ComponentDescriptor::new("not", "Inverter", "1.0.0", || {
            Box::new(NotGate)
        }))
        .unwrap();
    builder
        .register_component(ComponentDescriptor::new("hidden", "No widget", "1.0.0", || {
            Box::new(Hidden)
        }))
        .unwrap();
    builder
        .register_component_widget(widget("power", "Power", "Sources", "power"))
        .unwrap();
    builder
        .register_component_widget(widget("not", "NOT gate", "Logic", "not"))
        .unwrap();
    builder
        .register_renderer(canvas_renderer(CanvasConfig::default()))
        .unwrap();
    builder
}

pub fn circuit_with(loader: &TestLoader) -> Circuit<bool> {
    futures::executor::block_on(builder().init(loader))
}

/// Circuit with one 800x600 workspace and every image loaded.
pub fn circuit() -> (Circuit<bool>, WorkspaceId) {
    let mut circuit = circuit_with(&TestLoader::default());
    let id = circuit
        .create_workspace("main", Viewport::new(800.0, 600.0))
        .expect("canvas renderer is available");
    (circuit, id)
}
