use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use circuit_canvas::input::{InputState, MouseButtons};
use circuit_canvas::{
    CanvasConfig, CircuitBuilder, DrawCommand, Editor, ImageHandle, ImageLoader, RenderImage,
    Renderable, Viewport, WidgetDescriptor, canvas_renderer,
};
use circuit_core::{
    ComponentArgs, ComponentDescriptor, ComponentInstance, PinCounts, PinInfo, Simulatable,
};
use glam::Vec2;

struct Inverter;

impl Simulatable<bool> for Inverter {
    fn pin_counts(&self) -> PinCounts {
        PinCounts::new(1, 1)
    }

    fn update(&mut self, inputs: &[bool], outputs: &mut [bool]) {
        outputs[0] = !inputs[0];
    }
}

struct InverterWidget;

impl Renderable<bool> for InverterWidget {
    fn render_image(&self, component: &ComponentInstance<bool>) -> RenderImage {
        let image = if component.outputs()[0] { "high" } else { "low" };
        RenderImage::new(image, Vec2::new(80.0, 40.0))
    }

    fn input_pin_position(&self, _index: usize) -> Vec2 {
        Vec2::new(0.0, 20.0)
    }

    fn output_pin_position(&self, _index: usize) -> Vec2 {
        Vec2::new(80.0, 20.0)
    }
}

/// Pretends every file is already in memory.
#[derive(Default)]
struct FakeImages(AtomicU64);

#[async_trait]
impl ImageLoader for FakeImages {
    async fn load_image(&self, _widget: &str, file: &str) -> anyhow::Result<ImageHandle> {
        let handle = ImageHandle(self.0.fetch_add(1, Ordering::Relaxed));
        println!("  loaded {file} as {handle:?}");
        Ok(handle)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
    println!("=== CircuitCanvas Headless Demo ===");

    // 1. Register plugins
    let mut builder = CircuitBuilder::new();
    builder.register_component(ComponentDescriptor::new(
        "inverter",
        "Outputs the opposite of its input",
        "1.0.0",
        || Box::new(Inverter),
    ))?;
    builder.register_component_widget(
        WidgetDescriptor::new("inverter", "Inverter", "Logic", || Box::new(InverterWidget))
            .with_icon("inverter.icon.png")
            .with_image("high", "inverter.high.png")
            .with_image("low", "inverter.low.png"),
    )?;
    builder.register_renderer(canvas_renderer(CanvasConfig::default()))?;

    // 2. Load renderers and images once
    let mut circuit = builder.init(&FakeImages::default()).await;
    let id = circuit
        .create_workspace("ring", Viewport::new(1280.0, 720.0))
        .ok_or_else(|| anyhow::anyhow!("no renderer available"))?;

    // 3. Three inverters in a ring oscillate with a period of six ticks
    let session = circuit
        .session_mut(id)
        .ok_or_else(|| anyhow::anyhow!("workspace vanished"))?;
    let gates: Vec<_> = (0..3)
        .map(|i| session.add_component("inverter", ComponentArgs::at(Vec2::new(i as f32 * 200.0 - 200.0, 0.0))))
        .collect::<Result<_, _>>()?;
    for i in 0..gates.len() {
        let next = gates[(i + 1) % gates.len()];
        session
            .workspace_mut()
            .connect_pins(PinInfo::output(gates[i], 0), PinInfo::input(next, 0))?;
    }
    session.renderer_mut().set_show_render_stats(true);

    // 4. Drive a few frames, hovering over the middle gate
    let mut editor = Editor::default();
    let input = InputState {
        mouse_pos: Vec2::new(640.0, 360.0),
        mouse_buttons: MouseButtons::default(),
        screen_size: Vec2::new(1280.0, 720.0),
        ..Default::default()
    };

    for frame in 0..8 {
        println!("\n--- Frame {frame} ---");
        let events = editor.handle_input(session, &input);
        let draw_list = session.frame(1.0 / 60.0);

        let states: Vec<bool> = gates
            .iter()
            .filter_map(|g| session.workspace().component(*g))
            .map(|c| c.outputs()[0])
            .collect();
        println!("  Outputs: {states:?}");
        println!("  Hovered: {:?}", session.renderer().component_under_cursor());
        println!("  Draw commands: {}", draw_list.len());
        if let Some(DrawCommand::Text { text, .. }) = draw_list.last() {
            println!("  {text}");
        }
        if !events.is_empty() {
            println!("  Editor events: {events:?}");
        }
    }

    println!("\nDemo Complete.");
    Ok(())
}
