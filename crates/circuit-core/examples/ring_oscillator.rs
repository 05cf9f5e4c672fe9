use circuit_core::{
    ComponentArgs, ComponentDescriptor, ComponentRegistry, PinCounts, PinInfo, Scheduler,
    Simulatable, Workspace,
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

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut registry = ComponentRegistry::new();
    registry.register(ComponentDescriptor::new(
        "inverter",
        "Outputs the opposite of its input",
        "1.0.0",
        || Box::new(Inverter),
    ))?;

    // Five inverters wired in a loop. The loop is odd, so it never settles.
    let inverter = registry.lookup("inverter")?;
    let mut workspace = Workspace::new("ring");
    let gates: Vec<_> = (0..5)
        .map(|i| workspace.add_component(&inverter, ComponentArgs::at(Vec2::new(i as f32 * 100.0, 0.0))))
        .collect();
    for (i, gate) in gates.iter().enumerate() {
        let next = gates[(i + 1) % gates.len()];
        workspace.connect_pins(PinInfo::output(*gate, 0), PinInfo::input(next, 0))?;
    }

    let mut scheduler = Scheduler::new();
    for _ in 0..12 {
        let stats = scheduler.step(&mut workspace);
        let outputs: String = gates
            .iter()
            .filter_map(|g| workspace.component(*g))
            .map(|c| if c.outputs()[0] { '1' } else { '0' })
            .collect();
        println!("tick {:>2}: {outputs}", stats.tick);
    }
    Ok(())
}
