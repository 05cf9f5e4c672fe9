use std::sync::Arc;

use circuit_core::{
    ComponentArgs, ComponentDescriptor, GraphError, PinCounts, PinDirection, PinInfo, Simulatable,
    Workspace,
};
use glam::Vec2;

struct Gate {
    inputs: usize,
    outputs: usize,
}

impl Simulatable<bool> for Gate {
    fn pin_counts(&self) -> PinCounts {
        PinCounts::new(self.inputs, self.outputs)
    }

    fn update(&mut self, inputs: &[bool], outputs: &mut [bool]) {
        let any = inputs.iter().any(|v| *v);
        for out in outputs.iter_mut() {
            *out = any;
        }
    }
}

fn gate(name: &str, inputs: usize, outputs: usize) -> Arc<ComponentDescriptor<bool>> {
    Arc::new(ComponentDescriptor::new(name, "test gate", "1.0.0.0", move || {
        Box::new(Gate { inputs, outputs })
    }))
}

#[test]
fn test_add_component_fixes_pin_arity() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("or2", 2, 1);

    let id = ws.add_component(&desc, ComponentArgs::at(Vec2::new(10.0, 20.0)));
    let component = ws.component(id).unwrap();

    assert_eq!(component.inputs(), &[false, false]);
    assert_eq!(component.outputs(), &[false]);
    assert_eq!(component.name(), "or2");
    assert_eq!(ws.component_position(id), Some(Vec2::new(10.0, 20.0)));
}

#[test]
fn test_components_keep_insertion_order() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());
    let c = ws.add_component(&desc, ComponentArgs::default());

    ws.remove_component(b).unwrap();
    let d = ws.add_component(&desc, ComponentArgs::default());

    let ids: Vec<_> = ws.components().map(|c| c.id()).collect();
    assert_eq!(ids, vec![a, c, d]);
}

#[test]
fn test_connect_requires_output_to_input() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());

    let err = ws
        .connect_pins(PinInfo::input(a, 0), PinInfo::input(b, 0))
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::InvalidDirection {
            from: PinDirection::Input,
            to: PinDirection::Input
        }
    );

    let err = ws
        .connect_pins(PinInfo::output(a, 0), PinInfo::output(b, 0))
        .unwrap_err();
    assert!(matches!(err, GraphError::InvalidDirection { .. }));
    assert_eq!(ws.connection_count(), 0);
}

#[test]
fn test_single_driver_rule() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());
    let c = ws.add_component(&desc, ComponentArgs::default());

    let first = ws
        .connect_pins(PinInfo::output(a, 0), PinInfo::input(c, 0))
        .unwrap();

    let err = ws
        .connect_pins(PinInfo::output(b, 0), PinInfo::input(c, 0))
        .unwrap_err();
    assert_eq!(
        err,
        GraphError::PinAlreadyDriven {
            pin: PinInfo::input(c, 0),
            existing: first
        }
    );

    // The rejected attempt left the original wire alone.
    let connections: Vec<_> = ws.connections().map(|(id, _)| id).collect();
    assert_eq!(connections, vec![first]);
    assert_eq!(ws.driver_of(&PinInfo::input(c, 0)), Some(first));

    // Disconnect first, then the second driver is accepted.
    ws.disconnect(first);
    assert!(
        ws.connect_pins(PinInfo::output(b, 0), PinInfo::input(c, 0))
            .is_ok()
    );
}

#[test]
fn test_fan_out_and_self_connection() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("or2", 2, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());

    ws.connect_pins(PinInfo::output(a, 0), PinInfo::input(b, 0))
        .unwrap();
    ws.connect_pins(PinInfo::output(a, 0), PinInfo::input(b, 1))
        .unwrap();
    ws.connect_pins(PinInfo::output(a, 0), PinInfo::input(a, 0))
        .unwrap();

    assert_eq!(ws.connection_count(), 3);
    assert!(ws.is_pin_connected(&PinInfo::output(a, 0)));
    assert!(ws.is_pin_connected(&PinInfo::input(a, 0)));
    assert!(!ws.is_pin_connected(&PinInfo::input(a, 1)));
    assert!(!ws.is_pin_connected(&PinInfo::output(b, 0)));
}

#[test]
fn test_connect_rejects_unknown_pins() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());

    let err = ws
        .connect_pins(PinInfo::output(a, 3), PinInfo::input(b, 0))
        .unwrap_err();
    assert!(matches!(err, GraphError::PinOutOfRange { count: 1, .. }));

    ws.remove_component(b).unwrap();
    let err = ws
        .connect_pins(PinInfo::output(a, 0), PinInfo::input(b, 0))
        .unwrap_err();
    assert_eq!(err, GraphError::ComponentNotFound(b));
    assert_eq!(ws.connection_count(), 0);
}

#[test]
fn test_remove_component_cascades_connections() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());
    let c = ws.add_component(&desc, ComponentArgs::default());

    ws.connect_pins(PinInfo::output(a, 0), PinInfo::input(b, 0))
        .unwrap();
    ws.connect_pins(PinInfo::output(b, 0), PinInfo::input(c, 0))
        .unwrap();
    let keep = ws
        .connect_pins(PinInfo::output(c, 0), PinInfo::input(a, 0))
        .unwrap();

    ws.remove_component(b).unwrap();

    let remaining: Vec<_> = ws.connections().map(|(id, _)| id).collect();
    assert_eq!(remaining, vec![keep]);
    assert!(ws.connections().all(|(_, conn)| !conn.touches(b)));
    assert!(!ws.is_pin_connected(&PinInfo::input(c, 0)));

    // c's input is free again.
    assert!(
        ws.connect_pins(PinInfo::output(a, 0), PinInfo::input(c, 0))
            .is_ok()
    );

    assert_eq!(
        ws.remove_component(b).unwrap_err(),
        GraphError::ComponentNotFound(b)
    );
}

#[test]
fn test_disconnect_is_idempotent() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::default());
    let b = ws.add_component(&desc, ComponentArgs::default());
    let id = ws
        .connect_pins(PinInfo::output(a, 0), PinInfo::input(b, 0))
        .unwrap();

    assert!(ws.disconnect(id).is_some());
    assert!(ws.disconnect(id).is_none());
    assert_eq!(ws.connection_count(), 0);
    assert!(!ws.is_pin_connected(&PinInfo::input(b, 0)));
}

#[test]
fn test_position_and_rotation_accessors() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let a = ws.add_component(&desc, ComponentArgs::at(Vec2::ZERO).with_rotation(1));

    ws.set_component_position(a, Vec2::new(-5.0, 7.5)).unwrap();
    assert_eq!(ws.component_position(a), Some(Vec2::new(-5.0, 7.5)));

    assert_eq!(ws.component_rotation(a), Some(1));
    assert_eq!(ws.rotate_component(a, 3).unwrap(), 0);
    ws.set_component_rotation(a, -1).unwrap();
    assert_eq!(ws.component_rotation(a), Some(3));
}

#[test]
fn test_rotation_is_normalised_for_raw_args() {
    let mut ws = Workspace::<bool>::new("test");
    let desc = gate("buf", 1, 1);
    let args = ComponentArgs {
        position: Vec2::ZERO,
        rotation: i32::MAX,
        ..Default::default()
    };
    let a = ws.add_component(&desc, args);
    assert_eq!(ws.component_rotation(a), Some(3));

    ws.component_mut(a).unwrap().args.rotation = i32::MAX;
    assert_eq!(ws.rotate_component(a, i32::MAX).unwrap(), 2);
    assert_eq!(ws.rotate_component(a, i32::MIN).unwrap(), 2);
    assert_eq!(ws.component_rotation(a), Some(2));
}

#[test]
fn test_remove_hub_component_drops_every_touching_connection() {
    let mut ws = Workspace::<bool>::new("test");
    let hub = ws.add_component(&gate("hub", 64, 1), ComponentArgs::default());
    let leaf = gate("leaf", 1, 1);

    let leaves: Vec<_> = (0..64)
        .map(|_| ws.add_component(&leaf, ComponentArgs::default()))
        .collect();
    for (i, &id) in leaves.iter().enumerate() {
        ws.connect_pins(PinInfo::output(id, 0), PinInfo::input(hub, i))
            .unwrap();
        ws.connect_pins(PinInfo::output(hub, 0), PinInfo::input(id, 0))
            .unwrap();
    }
    let other = ws.add_component(&leaf, ComponentArgs::default());
    let keep = ws
        .connect_pins(PinInfo::output(leaves[0], 0), PinInfo::input(other, 0))
        .unwrap();
    assert_eq!(ws.connection_count(), 129);

    ws.remove_component(hub).unwrap();

    let remaining: Vec<_> = ws.connections().map(|(id, _)| id).collect();
    assert_eq!(remaining, vec![keep]);
    assert_eq!(ws.connection_count(), 1);
    for &id in &leaves {
        assert!(!ws.is_pin_connected(&PinInfo::input(id, 0)));
    }
    assert!(ws.is_pin_connected(&PinInfo::input(other, 0)));
}
