mod common;

use circuit_canvas::DrawCommand;
use circuit_core::{ComponentArgs, PinInfo};
use common::{TestLoader, circuit, circuit_with};
use glam::Vec2;

fn count(list: &[DrawCommand], pred: impl Fn(&DrawCommand) -> bool) -> usize {
    list.iter().filter(|c| pred(c)).count()
}

fn is_image(c: &DrawCommand) -> bool {
    matches!(c, DrawCommand::Image { .. })
}

fn is_circle(c: &DrawCommand) -> bool {
    matches!(c, DrawCommand::Circle { .. })
}

fn lines(list: &[DrawCommand]) -> Vec<(Vec2, Vec2, f32)> {
    list.iter()
        .filter_map(|c| match c {
            DrawCommand::Line { start, end, width, .. } => Some((*start, *end, *width)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_empty_workspace_draws_grid_anchors() {
    let (mut circuit, id) = circuit();
    let list = circuit.frame(id, 0.016).unwrap();

    // Viewport 800x600 at zoom 1: anchors every 100px from (0, 0).
    assert_eq!(list.len(), 9 * 7);
    assert!(list.iter().all(|c| matches!(
        c,
        DrawCommand::Circle { radius, .. } if *radius == 3.0
    )));

    circuit.renderer_mut(id).unwrap().set_grid_visible(false);
    assert!(circuit.frame(id, 0.016).unwrap().is_empty());
}

#[test]
fn test_dense_grid_draws_every_nth_snap_point() {
    let (mut circuit, id) = circuit();
    circuit.renderer_mut(id).unwrap().set_grid_snap_spacing(0.5);

    let list = circuit.frame(id, 0.016).unwrap();

    // 0.5px apart doubles to 8px: 101 columns by 76 rows.
    assert_eq!(list.len(), 101 * 76);
    assert!(list.iter().all(|c| matches!(
        c,
        DrawCommand::Circle { center, .. } if center.x % 8.0 == 0.0 && center.y % 8.0 == 0.0
    )));
    assert_eq!(circuit.renderer(id).unwrap().grid_snap_spacing(), 0.5);
}

#[test]
fn test_anchor_count_is_bounded_when_zoomed_out() {
    let (mut circuit, id) = circuit();
    let renderer = circuit.renderer_mut(id).unwrap();
    renderer.set_grid_snap_spacing(0.01);
    renderer.modify_zoom(-0.99);

    let bound = (800 / 8 + 2) * (600 / 8 + 2);
    for _ in 0..30 {
        let list = circuit.frame(id, 0.016).unwrap();
        assert!(!list.is_empty());
        assert!(list.len() <= bound, "{} anchors", list.len());
    }
}

#[test]
fn test_draws_components_pins_and_connections() {
    let (mut circuit, id) = circuit();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);

    let session = circuit.session_mut(id).unwrap();
    let power = session
        .add_component("power", ComponentArgs::at(Vec2::new(-200.0, 0.0)))
        .unwrap();
    let not = session.add_component("not", ComponentArgs::at(Vec2::ZERO)).unwrap();
    session
        .workspace_mut()
        .connect_pins(PinInfo::output(power, 0), PinInfo::input(not, 0))
        .unwrap();

    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(count(&list, is_image), 2);
    assert_eq!(count(&list, is_circle), 3, "one pin on power, two on not");

    let drawn = lines(&list);
    assert_eq!(drawn.len(), 1);
    let (start, end, width) = drawn[0];
    assert_eq!(start, Vec2::new(250.0, 300.0));
    assert_eq!(end, Vec2::new(350.0, 300.0));
    assert_eq!(width, 4.0);

    let stats = *circuit.renderer(id).unwrap().render_stats();
    assert_eq!(stats.rendered_components, 2);
    assert_eq!(stats.total_components, 2);
    assert_eq!(stats.rendered_pins, 3);
    assert_eq!(stats.total_pins, 3);
    assert_eq!(stats.connections, 1);
}

#[test]
fn test_connection_style_follows_source_value() {
    let (mut circuit, id) = circuit();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);

    let session = circuit.session_mut(id).unwrap();
    let first = session.add_component("not", ComponentArgs::at(Vec2::ZERO)).unwrap();
    let second = session
        .add_component("not", ComponentArgs::at(Vec2::new(200.0, 0.0)))
        .unwrap();
    session
        .workspace_mut()
        .connect_pins(PinInfo::output(first, 0), PinInfo::input(second, 0))
        .unwrap();

    let config = circuit_canvas::CanvasConfig::default();
    let color_of = |list: &[DrawCommand]| {
        list.iter().find_map(|c| match c {
            DrawCommand::Line { color, .. } => Some(*color),
            _ => None,
        })
    };

    // Tick 1: the first inverter sees false on its open input and drives true.
    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(color_of(&list), Some(config.connection.active.color));

    let (connection, _) = circuit.workspace(id).unwrap().connections().next().unwrap();
    circuit.workspace_mut(id).unwrap().disconnect(connection);
    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(color_of(&list), None);
}

#[test]
fn test_offscreen_components_are_culled_but_keep_simulating() {
    let (mut circuit, id) = circuit();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);

    let session = circuit.session_mut(id).unwrap();
    let power = session.add_component("power", ComponentArgs::at(Vec2::ZERO)).unwrap();
    let far = session
        .add_component("not", ComponentArgs::at(Vec2::new(5000.0, 0.0)))
        .unwrap();
    session
        .workspace_mut()
        .connect_pins(PinInfo::output(power, 0), PinInfo::input(far, 0))
        .unwrap();

    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(count(&list, is_image), 1);

    let stats = *circuit.renderer(id).unwrap().render_stats();
    assert_eq!(stats.rendered_components, 1);
    assert_eq!(stats.total_components, 2);
    assert_eq!(stats.rendered_pins, 1);
    assert_eq!(stats.total_pins, 3);

    let far = circuit.workspace(id).unwrap().component(far).unwrap();
    assert_eq!(far.inputs(), &[true]);
    assert_eq!(far.outputs(), &[false]);
}

#[test]
fn test_unloaded_image_skips_drawing_not_simulation() {
    let loader = TestLoader::failing(&["not.off.png"]);
    let mut circuit = circuit_with(&loader);
    let id = circuit
        .create_workspace("main", circuit_canvas::Viewport::new(800.0, 600.0))
        .unwrap();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);

    let not = circuit
        .session_mut(id)
        .unwrap()
        .add_component("not", ComponentArgs::at(Vec2::ZERO))
        .unwrap();

    // Tick 1 drives the output high, so the "on" image is requested: drawn.
    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(count(&list, is_image), 1);

    // Feed the output back so it alternates; the "off" image is missing.
    circuit
        .workspace_mut(id)
        .unwrap()
        .connect_pins(PinInfo::output(not, 0), PinInfo::input(not, 0))
        .unwrap();

    let list = circuit.frame(id, 0.016).unwrap();
    assert!(!circuit.workspace(id).unwrap().component(not).unwrap().outputs()[0]);
    assert_eq!(count(&list, is_image), 0);
    assert_eq!(count(&list, is_circle), 0, "pins of skipped components are not drawn");
    assert!(lines(&list).is_empty(), "the self-loop is hidden with its component");
    assert_eq!(circuit.renderer(id).unwrap().render_stats().total_components, 1);
    assert_eq!(circuit.renderer(id).unwrap().render_stats().connections, 1);

    let list = circuit.frame(id, 0.016).unwrap();
    assert!(circuit.workspace(id).unwrap().component(not).unwrap().outputs()[0]);
    assert_eq!(count(&list, is_image), 1);
    assert_eq!(lines(&list).len(), 1);
}

#[test]
fn test_no_wire_into_component_with_unloaded_image() {
    let loader = TestLoader::failing(&["not.off.png"]);
    let mut circuit = circuit_with(&loader);
    let id = circuit
        .create_workspace("main", circuit_canvas::Viewport::new(800.0, 600.0))
        .unwrap();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);

    let session = circuit.session_mut(id).unwrap();
    let a = session
        .add_component("not", ComponentArgs::at(Vec2::new(-200.0, 0.0)))
        .unwrap();
    let b = session.add_component("not", ComponentArgs::at(Vec2::ZERO)).unwrap();
    session
        .workspace_mut()
        .connect_pins(PinInfo::output(a, 0), PinInfo::input(b, 0))
        .unwrap();

    // Both outputs go high on the first tick; both are drawn and so is the wire.
    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(count(&list, is_image), 2);
    assert_eq!(lines(&list).len(), 1);

    // b now sees a's high output and switches to its missing "off" image.
    let list = circuit.frame(id, 0.016).unwrap();
    assert!(!circuit.workspace(id).unwrap().component(b).unwrap().outputs()[0]);
    assert_eq!(count(&list, is_image), 1);
    assert!(lines(&list).is_empty());
}

#[test]
fn test_components_without_widget_are_not_drawn() {
    let (mut circuit, id) = circuit();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);
    let session = circuit.session_mut(id).unwrap();
    let power = session.add_component("power", ComponentArgs::at(Vec2::ZERO)).unwrap();
    let hidden = session.add_component("hidden", ComponentArgs::at(Vec2::ZERO)).unwrap();
    session
        .workspace_mut()
        .connect_pins(PinInfo::output(power, 0), PinInfo::input(hidden, 0))
        .unwrap();

    let list = circuit.frame(id, 0.016).unwrap();
    assert_eq!(count(&list, is_image), 1);
    assert!(lines(&list).is_empty(), "no position for the hidden end");
    assert_eq!(
        circuit.workspace(id).unwrap().component(hidden).unwrap().inputs(),
        &[true]
    );
}

#[test]
fn test_rotated_image_transform() {
    let (mut circuit, id) = circuit();
    circuit.renderer_mut(id).unwrap().set_grid_visible(false);
    circuit
        .session_mut(id)
        .unwrap()
        .add_component("not", ComponentArgs::at(Vec2::ZERO).with_rotation(1))
        .unwrap();

    let list = circuit.frame(id, 0.016).unwrap();
    let transform = list
        .iter()
        .find_map(|c| match c {
            DrawCommand::Image { transform, size, .. } => {
                assert_eq!(*size, Vec2::new(100.0, 50.0));
                Some(*transform)
            }
            _ => None,
        })
        .unwrap();

    // The image corner swings around the widget center.
    let corner = transform.transform_point2(Vec2::ZERO);
    assert!(corner.abs_diff_eq(Vec2::new(425.0, 250.0), 1e-4), "{corner:?}");
    let center = transform.transform_point2(Vec2::new(50.0, 25.0));
    assert!(center.abs_diff_eq(Vec2::new(400.0, 300.0), 1e-4), "{center:?}");
}

#[test]
fn test_stats_overlay() {
    let (mut circuit, id) = circuit();
    {
        let renderer = circuit.renderer_mut(id).unwrap();
        renderer.set_grid_visible(false);
        renderer.set_show_render_stats(true);
    }
    circuit
        .session_mut(id)
        .unwrap()
        .add_component("power", ComponentArgs::at(Vec2::ZERO))
        .unwrap();

    let list = circuit.frame(id, 0.02).unwrap();
    let Some(DrawCommand::Text { pos, text, .. }) = list.last() else {
        panic!("stats text should be drawn last");
    };
    assert_eq!(*pos, Vec2::new(10.0, 589.0));
    assert!(text.starts_with("Rendered components: (1/1) | Rendered pins: (1/1)"), "{text}");
    assert!(text.ends_with("Frame time = 20.00ms (50 fps)"), "{text}");
}
