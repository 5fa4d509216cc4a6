//! End-to-end gesture scenarios: pointer events in, committed shapes out.

use egui::pos2;
use inkboard::shape::StrokeStyle;
use inkboard::{
    CanvasController, SequentialIdSource, ShapeKind, StrokeConfig, Tool, Transform,
};
use uuid::Uuid;

fn controller(tool: Tool) -> CanvasController {
    let mut c = CanvasController::with_id_source(Box::new(SequentialIdSource::default()));
    c.set_active_tool(tool);
    c
}

#[test]
fn pen_stroke_commits_every_sampled_point() {
    let t = Transform::default();
    let mut c = controller(Tool::Pen);
    let config = StrokeConfig::default();

    c.pointer_down(pos2(5.0, 5.0), &t);
    c.pointer_move(pos2(6.0, 5.0), &t);
    c.pointer_move(pos2(7.0, 6.0), &t);
    let id = c.pointer_up(&config).expect("pen stroke should commit");

    assert_eq!(id, Uuid::from_u128(1));
    let doc = c.document();
    assert_eq!(doc.len(), 1);
    let shape = &doc.shapes()[0];
    assert_eq!(shape.kind, ShapeKind::Pen);
    assert_eq!(
        shape.points,
        vec![pos2(5.0, 5.0), pos2(6.0, 5.0), pos2(7.0, 6.0)]
    );
    // No leftover in-progress state.
    assert!(!c.is_drawing());
    assert!(c.preview_shape(&config).is_none());
}

#[test]
fn stroke_config_is_captured_at_commit_time() {
    let t = Transform::default();
    let mut c = controller(Tool::Line);
    let config = StrokeConfig {
        width: 5.0,
        style: StrokeStyle::Dashed,
        ..StrokeConfig::default()
    };

    c.pointer_down(pos2(0.0, 0.0), &t);
    c.pointer_move(pos2(10.0, 0.0), &t);
    c.pointer_up(&config).unwrap();

    let shape = &c.document().shapes()[0];
    assert_eq!(shape.width, 5.0);
    assert_eq!(shape.style, StrokeStyle::Dashed);
}

#[test]
fn rectangle_click_without_movement_is_aborted() {
    let t = Transform::default();
    let mut c = controller(Tool::Rectangle);

    c.pointer_down(pos2(10.0, 10.0), &t);
    // No pointer_move: nothing accumulated.
    assert_eq!(c.pointer_up(&StrokeConfig::default()), None);
    assert!(c.document().is_empty());
}

#[test]
fn pointer_leave_commits_like_a_release() {
    let t = Transform::default();
    let mut c = controller(Tool::Pen);

    c.pointer_down(pos2(0.0, 0.0), &t);
    c.pointer_move(pos2(5.0, 5.0), &t);
    let id = c.pointer_leave(&StrokeConfig::default());
    assert!(id.is_some());
    assert_eq!(c.document().len(), 1);
    assert!(!c.is_drawing());
}

#[test]
fn shapes_draw_in_world_space_under_pan_and_zoom() {
    // Screen (110, 60) with pan (100, 50) and zoom 2 is world (5, 5).
    let t = Transform::new(100.0, 50.0, 2.0);
    let mut c = controller(Tool::Line);

    c.pointer_down(pos2(110.0, 60.0), &t);
    c.pointer_move(pos2(120.0, 70.0), &t);
    c.pointer_up(&StrokeConfig::default()).unwrap();

    let shape = &c.document().shapes()[0];
    assert_eq!(shape.points, vec![pos2(5.0, 5.0), pos2(10.0, 10.0)]);
}

#[test]
fn eraser_removes_only_the_topmost_hit() {
    let t = Transform::default();
    let mut c = controller(Tool::Line);
    let config = StrokeConfig::default();

    // Two overlapping lines, then a third far away.
    c.pointer_down(pos2(0.0, 0.0), &t);
    c.pointer_move(pos2(100.0, 0.0), &t);
    let bottom = c.pointer_up(&config).unwrap();
    c.pointer_down(pos2(0.0, 1.0), &t);
    c.pointer_move(pos2(100.0, 1.0), &t);
    let top = c.pointer_up(&config).unwrap();
    c.pointer_down(pos2(500.0, 500.0), &t);
    c.pointer_move(pos2(600.0, 500.0), &t);
    let far = c.pointer_up(&config).unwrap();

    c.set_active_tool(Tool::Eraser);
    c.pointer_down(pos2(50.0, 0.0), &t);

    let remaining: Vec<_> = c.document().shapes().iter().map(|s| s.id).collect();
    assert_eq!(remaining, vec![bottom, far]);
    assert!(c.document().get(top).is_none());
}

#[test]
fn eraser_misses_leave_the_document_alone() {
    let t = Transform::default();
    let mut c = controller(Tool::Line);
    c.pointer_down(pos2(0.0, 0.0), &t);
    c.pointer_move(pos2(10.0, 0.0), &t);
    c.pointer_up(&StrokeConfig::default()).unwrap();

    c.set_active_tool(Tool::Eraser);
    c.pointer_down(pos2(400.0, 400.0), &t);
    assert_eq!(c.document().len(), 1);
}
