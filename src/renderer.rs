//! Lowers [`DrawnShape`]s into `egui::Shape`s for the current pan-zoom
//! transform. Everything except text layout is a pure function over the
//! shape data, so the geometry of the output can be unit tested without a
//! live UI.

use egui::{
    Color32, FontFamily, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, epaint::TextShape, pos2,
    vec2,
};

use crate::geometry::{Ellipse, Transform, diamond_vertices, reconstruct_ellipse, shape_bounds};
use crate::shape::{DrawnShape, ShapeKind, StrokeStyle, TextDirection};

/// Opacity applied to the in-progress preview shape.
pub const PREVIEW_ALPHA: f32 = 0.3;

/// Arrow head length in world units.
pub const ARROW_HEAD_LEN: f32 = 15.0;
const ARROW_HEAD_ANGLE: f32 = std::f32::consts::FRAC_PI_6;

/// Screen-space geometry of the selection overlay.
pub const SELECTION_PADDING: f32 = 5.0;
pub const ROTATION_HANDLE_OFFSET: f32 = 25.0;
pub const ROTATION_HANDLE_RADIUS: f32 = 8.0;

const SELECTION_COLOR: Color32 = Color32::from_rgb(0x0D, 0x99, 0xFF);
const MARQUEE_BORDER: Color32 = Color32::from_rgb(0x35, 0x5E, 0xA1);
const MARQUEE_FILL: Color32 = Color32::from_rgba_premultiplied(6, 13, 25, 26);

const ELLIPSE_SEGMENTS: usize = 64;

/// Sample `n` points along a (possibly rotated) ellipse outline.
pub fn ellipse_points(ellipse: &Ellipse, n: usize) -> Vec<Pos2> {
    let (sin_rot, cos_rot) = ellipse.rotation.sin_cos();
    (0..n)
        .map(|i| {
            let t = i as f32 / n as f32 * std::f32::consts::TAU;
            let (x, y) = (ellipse.radius_x * t.cos(), ellipse.radius_y * t.sin());
            pos2(
                ellipse.center.x + x * cos_rot - y * sin_rot,
                ellipse.center.y + x * sin_rot + y * cos_rot,
            )
        })
        .collect()
}

fn polyline(points: Vec<Pos2>, closed: bool, stroke: Stroke, dash: Option<(f32, f32)>) -> Vec<Shape> {
    if points.len() < 2 {
        return Vec::new();
    }
    match dash {
        Some((dash_len, gap_len)) => {
            let mut pts = points;
            if closed {
                pts.push(pts[0]);
            }
            Shape::dashed_line(&pts, stroke, dash_len, gap_len)
        }
        None if closed => vec![Shape::closed_line(points, stroke)],
        None if points.len() == 2 => vec![Shape::line_segment([points[0], points[1]], stroke)],
        None => vec![Shape::line(points, stroke)],
    }
}

/// Lower one vector shape into egui shapes, in screen space.
///
/// Preview shapes render at reduced opacity and always solid; committed
/// shapes apply their dash pattern (`dashed` 10/5, `dotted` 2/4, in world
/// units, scaled with the zoom). Text is layed out by [`draw_shape`]
/// instead since it needs font access.
pub fn shape_to_egui(shape: &DrawnShape, transform: &Transform, preview: bool) -> Vec<Shape> {
    if shape.points.len() < shape.kind.min_points() {
        // Malformed shapes are silently not drawn.
        return Vec::new();
    }

    let k = transform.k;
    let color = if preview {
        shape.color.gamma_multiply(PREVIEW_ALPHA)
    } else {
        shape.color
    };
    let stroke = Stroke::new(shape.width * k, color);
    let dash = if preview {
        None
    } else {
        match shape.style {
            StrokeStyle::Solid => None,
            StrokeStyle::Dashed => Some((10.0 * k, 5.0 * k)),
            StrokeStyle::Dotted => Some((2.0 * k, 4.0 * k)),
        }
    };
    let map = |pts: &[Pos2]| -> Vec<Pos2> {
        pts.iter().map(|p| transform.world_to_screen(*p)).collect()
    };

    match shape.kind {
        ShapeKind::Pen => polyline(map(&shape.points), false, stroke, dash),

        ShapeKind::Line => polyline(map(&shape.points[..2]), false, stroke, dash),

        ShapeKind::Arrow => {
            let (start, end) = (shape.points[0], shape.points[1]);
            let angle = (end.y - start.y).atan2(end.x - start.x);
            let head = |side: f32| {
                end - ARROW_HEAD_LEN
                    * vec2(
                        (angle + side * ARROW_HEAD_ANGLE).cos(),
                        (angle + side * ARROW_HEAD_ANGLE).sin(),
                    )
            };
            // Shaft plus two independent head strokes.
            let mut shapes = polyline(map(&[start, end]), false, stroke, dash);
            shapes.extend(polyline(map(&[end, head(-1.0)]), false, stroke, dash));
            shapes.extend(polyline(map(&[end, head(1.0)]), false, stroke, dash));
            shapes
        }

        ShapeKind::Rectangle => {
            let corners = if shape.points.len() > 2 {
                shape.points.clone()
            } else {
                let r = Rect::from_two_pos(shape.points[0], shape.points[1]);
                vec![r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom()]
            };
            polyline(map(&corners), true, stroke, dash)
        }

        ShapeKind::Circle => {
            let ellipse = if shape.points.len() > 2 {
                match reconstruct_ellipse(&shape.points) {
                    Some(e) => e,
                    None => return Vec::new(),
                }
            } else {
                let r = Rect::from_two_pos(shape.points[0], shape.points[1]);
                Ellipse {
                    center: r.center(),
                    radius_x: r.width() / 2.0,
                    radius_y: r.height() / 2.0,
                    rotation: 0.0,
                }
            };
            polyline(
                map(&ellipse_points(&ellipse, ELLIPSE_SEGMENTS)),
                true,
                stroke,
                dash,
            )
        }

        ShapeKind::Diamond => {
            let vertices = if shape.points.len() > 2 {
                shape.points.clone()
            } else {
                diamond_vertices(shape.points[0], shape.points[1]).to_vec()
            };
            polyline(map(&vertices), true, stroke, dash)
        }

        ShapeKind::Text => Vec::new(),
    }
}

/// Render one shape (committed or preview) onto the painter.
pub fn draw_shape(painter: &Painter, shape: &DrawnShape, transform: &Transform, preview: bool) {
    if shape.kind == ShapeKind::Text {
        draw_text(painter, shape, transform, preview);
    } else {
        painter.extend(shape_to_egui(shape, transform, preview));
    }
}

fn draw_text(painter: &Painter, shape: &DrawnShape, transform: &Transform, preview: bool) {
    let Some(text) = shape.text.as_deref() else {
        return;
    };
    let Some(&anchor_world) = shape.points.first() else {
        return;
    };

    let color = if preview {
        shape.color.gamma_multiply(PREVIEW_ALPHA)
    } else {
        shape.color
    };
    let font_id = FontId::new(shape.font_size() * transform.k, FontFamily::Proportional);
    let line_height = shape.font_size() * 1.2 * transform.k;
    let anchor = transform.world_to_screen(anchor_world);
    // Uniform scale, so the screen angle equals the world angle.
    let angle = match shape.points.get(1) {
        Some(dir) => (dir.y - anchor_world.y).atan2(dir.x - anchor_world.x),
        None => 0.0,
    };
    let rtl = shape.effective_text_dir() == TextDirection::Rtl;

    for (i, line) in text.split('\n').enumerate() {
        let galley = painter.layout_no_wrap(line.to_owned(), font_id.clone(), color);
        // Right-aligned anchor for RTL text; the block rotates around the
        // anchor, so offsets are rotated too.
        let dx = if rtl { -galley.size().x } else { 0.0 };
        let local = vec2(dx, i as f32 * line_height);
        let pos = anchor + rotate_vec(local, angle);
        painter.add(Shape::Text(
            TextShape::new(pos, galley, color).with_angle(angle),
        ));
    }
}

fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    vec2(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Screen-space center of a shape's rotation handle, sitting above the
/// padded selection box. `None` for shapes with no points.
pub fn rotation_handle_center(shape: &DrawnShape, transform: &Transform) -> Option<Pos2> {
    let rect = selection_rect(shape, transform)?;
    Some(pos2(rect.center().x, rect.min.y - ROTATION_HANDLE_OFFSET))
}

fn selection_rect(shape: &DrawnShape, transform: &Transform) -> Option<Rect> {
    let bounds = shape_bounds(shape)?;
    let rect = Rect::from_two_pos(
        transform.world_to_screen(bounds.min),
        transform.world_to_screen(bounds.max),
    );
    Some(rect.expand(SELECTION_PADDING))
}

/// Selection overlay: a rectangle around the padded bounds plus the
/// rotation handle (stalk, filled circle, curved-arrow glyph). All sizes
/// are in screen pixels so the overlay stays constant-sized under zoom.
pub fn selection_box_shapes(shape: &DrawnShape, transform: &Transform) -> Vec<Shape> {
    let Some(rect) = selection_rect(shape, transform) else {
        return Vec::new();
    };
    let Some(handle) = rotation_handle_center(shape, transform) else {
        return Vec::new();
    };
    let stroke = Stroke::new(1.5, SELECTION_COLOR);

    let mut shapes = vec![
        Shape::rect_stroke(rect, 0.0, stroke),
        // Stalk from the top edge up to the handle.
        Shape::line_segment(
            [
                pos2(handle.x, rect.min.y),
                pos2(handle.x, handle.y + ROTATION_HANDLE_RADIUS),
            ],
            stroke,
        ),
        Shape::circle_filled(handle, ROTATION_HANDLE_RADIUS, Color32::WHITE),
        Shape::circle_stroke(handle, ROTATION_HANDLE_RADIUS, stroke),
    ];

    // Curved-arrow glyph inside the handle: a partial arc with a small
    // arrow head at its end.
    let glyph_r = 3.0;
    let arc_start = -std::f32::consts::PI * 0.7;
    let arc_end = std::f32::consts::PI * 0.3;
    let steps = 16;
    let arc: Vec<Pos2> = (0..=steps)
        .map(|i| {
            let t = arc_start + (arc_end - arc_start) * i as f32 / steps as f32;
            pos2(handle.x + glyph_r * t.cos(), handle.y + glyph_r * t.sin())
        })
        .collect();
    let glyph_stroke = Stroke::new(1.0, SELECTION_COLOR);
    shapes.push(Shape::line(arc, glyph_stroke));

    let tip = pos2(
        handle.x + glyph_r * arc_end.cos(),
        handle.y + glyph_r * arc_end.sin(),
    );
    let arrow = 2.0;
    shapes.push(Shape::line_segment(
        [tip, pos2(tip.x + arrow, tip.y - arrow)],
        glyph_stroke,
    ));
    shapes.push(Shape::line_segment(
        [tip, pos2(tip.x + arrow, tip.y + arrow)],
        glyph_stroke,
    ));

    shapes
}

/// Marquee overlay: a translucent fill with a dashed border between the
/// two world-space corner points.
pub fn marquee_shapes(start: Pos2, end: Pos2, transform: &Transform) -> Vec<Shape> {
    let rect = Rect::from_two_pos(
        transform.world_to_screen(start),
        transform.world_to_screen(end),
    );
    let border = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    let mut shapes = vec![Shape::rect_filled(rect, 0.0, MARQUEE_FILL)];
    shapes.extend(Shape::dashed_line(
        &border,
        Stroke::new(1.0, MARQUEE_BORDER),
        5.0,
        3.0,
    ));
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::StrokeConfig;
    use uuid::Uuid;

    fn config() -> StrokeConfig {
        StrokeConfig::default()
    }

    fn shape(kind: ShapeKind, points: Vec<Pos2>) -> DrawnShape {
        DrawnShape::try_new(Uuid::nil(), kind, points, &config()).unwrap()
    }

    fn segments(shapes: &[Shape]) -> Vec<[Pos2; 2]> {
        shapes
            .iter()
            .filter_map(|s| match s {
                Shape::LineSegment { points, .. } => Some(*points),
                _ => None,
            })
            .collect()
    }

    fn approx(a: Pos2, b: Pos2) -> bool {
        (a.x - b.x).abs() < 1e-3 && (a.y - b.y).abs() < 1e-3
    }

    #[test]
    fn arrow_emits_shaft_and_two_heads() {
        let arrow = shape(ShapeKind::Arrow, vec![pos2(0.0, 0.0), pos2(100.0, 0.0)]);
        let shapes = shape_to_egui(&arrow, &Transform::default(), false);
        let segs = segments(&shapes);
        assert_eq!(segs.len(), 3);

        let expect_a = pos2(100.0 - 15.0 * (std::f32::consts::FRAC_PI_6).cos(), 7.5);
        let expect_b = pos2(expect_a.x, -7.5);
        let heads: Vec<Pos2> = segs[1..].iter().map(|s| s[1]).collect();
        assert!(heads.iter().any(|h| approx(*h, expect_a)), "{heads:?}");
        assert!(heads.iter().any(|h| approx(*h, expect_b)), "{heads:?}");
        // Both head strokes start at the arrow tip.
        assert!(segs[1..].iter().all(|s| approx(s[0], pos2(100.0, 0.0))));
    }

    #[test]
    fn dashed_committed_line_is_split_into_dashes() {
        let mut line = shape(ShapeKind::Line, vec![pos2(0.0, 0.0), pos2(100.0, 0.0)]);
        line.style = StrokeStyle::Dashed;
        let shapes = shape_to_egui(&line, &Transform::default(), false);
        assert!(shapes.len() > 1);
    }

    #[test]
    fn preview_is_solid_and_translucent() {
        let mut line = shape(ShapeKind::Line, vec![pos2(0.0, 0.0), pos2(100.0, 0.0)]);
        line.style = StrokeStyle::Dashed;
        let shapes = shape_to_egui(&line, &Transform::default(), true);
        // A single solid segment despite the dashed style.
        let segs = segments(&shapes);
        assert_eq!(segs.len(), 1);
        match &shapes[0] {
            Shape::LineSegment { stroke, .. } => {
                let egui::epaint::ColorMode::Solid(color) = stroke.color else {
                    panic!("expected a solid stroke color, got {:?}", stroke.color);
                };
                assert!(color.a() < line.color.a());
            }
            other => panic!("expected a line segment, got {other:?}"),
        }
    }

    #[test]
    fn stroke_width_scales_with_zoom() {
        let line = shape(ShapeKind::Line, vec![pos2(0.0, 0.0), pos2(10.0, 0.0)]);
        let t = Transform::new(0.0, 0.0, 2.0);
        let shapes = shape_to_egui(&line, &t, false);
        match &shapes[0] {
            Shape::LineSegment { stroke, points } => {
                assert!((stroke.width - line.width * 2.0).abs() < 1e-6);
                assert!(approx(points[1], pos2(20.0, 0.0)));
            }
            other => panic!("expected a line segment, got {other:?}"),
        }
    }

    #[test]
    fn malformed_shape_is_not_drawn() {
        let mut line = shape(ShapeKind::Line, vec![pos2(0.0, 0.0), pos2(1.0, 1.0)]);
        line.points.truncate(1);
        assert!(shape_to_egui(&line, &Transform::default(), false).is_empty());
    }

    #[test]
    fn ellipse_points_lie_on_the_ellipse() {
        let e = Ellipse {
            center: pos2(10.0, 20.0),
            radius_x: 5.0,
            radius_y: 3.0,
            rotation: 0.0,
        };
        for p in ellipse_points(&e, 32) {
            let nx = (p.x - 10.0) / 5.0;
            let ny = (p.y - 20.0) / 3.0;
            assert!((nx * nx + ny * ny - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn rotated_ellipse_passes_through_its_cardinal_points() {
        let cardinals = [pos2(2.0, 0.0), pos2(0.0, 2.0), pos2(-2.0, 0.0)];
        let e = reconstruct_ellipse(&cardinals).unwrap();
        let pts = ellipse_points(&e, 4);
        // Sampling starts at the "right" cardinal and advances a quarter
        // turn per point.
        assert!(approx(pts[0], cardinals[1]));
        assert!(approx(pts[1], cardinals[2]));
    }

    #[test]
    fn rotation_handle_sits_above_the_selection_box() {
        let rect = shape(ShapeKind::Rectangle, vec![pos2(0.0, 0.0), pos2(10.0, 10.0)]);
        let t = Transform::new(0.0, 0.0, 1.0);
        let handle = rotation_handle_center(&rect, &t).unwrap();
        assert!(approx(
            handle,
            pos2(5.0, -SELECTION_PADDING - ROTATION_HANDLE_OFFSET)
        ));
        // The overlay offsets stay in screen pixels under zoom.
        let zoomed = Transform::new(0.0, 0.0, 4.0);
        let handle_zoomed = rotation_handle_center(&rect, &zoomed).unwrap();
        assert!(approx(
            handle_zoomed,
            pos2(20.0, -SELECTION_PADDING - ROTATION_HANDLE_OFFSET)
        ));
    }

    #[test]
    fn selection_box_has_handle_and_glyph() {
        let rect = shape(ShapeKind::Rectangle, vec![pos2(0.0, 0.0), pos2(10.0, 10.0)]);
        let shapes = selection_box_shapes(&rect, &Transform::default());
        let circles = shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle(_)))
            .count();
        // Filled handle plus its outline.
        assert_eq!(circles, 2);
        assert!(!segments(&shapes).is_empty());
    }

    #[test]
    fn marquee_covers_the_dragged_rect() {
        let shapes = marquee_shapes(pos2(10.0, 10.0), pos2(0.0, 0.0), &Transform::default());
        match &shapes[0] {
            Shape::Rect(r) => {
                assert!(approx(r.rect.min, pos2(0.0, 0.0)));
                assert!(approx(r.rect.max, pos2(10.0, 10.0)));
            }
            other => panic!("expected the fill rect first, got {other:?}"),
        }
        assert!(shapes.len() > 1);
    }
}
