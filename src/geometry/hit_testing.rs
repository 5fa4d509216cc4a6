//! Hit testing for selection: distance-to-stroke for vector shapes,
//! bounding-box tests for text, full-containment tests for the marquee.

use egui::Pos2;

use super::{distance_to_segment, shape_bounds};
use crate::shape::{DrawnShape, ShapeKind};

/// Default screen-space pick tolerance, in pixels.
pub const HIT_TOLERANCE: f32 = 25.0;

/// Test whether a world-space point lands on a shape's stroke.
///
/// `scale` is the current zoom factor (screen pixels per world unit) and is
/// used to keep the pick margin roughly constant on screen:
/// `margin = max(tolerance / scale, width / 2 + 5 / scale)`.
pub fn is_point_near_shape(point: Pos2, shape: &DrawnShape, scale: f32, tolerance: f32) -> bool {
    let Some(bounds) = shape_bounds(shape) else {
        return false;
    };

    let margin = (tolerance / scale).max(shape.width / 2.0 + 5.0 / scale);

    // Quick bounding box rejection.
    if point.x < bounds.min.x - margin
        || point.x > bounds.max.x + margin
        || point.y < bounds.min.y - margin
        || point.y > bounds.max.y + margin
    {
        return false;
    }

    match shape.kind {
        // Text blocks are solid: the bounding-box test above is the test.
        ShapeKind::Text => true,

        ShapeKind::Pen | ShapeKind::Line | ShapeKind::Arrow => {
            if shape.points.len() < 2 {
                // A single point is just its bounding box.
                return true;
            }
            shape
                .points
                .windows(2)
                .any(|seg| distance_to_segment(point, seg[0], seg[1]) <= margin)
        }

        // Rotated rectangles fall back to their unrotated bounding edges,
        // a known approximation.
        ShapeKind::Rectangle => {
            let near_vertical = (point.x - bounds.min.x).abs() <= margin
                || (point.x - bounds.max.x).abs() <= margin;
            let near_horizontal = (point.y - bounds.min.y).abs() <= margin
                || (point.y - bounds.max.y).abs() <= margin;
            near_vertical || near_horizontal
        }

        ShapeKind::Diamond => {
            let center = bounds.center();
            let vertices = [
                Pos2::new(center.x, bounds.min.y),
                Pos2::new(bounds.max.x, center.y),
                Pos2::new(center.x, bounds.max.y),
                Pos2::new(bounds.min.x, center.y),
            ];
            (0..4).any(|i| distance_to_segment(point, vertices[i], vertices[(i + 1) % 4]) <= margin)
        }

        // Approximate ring test: normalize the point onto the unit circle
        // and scale the deviation by the average radius. Not exact for high
        // eccentricity.
        ShapeKind::Circle => {
            let rx = bounds.width() / 2.0;
            let ry = bounds.height() / 2.0;
            if rx == 0.0 || ry == 0.0 {
                return true;
            }
            let center = bounds.center();
            let dx = point.x - center.x;
            let dy = point.y - center.y;
            let norm_dist = ((dx * dx) / (rx * rx) + (dy * dy) / (ry * ry)).sqrt();
            let avg_r = (rx + ry) / 2.0;
            (norm_dist - 1.0).abs() * avg_r <= margin
        }
    }
}

/// True iff the shape's full bounding box is contained in the rectangle
/// spanned by the two marquee corners. Partial overlap does not select.
pub fn is_shape_in_marquee(shape: &DrawnShape, start: Pos2, end: Pos2) -> bool {
    let Some(bounds) = shape_bounds(shape) else {
        return false;
    };
    let min_x = start.x.min(end.x);
    let max_x = start.x.max(end.x);
    let min_y = start.y.min(end.y);
    let max_y = start.y.max(end.y);

    bounds.min.x >= min_x && bounds.max.x <= max_x && bounds.min.y >= min_y && bounds.max.y <= max_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{StrokeConfig, StrokeStyle};
    use egui::pos2;
    use uuid::Uuid;

    fn shape(kind: ShapeKind, points: Vec<Pos2>, width: f32) -> DrawnShape {
        let config = StrokeConfig {
            color: egui::Color32::WHITE,
            width,
            style: StrokeStyle::Solid,
        };
        DrawnShape::try_new(Uuid::nil(), kind, points, &config).unwrap()
    }

    #[test]
    fn line_hit_on_and_off_the_stroke() {
        let line = shape(
            ShapeKind::Line,
            vec![pos2(0.0, 0.0), pos2(100.0, 0.0)],
            2.0,
        );
        assert!(is_point_near_shape(pos2(50.0, 0.0), &line, 1.0, 5.0));
        assert!(!is_point_near_shape(pos2(50.0, 50.0), &line, 1.0, 5.0));
    }

    #[test]
    fn pick_margin_grows_when_zoomed_out() {
        let line = shape(
            ShapeKind::Line,
            vec![pos2(0.0, 0.0), pos2(100.0, 0.0)],
            2.0,
        );
        // 10 world units off the stroke: a miss at scale 1 with tolerance 5,
        // a hit at scale 0.25 where the same tolerance covers 20 world units.
        assert!(!is_point_near_shape(pos2(50.0, 10.0), &line, 1.0, 5.0));
        assert!(is_point_near_shape(pos2(50.0, 10.0), &line, 0.25, 5.0));
    }

    #[test]
    fn pen_hits_any_segment() {
        let pen = shape(
            ShapeKind::Pen,
            vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0)],
            2.0,
        );
        assert!(is_point_near_shape(pos2(10.0, 5.0), &pen, 1.0, 2.0));
        assert!(!is_point_near_shape(pos2(0.0, 10.0), &pen, 1.0, 2.0));
    }

    #[test]
    fn rectangle_hits_edges_not_interior() {
        let rect = shape(
            ShapeKind::Rectangle,
            vec![pos2(0.0, 0.0), pos2(100.0, 100.0)],
            2.0,
        );
        assert!(is_point_near_shape(pos2(0.0, 50.0), &rect, 1.0, 5.0));
        assert!(is_point_near_shape(pos2(50.0, 100.0), &rect, 1.0, 5.0));
        assert!(!is_point_near_shape(pos2(50.0, 50.0), &rect, 1.0, 5.0));
    }

    #[test]
    fn diamond_hits_cardinal_edges() {
        let diamond = shape(
            ShapeKind::Diamond,
            vec![pos2(0.0, 0.0), pos2(100.0, 100.0)],
            2.0,
        );
        // Midpoint of the top-right edge, between (50, 0) and (100, 50).
        assert!(is_point_near_shape(pos2(75.0, 25.0), &diamond, 1.0, 5.0));
        // Center of the diamond is not on any edge.
        assert!(!is_point_near_shape(pos2(50.0, 50.0), &diamond, 1.0, 5.0));
        // Bounding box corner lies outside the diamond's edges.
        assert!(!is_point_near_shape(pos2(2.0, 2.0), &diamond, 1.0, 5.0));
    }

    #[test]
    fn circle_hits_the_ring_only() {
        let circle = shape(
            ShapeKind::Circle,
            vec![pos2(0.0, 0.0), pos2(100.0, 100.0)],
            2.0,
        );
        assert!(is_point_near_shape(pos2(100.0, 50.0), &circle, 1.0, 5.0));
        assert!(!is_point_near_shape(pos2(50.0, 50.0), &circle, 1.0, 5.0));
    }

    #[test]
    fn text_is_a_solid_block() {
        let text = DrawnShape::text(
            Uuid::nil(),
            pos2(0.0, 0.0),
            "hello",
            16.0,
            &StrokeConfig::default(),
        );
        // Inside the estimated block.
        assert!(is_point_near_shape(pos2(20.0, 10.0), &text, 1.0, 5.0));
        assert!(!is_point_near_shape(pos2(200.0, 200.0), &text, 1.0, 5.0));
    }

    #[test]
    fn marquee_requires_full_containment() {
        let rect = shape(
            ShapeKind::Rectangle,
            vec![pos2(10.0, 10.0), pos2(20.0, 20.0)],
            2.0,
        );
        assert!(is_shape_in_marquee(&rect, pos2(0.0, 0.0), pos2(30.0, 30.0)));
        // Partial overlap is not enough.
        assert!(!is_shape_in_marquee(&rect, pos2(0.0, 0.0), pos2(15.0, 15.0)));
        // Corner order does not matter.
        assert!(is_shape_in_marquee(&rect, pos2(30.0, 30.0), pos2(0.0, 0.0)));
    }

    #[test]
    fn marquee_ignores_pointless_shapes() {
        let mut pen = shape(ShapeKind::Pen, vec![pos2(5.0, 5.0)], 2.0);
        pen.points.clear();
        assert!(!is_shape_in_marquee(&pen, pos2(0.0, 0.0), pos2(10.0, 10.0)));
    }
}
