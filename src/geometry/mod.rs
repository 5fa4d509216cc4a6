//! Pure geometry: coordinate transforms between screen and world space,
//! bounding boxes, segment distance and the cardinal-point reconstruction
//! used for rotated shapes. Nothing in here touches the UI.

use egui::{Pos2, Rect, Vec2, pos2, vec2};
use serde::{Deserialize, Serialize};

use crate::shape::{DrawnShape, ShapeKind, TextDirection};

pub mod hit_testing;
pub use hit_testing::{is_point_near_shape, is_shape_in_marquee};

/// The world-to-screen affine map of the pan-zoom canvas:
/// `screen = world * k + (x, y)`.
///
/// `k` is the zoom factor and must be strictly positive; feeding a zero or
/// negative `k` is a caller error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, k: 1.0 }
    }
}

impl Transform {
    pub fn new(x: f32, y: f32, k: f32) -> Self {
        debug_assert!(k > 0.0, "zoom factor must be strictly positive");
        Self { x, y, k }
    }

    /// Map a world-space point to screen space.
    pub fn world_to_screen(&self, p: Pos2) -> Pos2 {
        pos2(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Map a screen-space point back to world space. Exact inverse of
    /// [`Self::world_to_screen`] to float precision for all finite `k > 0`.
    pub fn screen_to_world(&self, p: Pos2) -> Pos2 {
        pos2((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Pan by a screen-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    /// Zoom by `factor` keeping the given screen point fixed.
    pub fn zoom_about(&mut self, screen: Pos2, factor: f32) {
        debug_assert!(factor > 0.0, "zoom factor must be strictly positive");
        self.x = screen.x - (screen.x - self.x) * factor;
        self.y = screen.y - (screen.y - self.y) * factor;
        self.k *= factor;
    }
}

/// Axis-aligned bounding box over a shape's world-space points, or `None`
/// for a shape with no points. Text shapes extend their anchor by an
/// estimated block size (0.6 em per character, 1.2 em line height) in the
/// direction the text runs.
pub fn shape_bounds(shape: &DrawnShape) -> Option<Rect> {
    let points = &shape.points;
    if points.is_empty() {
        return None;
    }

    if shape.kind == ShapeKind::Text {
        return Some(text_block_rect(shape));
    }

    let mut min = points[0];
    let mut max = points[0];
    for p in &points[1..] {
        min = min.min(*p);
        max = max.max(*p);
    }
    Some(Rect::from_min_max(min, max))
}

fn text_block_rect(shape: &DrawnShape) -> Rect {
    let anchor = shape.points[0];
    let font_size = shape.font_size();
    let text = shape.text.as_deref().unwrap_or("");
    let widest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let line_count = text.lines().count().max(1);

    let width = widest as f32 * font_size * 0.6;
    let height = line_count as f32 * font_size * 1.2;

    match shape.effective_text_dir() {
        TextDirection::Ltr => Rect::from_min_size(anchor, vec2(width, height)),
        TextDirection::Rtl => {
            Rect::from_min_size(pos2(anchor.x - width, anchor.y), vec2(width, height))
        }
    }
}

/// Euclidean distance from `p` to the segment `a`-`b`. Degenerates to plain
/// point distance when the segment has zero length.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// The four diamond vertices (top, right, bottom, left) spanned by two
/// corner points, in drawing order.
pub fn diamond_vertices(a: Pos2, b: Pos2) -> [Pos2; 4] {
    let mid_x = (a.x + b.x) / 2.0;
    let mid_y = (a.y + b.y) / 2.0;
    [
        pos2(mid_x, a.y),
        pos2(b.x, mid_y),
        pos2(mid_x, b.y),
        pos2(a.x, mid_y),
    ]
}

/// A possibly-rotated ellipse recovered from cardinal control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Pos2,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation of the x radius, in radians.
    pub rotation: f32,
}

/// Recover a rotated ellipse from its cardinal points
/// (points[0] = top, points[1] = right, points[2] = bottom).
/// Returns `None` when fewer than three points are given.
pub fn reconstruct_ellipse(points: &[Pos2]) -> Option<Ellipse> {
    let &[top, right, bottom, ..] = points else {
        return None;
    };
    let center = pos2((top.x + bottom.x) / 2.0, (top.y + bottom.y) / 2.0);
    let rx_vec = right - center;
    Some(Ellipse {
        center,
        radius_x: rx_vec.length(),
        radius_y: (top - center).length(),
        rotation: rx_vec.y.atan2(rx_vec.x),
    })
}

/// Rotate `p` around `center` by `angle` radians.
pub fn rotate_about(p: Pos2, center: Pos2, angle: f32) -> Pos2 {
    let (sin, cos) = angle.sin_cos();
    let d = p - center;
    pos2(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Compute the replacement point list for a shape rotated by `angle` about
/// its bounding-box center. 2-point rectangles, circles and diamonds are
/// first expanded into their explicit cardinal-point forms so the result
/// stays renderable after rotation; text keeps its anchor and gains a
/// direction point. Returns `None` for shapes with no points.
pub fn rotated_shape_points(shape: &DrawnShape, angle: f32) -> Option<Vec<Pos2>> {
    let bounds = shape_bounds(shape)?;
    let center = bounds.center();
    let rot = |p: Pos2| rotate_about(p, center, angle);

    let points = match shape.kind {
        ShapeKind::Rectangle if shape.points.len() == 2 => {
            let r = Rect::from_two_pos(shape.points[0], shape.points[1]);
            [r.left_top(), r.right_top(), r.right_bottom(), r.left_bottom()]
                .map(rot)
                .to_vec()
        }
        ShapeKind::Circle if shape.points.len() == 2 => {
            // Cardinal points: top, right, bottom, left of the bounding box.
            [
                pos2(center.x, bounds.min.y),
                pos2(bounds.max.x, center.y),
                pos2(center.x, bounds.max.y),
                pos2(bounds.min.x, center.y),
            ]
            .map(rot)
            .to_vec()
        }
        ShapeKind::Diamond if shape.points.len() == 2 => {
            diamond_vertices(shape.points[0], shape.points[1])
                .map(rot)
                .to_vec()
        }
        ShapeKind::Text => {
            let anchor = shape.points[0];
            let base_angle = match shape.points.get(1) {
                Some(dir) => (dir.y - anchor.y).atan2(dir.x - anchor.x),
                None => 0.0,
            };
            let total = base_angle + angle;
            vec![anchor, anchor + Vec2::angled(total)]
        }
        _ => shape.points.iter().copied().map(rot).collect(),
    };
    Some(points)
}
