use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ShapeError;

/// The kind of annotation a [`DrawnShape`] represents.
///
/// The point-count semantics of a shape are determined solely by its kind;
/// renderer and hit-tester branch on the kind and only inspect the point
/// count to distinguish the 2-point bounding form from the cardinal-point
/// rotated form of rectangles, circles and diamonds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Pen,
    Line,
    Arrow,
    Rectangle,
    Circle,
    Diamond,
    Text,
}

impl ShapeKind {
    /// Minimum number of points a shape of this kind needs to be drawable.
    pub fn min_points(self) -> usize {
        match self {
            Self::Pen | Self::Text => 1,
            Self::Line | Self::Arrow | Self::Rectangle | Self::Circle | Self::Diamond => 2,
        }
    }
}

/// Dash pattern applied to a committed shape's outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Layout direction for text shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

/// Detect the layout direction of a string from its first strong
/// directional character (Arabic and Hebrew blocks count as RTL).
pub fn detect_text_dir(text: &str) -> TextDirection {
    let is_rtl = |c: char| {
        matches!(
            c as u32,
            0x0590..=0x07FF | 0x08A0..=0x08FF | 0xFB1D..=0xFDFD | 0xFE70..=0xFEFC
        )
    };
    if text.chars().any(is_rtl) {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Stroke settings shared by the style panel and the controller's commit
/// path. Passed explicitly rather than read from ambient state so the
/// geometry and rendering code stay pure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeConfig {
    pub color: Color32,
    pub width: f32,
    pub style: StrokeStyle,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            color: Color32::from_rgb(0x3B, 0x82, 0xF6),
            width: 2.0,
            style: StrokeStyle::Solid,
        }
    }
}

/// A committed annotation. Points are stored in world space; conversion to
/// screen space happens at render time via the current transform.
///
/// Shapes are immutable once committed: edits (rotation, for instance)
/// replace the record rather than mutating it in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawnShape {
    pub id: Uuid,
    pub kind: ShapeKind,
    pub points: Vec<Pos2>,
    pub color: Color32,
    /// World-space stroke thickness.
    pub width: f32,
    pub style: StrokeStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_dir: Option<TextDirection>,
}

pub const DEFAULT_FONT_SIZE: f32 = 16.0;

impl DrawnShape {
    /// Build a vector shape, validating the point count against the kind.
    pub fn try_new(
        id: Uuid,
        kind: ShapeKind,
        points: Vec<Pos2>,
        config: &StrokeConfig,
    ) -> Result<Self, ShapeError> {
        if points.len() < kind.min_points() {
            return Err(ShapeError::NotEnoughPoints {
                kind,
                got: points.len(),
                need: kind.min_points(),
            });
        }
        Ok(Self {
            id,
            kind,
            points,
            color: config.color,
            width: config.width,
            style: config.style,
            text: None,
            font_size: None,
            font_family: None,
            text_dir: None,
        })
    }

    /// Build a text shape anchored at `anchor`. An optional second point
    /// defines the rotation angle of the whole block.
    pub fn text(
        id: Uuid,
        anchor: Pos2,
        text: impl Into<String>,
        font_size: f32,
        config: &StrokeConfig,
    ) -> Self {
        Self {
            id,
            kind: ShapeKind::Text,
            points: vec![anchor],
            color: config.color,
            width: config.width,
            style: config.style,
            text: Some(text.into()),
            font_size: Some(font_size),
            font_family: None,
            text_dir: None,
        }
    }

    /// Effective text direction: the explicit override if set, otherwise
    /// auto-detected from the content.
    pub fn effective_text_dir(&self) -> TextDirection {
        if let Some(dir) = self.text_dir {
            return dir;
        }
        self.text
            .as_deref()
            .map(detect_text_dir)
            .unwrap_or_default()
    }

    pub fn font_size(&self) -> f32 {
        self.font_size.unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Returns a copy of this shape with the given points, keeping id and
    /// style. Used by edit operations that replace the record.
    pub fn with_points(&self, points: Vec<Pos2>) -> Self {
        Self {
            points,
            ..self.clone()
        }
    }
}
