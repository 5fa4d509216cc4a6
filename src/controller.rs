//! The gesture state machine behind the canvas: translates pointer events
//! into geometry-kernel calls and shape-list mutations. Owns the committed
//! document, the active tool and the transient drawing state; the renderer
//! only ever reads from it.

use egui::Pos2;
use log::{debug, info};
use uuid::Uuid;

use crate::document::Document;
use crate::geometry::{
    Transform, hit_testing::HIT_TOLERANCE, is_point_near_shape, is_shape_in_marquee,
    rotated_shape_points, shape_bounds,
};
use crate::id_source::{IdSource, UuidSource};
use crate::renderer::{ROTATION_HANDLE_RADIUS, rotation_handle_center};
use crate::shape::{DrawnShape, ShapeKind, StrokeConfig};

/// The currently selected tool. Pan is handled by the hosting canvas (it
/// moves the transform, not the shapes) and Select/Eraser/Text have their
/// own gestures; the rest are drawing tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pan,
    Select,
    Rectangle,
    Diamond,
    Circle,
    Arrow,
    Line,
    Pen,
    Text,
    Eraser,
}

impl Tool {
    pub const ALL: [Tool; 10] = [
        Tool::Pan,
        Tool::Select,
        Tool::Rectangle,
        Tool::Diamond,
        Tool::Circle,
        Tool::Arrow,
        Tool::Line,
        Tool::Pen,
        Tool::Text,
        Tool::Eraser,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pan => "Pan",
            Self::Select => "Select",
            Self::Rectangle => "Rectangle",
            Self::Diamond => "Diamond",
            Self::Circle => "Circle",
            Self::Arrow => "Arrow",
            Self::Line => "Line",
            Self::Pen => "Draw",
            Self::Text => "Text",
            Self::Eraser => "Eraser",
        }
    }

    /// Tools whose drag gesture produces a shape.
    pub fn is_drawing_tool(self) -> bool {
        self.shape_kind().is_some()
    }

    fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            Self::Pen => Some(ShapeKind::Pen),
            Self::Line => Some(ShapeKind::Line),
            Self::Arrow => Some(ShapeKind::Arrow),
            Self::Rectangle => Some(ShapeKind::Rectangle),
            Self::Circle => Some(ShapeKind::Circle),
            Self::Diamond => Some(ShapeKind::Diamond),
            _ => None,
        }
    }
}

/// In-progress gesture of the select tool.
#[derive(Debug, Clone, Copy)]
enum SelectGesture {
    /// Dragging a rubber-band rectangle over empty canvas.
    Marquee { start: Pos2, end: Pos2 },
    /// Dragging the rotation handle of the selected shape.
    Rotate { id: Uuid, angle: f32 },
}

pub struct CanvasController {
    document: Document,
    active_tool: Tool,
    is_drawing: bool,
    start_point: Option<Pos2>,
    /// World-space points of the in-progress stroke; cleared on commit.
    current_points: Vec<Pos2>,
    select_gesture: Option<SelectGesture>,
    selection: Vec<Uuid>,
    ids: Box<dyn IdSource + Send>,
}

impl Default for CanvasController {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasController {
    pub fn new() -> Self {
        Self::with_id_source(Box::new(UuidSource))
    }

    /// Construct with an explicit id source (deterministic in tests).
    pub fn with_id_source(ids: Box<dyn IdSource + Send>) -> Self {
        Self {
            document: Document::new(),
            active_tool: Tool::Pan,
            is_drawing: false,
            start_point: None,
            current_points: Vec::new(),
            select_gesture: None,
            selection: Vec::new(),
            ids,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Replace the whole document, e.g. when restoring persisted state.
    pub fn set_document(&mut self, document: Document) {
        self.selection.clear();
        self.document = document;
    }

    pub fn active_tool(&self) -> Tool {
        self.active_tool
    }

    /// Switch tools. Cancels any in-progress gesture; never mutates the
    /// document (the eraser deletes on click, not on selection).
    pub fn set_active_tool(&mut self, tool: Tool) {
        if tool != self.active_tool {
            info!("tool changed: {:?} -> {:?}", self.active_tool, tool);
        }
        self.active_tool = tool;
        self.is_drawing = false;
        self.start_point = None;
        self.current_points.clear();
        self.select_gesture = None;
        if tool != Tool::Select {
            self.selection.clear();
        }
    }

    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    pub fn selection(&self) -> &[Uuid] {
        &self.selection
    }

    /// The marquee corners (world space) while one is being dragged.
    pub fn marquee(&self) -> Option<(Pos2, Pos2)> {
        match self.select_gesture {
            Some(SelectGesture::Marquee { start, end }) => Some((start, end)),
            _ => None,
        }
    }

    /// The shape being drawn right now, for preview rendering.
    pub fn preview_shape(&self, config: &StrokeConfig) -> Option<DrawnShape> {
        if !self.is_drawing || self.current_points.is_empty() {
            return None;
        }
        let kind = self.active_tool.shape_kind()?;
        DrawnShape::try_new(Uuid::nil(), kind, self.current_points.clone(), config).ok()
    }

    /// The selected shape with the pending rotation applied, for preview
    /// rendering while the rotation handle is being dragged.
    pub fn rotation_preview(&self) -> Option<DrawnShape> {
        let Some(SelectGesture::Rotate { id, angle }) = self.select_gesture else {
            return None;
        };
        let base = self.document.get(id)?;
        let points = rotated_shape_points(base, angle)?;
        Some(base.with_points(points))
    }

    pub fn pointer_down(&mut self, screen: Pos2, transform: &Transform) {
        let world = transform.screen_to_world(screen);

        match self.active_tool {
            tool if tool.is_drawing_tool() => {
                self.is_drawing = true;
                self.start_point = Some(world);
                self.current_points.clear();
                if tool == Tool::Pen {
                    self.current_points.push(world);
                }
            }
            Tool::Select => self.begin_select_gesture(screen, world, transform),
            Tool::Eraser => self.erase_at(world, transform),
            // Pan is the host's business; text placement is an explicit
            // commit operation, not a drag gesture.
            Tool::Pan | Tool::Text => {}
            _ => {}
        }
    }

    fn begin_select_gesture(&mut self, screen: Pos2, world: Pos2, transform: &Transform) {
        // A drag starting on the selected shape's rotation handle rotates
        // instead of re-selecting.
        if let [id] = self.selection[..] {
            if let Some(handle) = self
                .document
                .get(id)
                .and_then(|s| rotation_handle_center(s, transform))
            {
                if screen.distance(handle) <= ROTATION_HANDLE_RADIUS {
                    self.select_gesture = Some(SelectGesture::Rotate { id, angle: 0.0 });
                    return;
                }
            }
        }

        let hit = self
            .document
            .shapes()
            .iter()
            .rev()
            .find(|s| is_point_near_shape(world, s, transform.k, HIT_TOLERANCE));
        match hit {
            Some(shape) => {
                debug!("selected shape {}", shape.id);
                self.selection = vec![shape.id];
            }
            None => {
                self.selection.clear();
                self.select_gesture = Some(SelectGesture::Marquee { start: world, end: world });
            }
        }
    }

    fn erase_at(&mut self, world: Pos2, transform: &Transform) {
        let hit = self
            .document
            .shapes()
            .iter()
            .rev()
            .find(|s| is_point_near_shape(world, s, transform.k, HIT_TOLERANCE))
            .map(|s| s.id);
        if let Some(id) = hit {
            info!("erased shape {id}");
            self.document.remove(id);
            self.selection.retain(|sel| *sel != id);
        }
    }

    pub fn pointer_move(&mut self, screen: Pos2, transform: &Transform) {
        let world = transform.screen_to_world(screen);

        if self.is_drawing {
            if self.active_tool == Tool::Pen {
                self.current_points.push(world);
            } else if let Some(start) = self.start_point {
                // Non-pen tools only ever track start and current point;
                // the rotated multi-point forms come from the rotate edit.
                self.current_points.clear();
                self.current_points.push(start);
                self.current_points.push(world);
            }
            return;
        }

        match &mut self.select_gesture {
            Some(SelectGesture::Marquee { end, .. }) => *end = world,
            Some(SelectGesture::Rotate { id, angle }) => {
                if let Some(center) = self.document.get(*id).and_then(shape_bounds).map(|b| b.center())
                {
                    // The handle rests straight above the shape, so a
                    // pointer there means zero rotation.
                    *angle = (world.y - center.y).atan2(world.x - center.x)
                        + std::f32::consts::FRAC_PI_2;
                }
            }
            None => {}
        }
    }

    /// Finish the current gesture. Returns the id of a newly committed
    /// shape, if the gesture produced one.
    pub fn pointer_up(&mut self, config: &StrokeConfig) -> Option<Uuid> {
        if let Some(gesture) = self.select_gesture.take() {
            match gesture {
                SelectGesture::Marquee { start, end } => {
                    self.selection = self
                        .document
                        .shapes()
                        .iter()
                        .filter(|s| is_shape_in_marquee(s, start, end))
                        .map(|s| s.id)
                        .collect();
                    debug!("marquee selected {} shape(s)", self.selection.len());
                }
                SelectGesture::Rotate { id, angle } => self.commit_rotation(id, angle),
            }
            return None;
        }

        if !self.is_drawing {
            return None;
        }
        self.is_drawing = false;
        self.start_point = None;
        let points = std::mem::take(&mut self.current_points);
        if points.is_empty() {
            // Nothing accumulated: abort without committing.
            return None;
        }

        let kind = self.active_tool.shape_kind()?;
        let id = self.ids.next_id();
        match DrawnShape::try_new(id, kind, points, config) {
            Ok(shape) => {
                debug!("committed {kind:?} shape {id}");
                self.document.add_shape(shape);
                Some(id)
            }
            Err(err) => {
                debug!("dropped in-progress shape: {err}");
                None
            }
        }
    }

    /// Pointer leaving the canvas mid-gesture commits or aborts exactly
    /// like a release.
    pub fn pointer_leave(&mut self, config: &StrokeConfig) -> Option<Uuid> {
        self.pointer_up(config)
    }

    fn commit_rotation(&mut self, id: Uuid, angle: f32) {
        let Some(base) = self.document.get(id) else {
            return;
        };
        let Some(points) = rotated_shape_points(base, angle) else {
            return;
        };
        let replacement = base.with_points(points);
        debug!("rotated shape {id} by {angle:.3} rad");
        self.document.replace(replacement);
    }

    /// Commit a text shape at a world-space anchor. Empty text is a no-op.
    pub fn place_text(
        &mut self,
        anchor: Pos2,
        text: &str,
        font_size: f32,
        config: &StrokeConfig,
    ) -> Option<Uuid> {
        if text.trim().is_empty() {
            return None;
        }
        let id = self.ids.next_id();
        self.document
            .add_shape(DrawnShape::text(id, anchor, text, font_size, config));
        debug!("placed text shape {id}");
        Some(id)
    }

    /// Delete all selected shapes, returning how many were removed.
    pub fn delete_selected(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selection);
        let mut removed = 0;
        for id in ids {
            if self.document.remove(id).is_some() {
                removed += 1;
            }
        }
        if removed > 0 {
            info!("deleted {removed} selected shape(s)");
        }
        removed
    }

    /// Wipe the whole document (the toolbar's explicit "clear all").
    pub fn clear_all(&mut self) {
        info!("cleared {} shape(s)", self.document.len());
        self.document.clear();
        self.selection.clear();
    }
}
