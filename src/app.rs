use egui::{self, Pos2};

use crate::controller::{CanvasController, Tool};
use crate::document::Document;
use crate::geometry::Transform;
use crate::input::{ShortcutAction, ShortcutHandler};
use crate::panels::{style_panel, tools_panel};
use crate::renderer::{draw_shape, marquee_shapes, selection_box_shapes};
use crate::shape::{DEFAULT_FONT_SIZE, StrokeConfig};

/// Scroll-to-zoom sensitivity and the allowed zoom range.
const ZOOM_SPEED: f32 = 0.001;
const MIN_ZOOM: f32 = 0.1;
const MAX_ZOOM: f32 = 10.0;

/// In-progress text entry: a world-space anchor plus the draft string.
struct TextDraft {
    anchor: Pos2,
    text: String,
}

/// The part of the app state that survives restarts.
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(default)]
struct PersistedState {
    document: Document,
    transform: Transform,
    stroke_config: StrokeConfig,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            document: Document::default(),
            transform: Transform::default(),
            stroke_config: StrokeConfig::default(),
        }
    }
}

pub struct InkboardApp {
    controller: CanvasController,
    transform: Transform,
    stroke_config: StrokeConfig,
    shortcuts: ShortcutHandler,
    text_draft: Option<TextDraft>,
}

impl Default for InkboardApp {
    fn default() -> Self {
        Self {
            controller: CanvasController::new(),
            transform: Transform::default(),
            stroke_config: StrokeConfig::default(),
            shortcuts: ShortcutHandler::new(),
            text_draft: None,
        }
    }
}

impl InkboardApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut app = Self::default();
        if let Some(storage) = cc.storage {
            if let Some(state) = eframe::get_value::<PersistedState>(storage, eframe::APP_KEY) {
                log::info!("restored {} shape(s) from storage", state.document.len());
                app.controller.set_document(state.document);
                app.transform = state.transform;
                app.stroke_config = state.stroke_config;
            }
        }
        app
    }

    fn handle_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SetTool(tool) => self.controller.set_active_tool(tool),
            ShortcutAction::DeleteSelection => {
                self.controller.delete_selected();
            }
        }
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas = response.rect;

        // Scroll wheel zooms about the pointer.
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                if let Some(pointer) = response.hover_pos() {
                    let factor = (scroll * ZOOM_SPEED).exp();
                    let k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
                    self.transform.zoom_about(pointer, k / self.transform.k);
                }
            }
        }

        match self.controller.active_tool() {
            Tool::Pan => {
                if response.dragged() {
                    self.transform.translate(response.drag_delta());
                }
            }
            Tool::Text => {
                if response.clicked() {
                    if let Some(pointer) = response.interact_pointer_pos() {
                        self.text_draft = Some(TextDraft {
                            anchor: self.transform.screen_to_world(pointer),
                            text: String::new(),
                        });
                    }
                }
            }
            _ => self.route_pointer(ui, &response, canvas),
        }

        self.draw_canvas(&painter);
    }

    /// Feed raw pointer transitions to the controller. The gesture state
    /// machine wants the press immediately (the pen seeds its first point
    /// there), so this reads the pointer directly instead of waiting for
    /// egui's drag threshold.
    fn route_pointer(&mut self, ui: &mut egui::Ui, response: &egui::Response, canvas: egui::Rect) {
        let (pressed, down, released, pos) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
            )
        });

        if pressed && response.hovered() {
            if let Some(pos) = pos {
                self.controller.pointer_down(pos, &self.transform);
            }
        } else if down {
            match pos {
                Some(pos) if canvas.contains(pos) => {
                    self.controller.pointer_move(pos, &self.transform);
                }
                // Leaving the canvas mid-gesture ends it like a release.
                _ => {
                    self.controller.pointer_leave(&self.stroke_config);
                }
            }
        }

        if released {
            self.controller.pointer_up(&self.stroke_config);
        }
    }

    fn draw_canvas(&self, painter: &egui::Painter) {
        let rotation_preview = self.controller.rotation_preview();
        let rotating_id = rotation_preview.as_ref().map(|s| s.id);

        for shape in self.controller.document().shapes() {
            if Some(shape.id) == rotating_id {
                continue;
            }
            draw_shape(painter, shape, &self.transform, false);
        }
        if let Some(preview) = &rotation_preview {
            draw_shape(painter, preview, &self.transform, true);
        }
        if let Some(preview) = self.controller.preview_shape(&self.stroke_config) {
            draw_shape(painter, &preview, &self.transform, true);
        }

        if let Some((start, end)) = self.controller.marquee() {
            painter.extend(marquee_shapes(start, end, &self.transform));
        }
        for &id in self.controller.selection() {
            if let Some(shape) = self.controller.document().get(id) {
                painter.extend(selection_box_shapes(shape, &self.transform));
            }
        }
    }

    fn text_entry_window(&mut self, ctx: &egui::Context) {
        let Some(draft) = &mut self.text_draft else {
            return;
        };
        let mut open = true;
        let mut commit = false;
        let mut cancel = false;
        egui::Window::new("Add text")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                let edit = ui.add(
                    egui::TextEdit::multiline(&mut draft.text)
                        .desired_rows(2)
                        .hint_text("Type here"),
                );
                edit.request_focus();
                ui.horizontal(|ui| {
                    if ui.button("Place").clicked() {
                        commit = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
            });
        if cancel {
            open = false;
        }

        if commit {
            let draft = self.text_draft.take().unwrap();
            self.controller.place_text(
                draft.anchor,
                &draft.text,
                DEFAULT_FONT_SIZE,
                &self.stroke_config,
            );
        } else if !open {
            self.text_draft = None;
        }
    }
}

impl eframe::App for InkboardApp {
    /// Called by the framework to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let state = PersistedState {
            document: self.controller.document().clone(),
            transform: self.transform,
            stroke_config: self.stroke_config,
        };
        eframe::set_value(storage, eframe::APP_KEY, &state);
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(action) = self.shortcuts.process(ctx) {
            self.handle_shortcut(action);
        }

        tools_panel(&mut self.controller, ctx);
        style_panel(&mut self.stroke_config, self.controller.active_tool(), ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_ui(ui);
        });

        self.text_entry_window(ctx);
    }
}
