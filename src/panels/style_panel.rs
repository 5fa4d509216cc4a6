use egui::{self, Color32, Vec2};

use crate::controller::Tool;
use crate::shape::{StrokeConfig, StrokeStyle};

/// Preset swatches offered by the panel, most-used first.
const PRESET_COLORS: [Color32; 8] = [
    Color32::from_rgb(0x3B, 0x82, 0xF6), // blue
    Color32::from_rgb(0xEF, 0x44, 0x44), // red
    Color32::from_rgb(0x10, 0xB9, 0x81), // green
    Color32::from_rgb(0xF5, 0x9E, 0x0B), // amber
    Color32::from_rgb(0x8B, 0x5C, 0xF6), // violet
    Color32::from_rgb(0xEC, 0x48, 0x99), // pink
    Color32::WHITE,
    Color32::from_rgb(0x6B, 0x72, 0x80), // gray
];

const PRESET_WIDTHS: [f32; 5] = [1.0, 2.0, 3.0, 5.0, 8.0];

/// Stroke options for the active tool. Only shown while a tool that
/// produces strokes is selected.
pub fn style_panel(config: &mut StrokeConfig, active_tool: Tool, ctx: &egui::Context) {
    if !active_tool.is_drawing_tool() && active_tool != Tool::Text {
        return;
    }

    egui::SidePanel::right("style_panel")
        .resizable(false)
        .default_width(160.0)
        .show(ctx, |ui| {
            ui.heading("Style");

            ui.label("Color");
            ui.horizontal_wrapped(|ui| {
                for color in PRESET_COLORS {
                    if color_swatch(ui, color, config.color == color).clicked() {
                        config.color = color;
                    }
                }
            });

            ui.separator();
            ui.label("Width");
            ui.horizontal(|ui| {
                for width in PRESET_WIDTHS {
                    let selected = (config.width - width).abs() < f32::EPSILON;
                    if ui.selectable_label(selected, format!("{width:.0}")).clicked() {
                        config.width = width;
                    }
                }
            });

            ui.separator();
            ui.label("Stroke");
            for (style, name) in [
                (StrokeStyle::Solid, "Solid"),
                (StrokeStyle::Dashed, "Dashed"),
                (StrokeStyle::Dotted, "Dotted"),
            ] {
                if ui.selectable_label(config.style == style, name).clicked() {
                    config.style = style;
                }
            }
        });
}

fn color_swatch(ui: &mut egui::Ui, color: Color32, selected: bool) -> egui::Response {
    let size = Vec2::splat(20.0);
    let stroke = if selected {
        egui::Stroke::new(2.0, ui.visuals().strong_text_color())
    } else {
        egui::Stroke::new(1.0, ui.visuals().weak_text_color())
    };
    ui.add(egui::Button::new("").fill(color).stroke(stroke).min_size(size))
}
