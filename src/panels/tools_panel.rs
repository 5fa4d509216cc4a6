use crate::controller::{CanvasController, Tool};

pub fn tools_panel(controller: &mut CanvasController, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(140.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = controller.active_tool();
            for tool in Tool::ALL {
                if ui.selectable_label(active == tool, tool.label()).clicked() {
                    log::info!("tool selected from UI: {}", tool.label());
                    controller.set_active_tool(tool);
                }
            }

            ui.separator();

            ui.horizontal(|ui| {
                let selected = controller.selection().len();
                if ui
                    .add_enabled(selected > 0, egui::Button::new("Delete"))
                    .clicked()
                {
                    controller.delete_selected();
                }
                if ui
                    .add_enabled(!controller.document().is_empty(), egui::Button::new("Clear all"))
                    .clicked()
                {
                    controller.clear_all();
                }
            });

            ui.separator();
            ui.label(format!("{} shape(s)", controller.document().len()));
        });
}
