//! Technical log widget

use crate::ui_state::{LogLevel, UiState};

/// Render technical log
pub fn render(ui: &mut egui::Ui, ui_state: &mut UiState) {
    ui.horizontal(|ui| {
        ui.label("Entries:");
        ui.label(format!(
            "{} / {}",
            ui_state.technical_log.len(),
            ui_state.log_capacity()
        ));

        if ui.button("Clear").clicked() {
            ui_state.technical_log.clear();
        }
    });

    ui.separator();

    egui::ScrollArea::vertical()
        .id_salt("technical_log")
        .max_height(240.0)
        .auto_shrink([false, true])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            for entry in &ui_state.technical_log {
                ui.horizontal(|ui| {
                    ui.monospace(&entry.timestamp);

                    let (color, prefix) = match entry.level {
                        LogLevel::Info => (egui::Color32::GRAY, "INFO"),
                        LogLevel::Warning => (egui::Color32::YELLOW, "WARN"),
                        LogLevel::Error => (egui::Color32::RED, "ERROR"),
                    };

                    ui.colored_label(color, prefix);
                    ui.label(&entry.message);
                });
            }
        });
}
