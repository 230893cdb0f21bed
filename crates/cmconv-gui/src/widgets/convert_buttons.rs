//! File picker and the two conversion triggers

use cmconv_core::{ConversionController, ConversionTrigger};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    PickFile,
    Convert(ConversionTrigger),
}

pub fn render(ui: &mut egui::Ui, controller: &ConversionController) -> Option<ButtonAction> {
    let enabled = controller.controls_enabled();
    let mut action = None;

    ui.horizontal(|ui| {
        if ui
            .add_enabled(enabled, egui::Button::new("📂 Choose Image…"))
            .clicked()
        {
            action = Some(ButtonAction::PickFile);
        }
        match controller.selection().file() {
            Some(file) => {
                ui.label(format!("{} ({} KiB)", file.name(), file.len().div_ceil(1024)));
            }
            None => {
                ui.weak("No file selected");
            }
        }
    });

    ui.add_space(6.0);

    ui.horizontal(|ui| {
        for (trigger, fill) in [
            (ConversionTrigger::Upload, egui::Color32::from_rgb(0, 150, 0)),
            (ConversionTrigger::Apply, egui::Color32::from_rgb(0, 120, 200)),
        ] {
            let button = egui::Button::new(
                egui::RichText::new(controller.trigger_label(trigger)).size(18.0),
            )
            .fill(fill)
            .min_size(egui::vec2(180.0, 36.0));
            if ui.add_enabled(enabled, button).clicked() {
                action = Some(ButtonAction::Convert(trigger));
            }
        }
        if !enabled {
            ui.spinner();
        }
    });

    action
}
