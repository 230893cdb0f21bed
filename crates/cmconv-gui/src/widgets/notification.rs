//! Warning and error banner

use cmconv_core::{Notification, NotificationKind};

/// Render the banner. Returns true when the user dismissed it.
pub fn render(ui: &mut egui::Ui, notification: &Notification) -> bool {
    let (fill, stroke, title) = match notification.kind {
        NotificationKind::Warning => (
            egui::Color32::from_rgb(90, 70, 10),
            egui::Color32::from_rgb(230, 180, 40),
            "Warning",
        ),
        NotificationKind::Error => (
            egui::Color32::from_rgb(90, 20, 20),
            egui::Color32::from_rgb(220, 60, 60),
            "Error",
        ),
    };

    let mut dismissed = false;
    egui::Frame::new()
        .fill(fill)
        .stroke(egui::Stroke::new(1.0, stroke))
        .corner_radius(4.0)
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.colored_label(stroke, egui::RichText::new(title).strong());
                ui.colored_label(egui::Color32::WHITE, &notification.message);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.small_button("✕").on_hover_text("Dismiss").clicked() {
                        dismissed = true;
                    }
                });
            });
        });
    dismissed
}
