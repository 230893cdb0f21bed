//! Color model selector widget

use cmconv_core::ConversionController;

/// Render the model dropdown and its description.
/// Returns the newly chosen model id, if the user picked a different one.
pub fn render(
    ui: &mut egui::Ui,
    controller: &ConversionController,
    info_expanded: &mut bool,
) -> Option<&'static str> {
    let active = controller.active_model();
    let mut chosen = None;

    ui.heading("Color Model");

    ui.add_enabled_ui(controller.controls_enabled(), |ui| {
        egui::ComboBox::from_id_salt("color_model")
            .selected_text(active.display_name)
            .width(ui.available_width().min(320.0))
            .show_ui(ui, |ui| {
                for model in controller.selection().registry().list_models() {
                    let selected = model.id == active.id;
                    if ui.selectable_label(selected, model.display_name).clicked() && !selected {
                        chosen = Some(model.id);
                    }
                }
            });
    });

    let response = egui::CollapsingHeader::new("About this model")
        .default_open(*info_expanded)
        .show(ui, |ui| {
            ui.label(controller.model_info());
        });
    if response.header_response.clicked() {
        *info_expanded = !*info_expanded;
    }

    chosen
}
