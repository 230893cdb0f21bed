//! Sliders for the active model's parameters

use cmconv_core::ConversionController;

/// What the user changed this frame
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterEdit {
    Set { key: &'static str, value: f64 },
    ResetAll,
}

/// Render one slider per parameter of the active model.
///
/// Slider output is snapped to the parameter's step and clamped to its
/// range before it is reported, so the store never sees a rejected value.
pub fn render(ui: &mut egui::Ui, controller: &ConversionController) -> Vec<ParameterEdit> {
    let params = controller.selection().params();
    let mut edits = Vec::new();

    ui.heading("Parameters");

    ui.add_enabled_ui(controller.controls_enabled(), |ui| {
        egui::Grid::new("parameter_grid")
            .num_columns(2)
            .spacing([12.0, 6.0])
            .show(ui, |ui| {
                for spec in params.specs() {
                    let current = params.get(spec.key).unwrap_or(spec.default);
                    let mut value = current;

                    ui.label(spec.label).on_hover_text(spec.key);
                    let slider = egui::Slider::new(&mut value, spec.min..=spec.max)
                        .step_by(spec.step)
                        .fixed_decimals(spec.display_precision());
                    if ui.add(slider).changed() {
                        let value = spec.quantize(value);
                        if value != current {
                            edits.push(ParameterEdit::Set {
                                key: spec.key,
                                value,
                            });
                        }
                    }
                    ui.end_row();
                }
            });

        if ui.button("Reset to defaults").clicked() {
            edits.push(ParameterEdit::ResetAll);
        }
    });

    edits
}
