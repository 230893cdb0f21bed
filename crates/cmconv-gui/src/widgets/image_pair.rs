//! Side-by-side original and converted images

use crate::textures::ImageTextures;

/// Which image the user asked to save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveRequest {
    Original,
    Converted,
}

pub fn render(ui: &mut egui::Ui, textures: &ImageTextures, model_name: &str) -> Option<SaveRequest> {
    let mut save = None;

    ui.columns(2, |columns| {
        if image_column(&mut columns[0], "Original", textures.original.as_ref()) {
            save = Some(SaveRequest::Original);
        }
        let title = format!("Converted ({model_name})");
        if image_column(&mut columns[1], &title, textures.converted.as_ref()) {
            save = Some(SaveRequest::Converted);
        }
    });

    save
}

/// Returns true when "Save" was clicked.
fn image_column(ui: &mut egui::Ui, title: &str, texture: Option<&egui::TextureHandle>) -> bool {
    let mut clicked = false;
    ui.vertical(|ui| {
        ui.horizontal(|ui| {
            ui.strong(title);
            if texture.is_some() && ui.small_button("Save…").clicked() {
                clicked = true;
            }
        });
        match texture {
            Some(texture) => {
                ui.add(
                    egui::Image::new(texture)
                        .max_height(480.0)
                        .shrink_to_fit(),
                );
            }
            None => {
                ui.weak("No image yet");
            }
        }
    });
    clicked
}
