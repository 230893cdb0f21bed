//! Decodes server PNGs into egui textures.

use cmconv_core::RenderedImage;
use egui::{ColorImage, TextureHandle, TextureOptions};

/// Textures for the displayed image pair, rebuilt only when a new
/// conversion has landed.
#[derive(Default)]
pub struct ImageTextures {
    pub original: Option<TextureHandle>,
    pub converted: Option<TextureHandle>,
    generation: u64,
}

impl ImageTextures {
    /// Refresh from the controller's images if `generation` moved.
    ///
    /// Returns decode failures so the caller can log them.
    pub fn sync(
        &mut self,
        ctx: &egui::Context,
        generation: u64,
        original: Option<&RenderedImage>,
        converted: Option<&RenderedImage>,
    ) -> Vec<String> {
        if generation == self.generation {
            return Vec::new();
        }
        self.generation = generation;

        let mut errors = Vec::new();
        self.original = load(ctx, "original-image", original, &mut errors);
        self.converted = load(ctx, "converted-image", converted, &mut errors);
        errors
    }
}

fn load(
    ctx: &egui::Context,
    name: &str,
    image: Option<&RenderedImage>,
    errors: &mut Vec<String>,
) -> Option<TextureHandle> {
    let image = image?;
    match decode(image.bytes()) {
        Ok(color_image) => Some(ctx.load_texture(name, color_image, TextureOptions::LINEAR)),
        Err(err) => {
            errors.push(format!("Failed to decode {name}: {err}"));
            None
        }
    }
}

pub fn decode(bytes: &[u8]) -> Result<ColorImage, image::ImageError> {
    let rgba = image::load_from_memory(bytes)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}
