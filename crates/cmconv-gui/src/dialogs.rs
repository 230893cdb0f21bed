//! File dialog utilities

use std::path::PathBuf;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Pick the image to upload
pub fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select Image")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_file()
}

/// Choose where to save a converted PNG
pub fn save_png(suggested_name: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Save Converted Image")
        .add_filter("PNG Images", &["png"])
        .set_file_name(suggested_name)
        .save_file()
}
