//! Desktop front end for cmconv using eframe/egui.

pub mod app;
pub mod async_bridge;
pub mod dialogs;
pub mod textures;
pub mod ui_state;
pub mod widgets;

use cmconv_core::logging::{LoggingDestination, init_logging};

/// Main entry point for the GUI
pub fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    if let Err(err) = init_logging(LoggingDestination::FileOnly) {
        eprintln!("Warning: logging disabled: {err}");
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_resizable(true)
            .with_title("Color Model Converter"),
        ..Default::default()
    };

    eframe::run_native(
        "Color Model Converter",
        native_options,
        Box::new(|cc| {
            let app = app::CmconvApp::new(cc)?;
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| format!("{e:?}"))?;

    Ok(())
}
