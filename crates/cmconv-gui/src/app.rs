//! Main application structure for the cmconv GUI

use std::io;
use std::path::Path;

use chrono::Local;
use cmconv_core::{
    ClientOverrides, ColorModelRegistry, ConfigSource, ConversionClient, ConversionController,
    ConversionTrigger, ConvertError, FileConfig, ImageFile, RenderedImage, ThemePreference,
    UiState as FlowState, config_path, effective_client_preferences, load_config, save_config,
};

use crate::async_bridge::AsyncBridge;
use crate::dialogs;
use crate::textures::ImageTextures;
use crate::ui_state::{LogEntry, LogLevel, UiState};
use crate::widgets;
use crate::widgets::convert_buttons::ButtonAction;
use crate::widgets::image_pair::SaveRequest;
use crate::widgets::parameter_controls::ParameterEdit;

/// Main application struct implementing eframe::App
pub struct CmconvApp {
    /// Conversion flow state
    controller: ConversionController,

    client: ConversionClient,

    /// Persisted settings; theme and default model are written back on change
    config: FileConfig,

    ui_state: UiState,

    async_bridge: AsyncBridge,

    textures: ImageTextures,
}

impl CmconvApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> io::Result<Self> {
        let load = load_config();
        let config = load.config;
        let preferences = effective_client_preferences(&config, &ClientOverrides::default());
        let client = ConversionClient::new(&preferences)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;

        let mut app = Self {
            controller: ConversionController::with_registry(
                ColorModelRegistry::builtin(),
                &config.ui.default_model,
            ),
            client,
            ui_state: UiState::new(config.ui.theme),
            config,
            async_bridge: AsyncBridge::new()?,
            textures: ImageTextures::default(),
        };

        match load.source {
            ConfigSource::File => {
                app.add_log(LogLevel::Info, format!("Loaded {}", config_path().display()));
            }
            ConfigSource::Default => app.add_log(LogLevel::Info, "Using default settings"),
        }
        for warning in load.warnings {
            tracing::warn!(%warning, "config warning");
            app.add_log(LogLevel::Warning, warning);
        }
        let endpoint = app.client.endpoint().to_string();
        app.add_log(LogLevel::Info, format!("Conversion service: {endpoint}"));

        Ok(app)
    }

    fn add_log(&mut self, level: LogLevel, message: impl Into<String>) {
        self.ui_state.add_log_entry(LogEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.into(),
        });
    }

    fn apply_theme(&self, ctx: &egui::Context) {
        let visuals = match self.ui_state.theme {
            ThemePreference::Dark => egui::Visuals::dark(),
            ThemePreference::Light => egui::Visuals::light(),
        };
        ctx.set_visuals(visuals);
    }

    fn persist_config(&mut self) {
        if let Err(err) = save_config(&self.config) {
            tracing::error!(error = %err, "failed to save config");
            self.add_log(LogLevel::Error, format!("Failed to save config: {err}"));
        }
    }

    fn pick_file(&mut self) {
        let Some(path) = dialogs::pick_image() else {
            return;
        };
        match ImageFile::from_path(&path) {
            Ok(file) => {
                self.add_log(
                    LogLevel::Info,
                    format!("Selected {} ({} bytes)", file.name(), file.len()),
                );
                self.controller.select_file(file);
            }
            Err(err) => self.add_log(LogLevel::Error, err.to_string()),
        }
    }

    fn select_model(&mut self, id: &'static str) {
        if let Err(err) = self.controller.select_model(id) {
            self.add_log(LogLevel::Error, err.to_string());
            return;
        }
        self.add_log(LogLevel::Info, format!("Model set to {id}"));
        if self.config.ui.default_model != id {
            self.config.ui.default_model = id.to_string();
            self.persist_config();
        }
    }

    fn apply_parameter_edit(&mut self, edit: ParameterEdit) {
        let result = match edit {
            ParameterEdit::Set { key, value } => self.controller.set_parameter(key, value),
            ParameterEdit::ResetAll => {
                let id = self.controller.active_model().id;
                self.controller.select_model(id)
            }
        };
        if let Err(err) = result {
            self.add_log(LogLevel::Warning, err.to_string());
        }
    }

    fn start_conversion(&mut self, trigger: ConversionTrigger, ctx: &egui::Context) {
        match self.controller.begin_conversion(trigger) {
            Ok(request) => {
                self.add_log(
                    LogLevel::Info,
                    format!("Converting {} with {}", request.file.name(), request.model_id),
                );
                self.async_bridge
                    .spawn_conversion(self.client.clone(), request, ctx.clone());
            }
            Err(ConvertError::NoFileSelected(message)) => {
                self.add_log(LogLevel::Warning, message);
            }
            Err(err) => self.add_log(LogLevel::Warning, err.to_string()),
        }
    }

    fn poll_conversion(&mut self, ctx: &egui::Context) {
        let Some(result) = self.async_bridge.poll_result() else {
            return;
        };
        self.controller.complete_conversion(result);

        match self.controller.state() {
            FlowState::Errored => {
                if let Some(notification) = self.controller.notification() {
                    let message = notification.message.clone();
                    self.add_log(LogLevel::Error, message);
                }
            }
            _ => self.add_log(LogLevel::Info, "Conversion finished"),
        }

        let displayed = self.controller.displayed();
        let errors = self.textures.sync(
            ctx,
            self.controller.completed_conversions(),
            displayed.original.as_ref(),
            displayed.converted.as_ref(),
        );
        for error in errors {
            self.add_log(LogLevel::Error, error);
        }
    }

    fn save_image(&mut self, which: SaveRequest) {
        let displayed = self.controller.displayed();
        let (image, suffix) = match which {
            SaveRequest::Original => (displayed.original.as_ref(), "original"),
            SaveRequest::Converted => (displayed.converted.as_ref(), self.controller.active_model().id),
        };
        let Some(image) = image.cloned() else {
            return;
        };
        let stem = self
            .controller
            .selection()
            .file()
            .and_then(|file| Path::new(file.name()).file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let Some(path) = dialogs::save_png(&format!("{stem}_{suffix}.png")) else {
            return;
        };
        match write_png(&path, &image) {
            Ok(()) => self.add_log(LogLevel::Info, format!("Saved {}", path.display())),
            Err(err) => self.add_log(
                LogLevel::Error,
                format!("Failed to save {}: {err}", path.display()),
            ),
        }
    }

    fn render_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Color Model Converter");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = match self.ui_state.theme {
                        ThemePreference::Dark => "☀ Light",
                        ThemePreference::Light => "🌙 Dark",
                    };
                    if ui.button(theme_label).clicked() {
                        self.ui_state.toggle_theme();
                        self.config.ui.theme = self.ui_state.theme;
                        self.persist_config();
                    }
                });
            });
        });
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            if let Some(id) = widgets::model_selector::render(
                ui,
                &self.controller,
                &mut self.ui_state.model_info_expanded,
            ) {
                self.select_model(id);
            }
        });

        ui.add_space(8.0);

        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            for edit in widgets::parameter_controls::render(ui, &self.controller) {
                self.apply_parameter_edit(edit);
            }
        });

        ui.add_space(8.0);

        ui.group(|ui| {
            ui.set_min_width(ui.available_width());
            match widgets::convert_buttons::render(ui, &self.controller) {
                Some(ButtonAction::PickFile) => self.pick_file(),
                Some(ButtonAction::Convert(trigger)) => self.start_conversion(trigger, ui.ctx()),
                None => {}
            }
        });

        ui.add_space(8.0);

        let dismissed = self
            .controller
            .notification()
            .is_some_and(|notification| widgets::notification::render(ui, notification));
        if dismissed {
            self.controller.dismiss_notification();
        }
    }

    fn render_main_ui(&mut self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                self.render_controls(ui);

                ui.add_space(8.0);
                ui.separator();

                let model_name = self.controller.active_model().display_name;
                if let Some(which) = widgets::image_pair::render(ui, &self.textures, model_name) {
                    self.save_image(which);
                }

                ui.add_space(8.0);

                let log_response = egui::CollapsingHeader::new("Technical Log")
                    .default_open(self.ui_state.technical_log_expanded)
                    .show(ui, |ui| {
                        widgets::technical_log::render(ui, &mut self.ui_state);
                    });
                if log_response.header_response.clicked() {
                    self.ui_state.technical_log_expanded = !self.ui_state.technical_log_expanded;
                }
            });
    }
}

fn write_png(path: &Path, image: &RenderedImage) -> io::Result<()> {
    std::fs::write(path, image.bytes())
}

impl eframe::App for CmconvApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_theme(ctx);

        self.poll_conversion(ctx);

        self.render_top_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_main_ui(ui);
        });
    }
}
