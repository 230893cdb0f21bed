//! Core library for cmconv: color model registry, parameter state and the
//! client for the remote conversion service.

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod params;
pub mod registry;
pub mod selection;

pub use client::{ConversionClient, ConversionResult, PNG_DATA_URI_PREFIX, RenderedImage};
pub use config::{
    ClientOverrides, ClientPreferences, ConfigError, ConfigLoadResult, ConfigSource, FileConfig,
    ThemePreference, UiPreferences, config_directory, config_path, effective_client_preferences,
    effective_config, load_config, save_config,
};
pub use controller::{
    BUSY_LABEL, ConversionController, ConversionTrigger, DisplayedImages, Notification,
    NotificationKind, UiState,
};
pub use error::{ConvertError, TransportError};
pub use params::{ParameterSnapshot, ParameterStore};
pub use registry::{ColorModelDefinition, ColorModelRegistry, ParameterSpec};
pub use selection::{ConversionRequest, ImageFile, SelectionState};
