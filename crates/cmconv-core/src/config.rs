use crate::registry::ColorModelRegistry;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR_NAME: &str = "cmconv";
const CONFIG_FILE_NAME: &str = "config.toml";
const CURRENT_SCHEMA_VERSION: u32 = 1;
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/convert/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const ENDPOINT_ENV_VAR: &str = "CMCONV_ENDPOINT";

/// Result returned by [`load_config`], capturing the source and any non-fatal issues.
#[derive(Debug, Clone)]
pub struct ConfigLoadResult {
    pub config: FileConfig,
    pub warnings: Vec<String>,
    pub source: ConfigSource,
}

/// Indicates where the configuration was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// No persisted configuration was found or usable; defaults were synthesized.
    Default,
    /// Configuration was read from `config.toml`.
    File,
}

/// Errors that can occur when persisting configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Ser(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {err}"),
            ConfigError::Ser(err) => write!(f, "TOML serialization error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Ser(value)
    }
}

/// Disk-backed configuration schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default = "FileConfig::schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub client: ClientPreferences,
    #[serde(default)]
    pub ui: UiPreferences,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            client: ClientPreferences::default(),
            ui: UiPreferences::default(),
        }
    }
}

impl FileConfig {
    const fn schema_version() -> u32 {
        CURRENT_SCHEMA_VERSION
    }
}

/// How to reach the conversion service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPreferences {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

const fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    format!("cmconv/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientPreferences {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Front-end preferences shared by the GUI and CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiPreferences {
    #[serde(default)]
    pub theme: ThemePreference,
    /// Color model selected at startup.
    #[serde(default = "default_model_id")]
    pub default_model: String,
}

fn default_model_id() -> String {
    ColorModelRegistry::builtin().default_model().id.to_string()
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            theme: ThemePreference::default(),
            default_model: default_model_id(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Dark,
    Light,
}

impl Default for ThemePreference {
    fn default() -> Self {
        ThemePreference::Dark
    }
}

/// One-shot overrides layered over the persisted client preferences (CLI flags).
#[derive(Debug, Default, Clone)]
pub struct ClientOverrides {
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Path to the configuration directory.
pub fn config_directory() -> PathBuf {
    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path to `config.toml`.
pub fn config_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Load the configuration from the default location, falling back to defaults.
pub fn load_config() -> ConfigLoadResult {
    load_config_from(&config_path())
}

/// Load the configuration from `path`. Never fails; problems become warnings.
pub fn load_config_from(path: &Path) -> ConfigLoadResult {
    let mut warnings = Vec::new();

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str::<FileConfig>(&raw) {
                Ok(cfg) => {
                    let (cfg, mut sanitize_warnings) = sanitize_config(cfg);
                    warnings.append(&mut sanitize_warnings);
                    return ConfigLoadResult {
                        config: cfg,
                        warnings,
                        source: ConfigSource::File,
                    };
                }
                Err(err) => {
                    warnings.push(format!(
                        "Failed to parse {} as TOML: {}. Falling back to defaults.",
                        path.display(),
                        err
                    ));
                }
            },
            Err(err) => {
                warnings.push(format!(
                    "Failed to read {}: {}. Falling back to defaults.",
                    path.display(),
                    err
                ));
            }
        }
    }

    ConfigLoadResult {
        config: FileConfig::default(),
        warnings,
        source: ConfigSource::Default,
    }
}

/// Persist the configuration to the default location.
pub fn save_config(config: &FileConfig) -> Result<(), ConfigError> {
    save_config_to(&config_path(), config)
}

pub fn save_config_to(path: &Path, config: &FileConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(config)?;
    fs::write(path, serialized)?;
    Ok(())
}

fn sanitize_config(mut config: FileConfig) -> (FileConfig, Vec<String>) {
    let mut warnings = Vec::new();

    if config.schema_version != CURRENT_SCHEMA_VERSION {
        warnings.push(format!(
            "Unsupported schema_version {}; treating as {}.",
            config.schema_version, CURRENT_SCHEMA_VERSION
        ));
        config.schema_version = CURRENT_SCHEMA_VERSION;
    }

    if config.client.endpoint.trim().is_empty() {
        warnings.push(format!(
            "client.endpoint is empty; using {}.",
            DEFAULT_ENDPOINT
        ));
        config.client.endpoint = default_endpoint();
    }

    if config.client.timeout_secs == 0 {
        warnings.push(format!(
            "client.timeout_secs must be positive; using {}.",
            DEFAULT_TIMEOUT_SECS
        ));
        config.client.timeout_secs = DEFAULT_TIMEOUT_SECS;
    }

    if config.client.user_agent.trim().is_empty() {
        config.client.user_agent = default_user_agent();
    }

    let registry = ColorModelRegistry::builtin();
    if !registry.contains(&config.ui.default_model) {
        let fallback = registry.default_model().id;
        warnings.push(format!(
            "ui.default_model '{}' is not a known color model; using '{}'.",
            config.ui.default_model, fallback
        ));
        config.ui.default_model = fallback.to_string();
    }

    (config, warnings)
}

/// Resolve the client preferences to use for this run: file, then
/// `CMCONV_ENDPOINT`, then explicit overrides.
pub fn effective_client_preferences(
    config: &FileConfig,
    overrides: &ClientOverrides,
) -> ClientPreferences {
    let env_endpoint = env::var(ENDPOINT_ENV_VAR).ok();
    merge_client_preferences(&config.client, env_endpoint.as_deref(), overrides)
}

/// The config with the `CMCONV_ENDPOINT` override applied, as a run would see it.
pub fn effective_config(config: &FileConfig) -> FileConfig {
    let env_endpoint = env::var(ENDPOINT_ENV_VAR).ok();
    apply_env_endpoint(config, env_endpoint.as_deref())
}

fn apply_env_endpoint(config: &FileConfig, env_endpoint: Option<&str>) -> FileConfig {
    let mut effective = config.clone();
    effective.client =
        merge_client_preferences(&config.client, env_endpoint, &ClientOverrides::default());
    effective
}

fn merge_client_preferences(
    base: &ClientPreferences,
    env_endpoint: Option<&str>,
    overrides: &ClientOverrides,
) -> ClientPreferences {
    let mut preferences = base.clone();
    if let Some(endpoint) = env_endpoint.map(str::trim).filter(|value| !value.is_empty()) {
        preferences.endpoint = endpoint.to_string();
    }
    if let Some(endpoint) = overrides.endpoint.as_ref() {
        preferences.endpoint = endpoint.trim().to_string();
    }
    if let Some(timeout) = overrides.timeout_secs.filter(|secs| *secs > 0) {
        preferences.timeout_secs = timeout;
    }
    preferences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let load = load_config_from(&dir.path().join("config.toml"));
        assert_eq!(load.source, ConfigSource::Default);
        assert!(load.warnings.is_empty());
        assert_eq!(load.config, FileConfig::default());
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = FileConfig::default();
        config.client.endpoint = "http://10.0.0.5:9000/convert/".to_string();
        config.client.timeout_secs = 15;
        config.ui.default_model = "hsv".to_string();
        config.ui.theme = ThemePreference::Light;

        save_config_to(&path, &config).expect("save");
        let load = load_config_from(&path);
        assert_eq!(load.source, ConfigSource::File);
        assert_eq!(load.config, config);
    }

    #[test]
    fn test_unparseable_toml_falls_back_with_warning() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "client = [not toml").expect("write");
        let load = load_config_from(&path);
        assert_eq!(load.source, ConfigSource::Default);
        assert!(load.warnings.iter().any(|w| w.contains("Failed to parse")));
    }

    #[test]
    fn test_sanitize_unknown_default_model() {
        let mut config = FileConfig::default();
        config.ui.default_model = "lab".to_string();
        let (sanitized, warnings) = sanitize_config(config);
        assert_eq!(sanitized.ui.default_model, "grayscale");
        assert!(warnings.iter().any(|w| w.contains("lab")));
    }

    #[test]
    fn test_sanitize_zero_timeout_and_empty_endpoint() {
        let mut config = FileConfig::default();
        config.client.timeout_secs = 0;
        config.client.endpoint = "   ".to_string();
        let (sanitized, warnings) = sanitize_config(config);
        assert_eq!(sanitized.client.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(sanitized.client.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[client]\nendpoint = \"http://convert.local/convert/\"\n")
            .expect("write");
        let load = load_config_from(&path);
        assert_eq!(load.config.client.endpoint, "http://convert.local/convert/");
        assert_eq!(load.config.client.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(load.config.ui.default_model, "grayscale");
    }

    #[test]
    fn test_effective_config_applies_env_endpoint() {
        let mut config = FileConfig::default();
        config.ui.default_model = "yuv".to_string();
        config.client.timeout_secs = 12;

        let effective = apply_env_endpoint(&config, Some("http://env/convert/"));
        assert_eq!(effective.client.endpoint, "http://env/convert/");
        assert_eq!(effective.client.timeout_secs, 12);
        assert_eq!(effective.ui, config.ui);

        assert_eq!(apply_env_endpoint(&config, None), config);
    }

    #[test]
    fn test_override_precedence() {
        let base = ClientPreferences::default();
        let merged = merge_client_preferences(&base, Some("http://env/convert/"), &ClientOverrides::default());
        assert_eq!(merged.endpoint, "http://env/convert/");

        let overrides = ClientOverrides {
            endpoint: Some("http://flag/convert/".to_string()),
            timeout_secs: Some(5),
        };
        let merged = merge_client_preferences(&base, Some("http://env/convert/"), &overrides);
        assert_eq!(merged.endpoint, "http://flag/convert/");
        assert_eq!(merged.timeout_secs, 5);

        let merged = merge_client_preferences(&base, Some("  "), &ClientOverrides::default());
        assert_eq!(merged.endpoint, DEFAULT_ENDPOINT);
    }
}
