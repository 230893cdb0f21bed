//! Which image and which color model the user has picked.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::ConvertError;
use crate::params::{ParameterSnapshot, ParameterStore};
use crate::registry::{ColorModelDefinition, ColorModelRegistry};

/// An image chosen by the user: raw bytes plus the name it is uploaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    name: String,
    bytes: Arc<[u8]>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read an image from disk. The path is used exactly as given.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ConvertError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// MIME type guessed from the file extension.
    pub fn mime_type(&self) -> &'static str {
        let extension = Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        match extension.as_deref() {
            Some("png") => "image/png",
            Some("jpg" | "jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("bmp") => "image/bmp",
            Some("webp") => "image/webp",
            Some("tif" | "tiff") => "image/tiff",
            _ => "application/octet-stream",
        }
    }
}

/// Everything needed for one call to the conversion endpoint, frozen at trigger time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub file: ImageFile,
    pub model_id: &'static str,
    pub params: ParameterSnapshot,
}

/// Selected file, active model and that model's parameter values.
///
/// The active model and the parameter store only change together.
#[derive(Debug, Clone)]
pub struct SelectionState {
    registry: ColorModelRegistry,
    file: Option<ImageFile>,
    active_model: &'static ColorModelDefinition,
    params: ParameterStore,
}

impl SelectionState {
    /// Starts on the registry's default model with its parameters seeded.
    pub fn new(registry: ColorModelRegistry) -> Self {
        let active_model = registry.default_model();
        Self {
            registry,
            file: None,
            active_model,
            params: ParameterStore::seeded(active_model),
        }
    }

    /// Starts on `model_id`, falling back to the default model if it is unknown.
    pub fn with_initial_model(registry: ColorModelRegistry, model_id: &str) -> Self {
        let mut state = Self::new(registry);
        if let Err(err) = state.select_model(model_id) {
            tracing::warn!(error = %err, "falling back to default color model");
        }
        state
    }

    pub fn registry(&self) -> &ColorModelRegistry {
        &self.registry
    }

    pub fn select_file(&mut self, file: ImageFile) {
        tracing::debug!(name = file.name(), bytes = file.len(), "image selected");
        self.file = Some(file);
    }

    pub fn file(&self) -> Option<&ImageFile> {
        self.file.as_ref()
    }

    /// Switch models and reseed parameters to the new model's defaults.
    pub fn select_model(&mut self, id: &str) -> Result<(), ConvertError> {
        let model = self.registry.get_model(id)?;
        self.active_model = model;
        self.params.reseed(model);
        Ok(())
    }

    pub fn active_model(&self) -> &'static ColorModelDefinition {
        self.active_model
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), ConvertError> {
        self.params.set(key, value)
    }

    pub fn can_convert(&self) -> bool {
        self.file.is_some()
    }

    pub fn build_request(&self) -> Result<ConversionRequest, ConvertError> {
        let file = self.file.clone().ok_or_else(|| {
            ConvertError::NoFileSelected("Please select an image file first.".to_string())
        })?;
        Ok(ConversionRequest {
            file,
            model_id: self.active_model.id,
            params: self.params.snapshot(),
        })
    }
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(ColorModelRegistry::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_file() -> ImageFile {
        ImageFile::new("photo.png", vec![1u8, 2, 3])
    }

    #[test]
    fn test_starts_on_default_model_with_defaults() {
        let state = SelectionState::default();
        assert_eq!(state.active_model().id, "grayscale");
        assert_eq!(state.params().model_id(), "grayscale");
        assert_eq!(state.params().get("param1"), Some(0.299));
    }

    #[test]
    fn test_can_convert_tracks_file_only() {
        let mut state = SelectionState::default();
        assert!(!state.can_convert());
        state.select_model("cmyk").unwrap();
        assert!(!state.can_convert());
        state.select_file(sample_file());
        assert!(state.can_convert());
        state.select_model("srgb").unwrap();
        assert!(state.can_convert());
    }

    #[test]
    fn test_select_model_reseeds_atomically() {
        let mut state = SelectionState::default();
        state.select_model("hsv").unwrap();
        assert_eq!(state.active_model().id, state.params().model_id());
        assert_eq!(state.params().get("param1"), Some(0.0));
        assert_eq!(state.params().get("param4"), None);
    }

    #[test]
    fn test_unknown_model_leaves_state_untouched() {
        let mut state = SelectionState::default();
        state.set_parameter("param2", 0.5).unwrap();
        assert!(state.select_model("lab").is_err());
        assert_eq!(state.active_model().id, "grayscale");
        assert_eq!(state.params().get("param2"), Some(0.5));
    }

    #[test]
    fn test_round_trip_model_switch_restores_defaults() {
        let mut state = SelectionState::default();
        state.select_model("hsv").unwrap();
        state.set_parameter("param2", 1.7).unwrap();
        state.select_model("cmyk").unwrap();
        state.set_parameter("param2", 0.2).unwrap();
        state.select_model("hsv").unwrap();
        assert_eq!(state.params().get("param2"), Some(1.0));
    }

    #[test]
    fn test_build_request_requires_file() {
        let state = SelectionState::default();
        assert!(matches!(
            state.build_request(),
            Err(ConvertError::NoFileSelected(_))
        ));
    }

    #[test]
    fn test_build_request_snapshots_current_values() {
        let mut state = SelectionState::default();
        state.select_file(sample_file());
        state.select_model("yiq").unwrap();
        state.set_parameter("param3", 0.4).unwrap();
        let request = state.build_request().unwrap();
        state.set_parameter("param3", 0.9).unwrap();

        assert_eq!(request.model_id, "yiq");
        assert_eq!(request.params.get("param3"), Some(0.4));
        assert_eq!(request.file.name(), "photo.png");
    }

    #[test]
    fn test_with_initial_model_falls_back() {
        let state = SelectionState::with_initial_model(ColorModelRegistry::builtin(), "nope");
        assert_eq!(state.active_model().id, "grayscale");
        let state = SelectionState::with_initial_model(ColorModelRegistry::builtin(), "ycbcr");
        assert_eq!(state.active_model().id, "ycbcr");
    }

    #[test]
    fn test_image_file_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Sunset.JPG");
        let mut handle = fs::File::create(&path).expect("create");
        handle.write_all(b"jpeg-bytes").expect("write");

        let file = ImageFile::from_path(&path).expect("read image");
        assert_eq!(file.name(), "Sunset.JPG");
        assert_eq!(file.bytes(), b"jpeg-bytes");
        assert_eq!(file.mime_type(), "image/jpeg");
    }

    #[test]
    fn test_image_file_from_path_keeps_dollar_in_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("shot$HOME.png");
        fs::write(&path, b"png-bytes").expect("write");

        let file = ImageFile::from_path(&path).expect("read image");
        assert_eq!(file.name(), "shot$HOME.png");
        assert_eq!(file.bytes(), b"png-bytes");
    }

    #[cfg(unix)]
    #[test]
    fn test_image_file_from_non_utf8_path() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(OsStr::from_bytes(b"caf\xe9.png"));
        if fs::write(&path, b"png-bytes").is_err() {
            // Some filesystems refuse non-UTF-8 names.
            return;
        }

        let file = ImageFile::from_path(&path).expect("read image");
        assert_eq!(file.bytes(), b"png-bytes");
        assert_eq!(file.mime_type(), "image/png");
    }

    #[test]
    fn test_image_file_missing_path() {
        let err = ImageFile::from_path("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
