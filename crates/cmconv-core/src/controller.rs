//! Conversion state machine consumed by the front ends.
//!
//! ```text
//! Idle --select file--> Ready --convert--> Busy --success--> Ready
//!                                          Busy --failure--> Errored --retry--> Busy
//!                                                            Errored --dismiss--> Ready
//! ```
//!
//! The controller owns the [`SelectionState`] so every user event funnels
//! through one place, and it refuses to start a second conversion while one is
//! in flight.

use tracing::{debug, info};

use crate::client::{ConversionClient, ConversionResult, RenderedImage};
use crate::error::ConvertError;
use crate::registry::{ColorModelDefinition, ColorModelRegistry};
use crate::selection::{ConversionRequest, ImageFile, SelectionState};

/// Observable UI state derived from selection and request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    /// No file selected.
    Idle,
    /// File selected, nothing in flight.
    Ready,
    /// A conversion request is in flight; triggers are disabled.
    Busy,
    /// The last request failed and its notification has not been dismissed.
    Errored,
}

/// The two buttons that start a conversion. Both run the same flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionTrigger {
    /// "Upload & Convert" after choosing a file.
    Upload,
    /// "Apply Changes" after editing parameters.
    Apply,
}

impl ConversionTrigger {
    pub fn idle_label(self) -> &'static str {
        match self {
            ConversionTrigger::Upload => "Upload & Convert",
            ConversionTrigger::Apply => "Apply Changes",
        }
    }

    fn missing_file_message(self) -> &'static str {
        match self {
            ConversionTrigger::Upload => "Please select an image file first.",
            ConversionTrigger::Apply => "Please upload an image first.",
        }
    }
}

pub const BUSY_LABEL: &str = "Processing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Blocks the action that raised it (missing file).
    Warning,
    /// A request failed.
    Error,
}

/// A dismissible message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

/// The before/after pair currently on screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayedImages {
    pub original: Option<RenderedImage>,
    pub converted: Option<RenderedImage>,
}

#[derive(Debug, Clone)]
pub struct ConversionController {
    selection: SelectionState,
    displayed: DisplayedImages,
    notification: Option<Notification>,
    in_flight: bool,
    failed: bool,
    completed: u64,
}

impl ConversionController {
    pub fn new(selection: SelectionState) -> Self {
        Self {
            selection,
            displayed: DisplayedImages::default(),
            notification: None,
            in_flight: false,
            failed: false,
            completed: 0,
        }
    }

    pub fn with_registry(registry: ColorModelRegistry, initial_model: &str) -> Self {
        Self::new(SelectionState::with_initial_model(registry, initial_model))
    }

    pub fn state(&self) -> UiState {
        if self.in_flight {
            UiState::Busy
        } else if self.failed {
            UiState::Errored
        } else if self.selection.can_convert() {
            UiState::Ready
        } else {
            UiState::Idle
        }
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn active_model(&self) -> &'static ColorModelDefinition {
        self.selection.active_model()
    }

    /// Description text for the info panel.
    pub fn model_info(&self) -> &'static str {
        self.selection.active_model().description
    }

    pub fn displayed(&self) -> &DisplayedImages {
        &self.displayed
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Number of successful conversions so far; front ends use it to spot new images.
    pub fn completed_conversions(&self) -> u64 {
        self.completed
    }

    /// Whether the convert triggers accept clicks.
    pub fn controls_enabled(&self) -> bool {
        !self.in_flight
    }

    pub fn trigger_label(&self, trigger: ConversionTrigger) -> &'static str {
        if self.in_flight {
            BUSY_LABEL
        } else {
            trigger.idle_label()
        }
    }

    /// Replace the file. A pending missing-file warning no longer applies.
    pub fn select_file(&mut self, file: ImageFile) {
        self.selection.select_file(file);
        if self
            .notification
            .as_ref()
            .is_some_and(|notification| notification.kind == NotificationKind::Warning)
        {
            self.notification = None;
        }
    }

    pub fn select_model(&mut self, id: &str) -> Result<(), ConvertError> {
        self.selection.select_model(id)?;
        debug!(model = id, "color model selected");
        Ok(())
    }

    pub fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), ConvertError> {
        self.selection.set_parameter(key, value)
    }

    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.failed = false;
    }

    /// Move to `Busy` and hand back the request to send.
    ///
    /// Refused while another request is in flight. Without a file, a warning
    /// notification is raised and nothing is sent.
    pub fn begin_conversion(
        &mut self,
        trigger: ConversionTrigger,
    ) -> Result<ConversionRequest, ConvertError> {
        if self.in_flight {
            return Err(ConvertError::ConversionInFlight);
        }
        if !self.selection.can_convert() {
            let message = trigger.missing_file_message();
            self.notification = Some(Notification {
                kind: NotificationKind::Warning,
                message: message.to_string(),
            });
            return Err(ConvertError::NoFileSelected(message.to_string()));
        }

        let request = self.selection.build_request()?;
        self.in_flight = true;
        self.failed = false;
        self.notification = None;
        info!(
            model = request.model_id,
            file = request.file.name(),
            ?trigger,
            "conversion requested"
        );
        Ok(request)
    }

    /// Apply the outcome of the request started by [`Self::begin_conversion`].
    pub fn complete_conversion(&mut self, result: ConversionResult) {
        if !self.in_flight {
            debug!("ignoring conversion result with no request in flight");
            return;
        }
        self.in_flight = false;
        match result {
            ConversionResult::Success {
                original,
                converted,
            } => {
                self.displayed.original = Some(original);
                self.displayed.converted = Some(converted);
                self.failed = false;
                self.notification = None;
                self.completed += 1;
            }
            ConversionResult::Failure { message } => {
                self.failed = true;
                self.notification = Some(Notification {
                    kind: NotificationKind::Error,
                    message: format!("Error processing image: {message}"),
                });
            }
        }
    }

    /// Run one full conversion against `client`.
    ///
    /// `&mut self` is held across the request, so a second call cannot overlap.
    pub async fn convert_with(
        &mut self,
        client: &ConversionClient,
        trigger: ConversionTrigger,
    ) -> Result<UiState, ConvertError> {
        let request = self.begin_conversion(trigger)?;
        let result = client.convert(&request).await;
        self.complete_conversion(result);
        Ok(self.state())
    }
}

impl Default for ConversionController {
    fn default() -> Self {
        Self::new(SelectionState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn success(original: &str, converted: &str) -> ConversionResult {
        ConversionResult::from_response_body(&format!(
            r#"{{"original":"{original}","converted":"{converted}"}}"#
        ))
    }

    fn ready_controller() -> ConversionController {
        let mut controller = ConversionController::default();
        controller.select_file(ImageFile::new("cat.png", vec![0u8; 4]));
        controller
    }

    #[test]
    fn test_idle_until_file_selected() {
        let mut controller = ConversionController::default();
        assert_eq!(controller.state(), UiState::Idle);
        controller.select_file(ImageFile::new("cat.png", vec![1u8]));
        assert_eq!(controller.state(), UiState::Ready);
    }

    #[test]
    fn test_convert_without_file_raises_warning() {
        let mut controller = ConversionController::default();
        let err = controller
            .begin_conversion(ConversionTrigger::Apply)
            .unwrap_err();
        assert!(matches!(err, ConvertError::NoFileSelected(_)));
        let notification = controller.notification().expect("notification");
        assert_eq!(notification.kind, NotificationKind::Warning);
        assert_eq!(notification.message, "Please upload an image first.");
        assert_eq!(controller.state(), UiState::Idle);
    }

    #[test]
    fn test_selecting_file_clears_missing_file_warning() {
        let mut controller = ConversionController::default();
        assert!(controller.begin_conversion(ConversionTrigger::Upload).is_err());
        assert!(controller.notification().is_some());

        controller.select_file(ImageFile::new("cat.png", vec![1u8]));
        assert!(controller.notification().is_none());
        assert_eq!(controller.state(), UiState::Ready);
    }

    #[test]
    fn test_selecting_file_keeps_error_notification() {
        let mut controller = ready_controller();
        controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        controller.complete_conversion(ConversionResult::Failure {
            message: "boom".to_string(),
        });

        controller.select_file(ImageFile::new("dog.png", vec![2u8]));
        let notification = controller.notification().expect("notification");
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(controller.state(), UiState::Errored);
    }

    #[test]
    fn test_success_cycle() {
        let mut controller = ready_controller();
        controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        assert_eq!(controller.state(), UiState::Busy);
        assert!(!controller.controls_enabled());
        assert_eq!(controller.trigger_label(ConversionTrigger::Apply), BUSY_LABEL);

        controller.complete_conversion(success("Zm9v", "YmFy"));
        assert_eq!(controller.state(), UiState::Ready);
        assert!(controller.controls_enabled());
        assert_eq!(
            controller.trigger_label(ConversionTrigger::Upload),
            "Upload & Convert"
        );
        let shown = controller.displayed();
        assert_eq!(
            shown.original.as_ref().unwrap().data_uri(),
            "data:image/png;base64,Zm9v"
        );
        assert_eq!(
            shown.converted.as_ref().unwrap().data_uri(),
            "data:image/png;base64,YmFy"
        );
        assert_eq!(controller.completed_conversions(), 1);
    }

    #[test]
    fn test_second_begin_while_busy_is_refused() {
        let mut controller = ready_controller();
        controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        let err = controller
            .begin_conversion(ConversionTrigger::Apply)
            .unwrap_err();
        assert!(matches!(err, ConvertError::ConversionInFlight));
        assert_eq!(controller.state(), UiState::Busy);
    }

    #[test]
    fn test_failure_keeps_previous_images() {
        let mut controller = ready_controller();
        controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        controller.complete_conversion(success("Zm9v", "YmFy"));
        let before = controller.displayed().clone();

        controller.begin_conversion(ConversionTrigger::Apply).unwrap();
        controller.complete_conversion(ConversionResult::Failure {
            message: "server responded with 500".to_string(),
        });

        assert_eq!(controller.state(), UiState::Errored);
        assert_eq!(controller.displayed(), &before);
        let notification = controller.notification().expect("notification");
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(notification.message.starts_with("Error processing image:"));
    }

    #[test]
    fn test_retry_from_errored() {
        let mut controller = ready_controller();
        controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        controller.complete_conversion(ConversionResult::Failure {
            message: "boom".to_string(),
        });
        assert_eq!(controller.state(), UiState::Errored);

        controller.begin_conversion(ConversionTrigger::Apply).unwrap();
        assert_eq!(controller.state(), UiState::Busy);
        assert!(controller.notification().is_none());
        controller.complete_conversion(success("Zm9v", "YmFy"));
        assert_eq!(controller.state(), UiState::Ready);
    }

    #[test]
    fn test_dismiss_returns_to_ready() {
        let mut controller = ready_controller();
        controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        controller.complete_conversion(ConversionResult::Failure {
            message: "boom".to_string(),
        });
        controller.dismiss_notification();
        assert_eq!(controller.state(), UiState::Ready);
        assert!(controller.notification().is_none());
    }

    #[test]
    fn test_stray_result_is_ignored() {
        let mut controller = ready_controller();
        controller.complete_conversion(success("Zm9v", "YmFy"));
        assert!(controller.displayed().original.is_none());
        assert_eq!(controller.state(), UiState::Ready);
    }

    #[test]
    fn test_model_switch_reseeds_through_controller() {
        let mut controller = ready_controller();
        controller.select_model("cmyk").unwrap();
        controller.set_parameter("param4", 0.3).unwrap();
        controller.select_model("yuv").unwrap();
        controller.select_model("cmyk").unwrap();
        assert_eq!(controller.selection().params().get("param4"), Some(1.0));
        assert!(controller.model_info().contains("print"));
    }

    #[test]
    fn test_request_carries_active_schema_only() {
        let mut controller = ready_controller();
        controller.select_model("adobergb").unwrap();
        let request = controller.begin_conversion(ConversionTrigger::Upload).unwrap();
        assert_eq!(request.model_id, "adobergb");
        assert_eq!(request.params.keys().collect::<Vec<_>>(), vec!["param1"]);
    }
}
