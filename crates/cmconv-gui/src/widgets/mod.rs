//! UI widgets for the cmconv GUI

pub mod convert_buttons;
pub mod image_pair;
pub mod model_selector;
pub mod notification;
pub mod parameter_controls;
pub mod technical_log;
