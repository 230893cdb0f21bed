use std::io;

use thiserror::Error;

/// Errors raised by the selection, parameter and controller state.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("unknown color model '{id}'")]
    NotFound { id: String },
    #[error("model '{model}' has no parameter '{key}'")]
    UnknownParameter { model: String, key: String },
    #[error("{key} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        key: String,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{0}")]
    NoFileSelected(String),
    #[error("a conversion is already in progress")]
    ConversionInFlight,
    #[error("failed to read image '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid conversion endpoint '{0}'")]
    InvalidEndpoint(String),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ConvertError {
    pub fn not_found<T: Into<String>>(id: T) -> Self {
        ConvertError::NotFound { id: id.into() }
    }
}

/// Failures on the wire to the conversion service.
///
/// Never escapes [`crate::client::ConversionClient::convert`]; it is flattened into
/// [`crate::client::ConversionResult::Failure`].
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server responded with {status}{}", format_detail(.detail))]
    Status {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    #[error("malformed response body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid base64 in '{field}' image: {source}")]
    Base64 {
        field: &'static str,
        #[source]
        source: base64::DecodeError,
    },
}

fn format_detail(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|text| format!(": {text}"))
        .unwrap_or_default()
}
