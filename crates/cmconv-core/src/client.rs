//! HTTP client for the remote conversion service.
//!
//! One multipart `POST` per conversion; the JSON reply carries the original and
//! converted images as base64 PNG.

use std::time::{Duration, Instant};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, warn};

use crate::config::ClientPreferences;
use crate::error::{ConvertError, TransportError};
use crate::selection::ConversionRequest;

/// Prefix the service's PNG payloads are rendered under.
pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// One image returned by the conversion service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedImage {
    payload: String,
    bytes: Vec<u8>,
}

impl RenderedImage {
    /// Decode a base64 payload taken from the `field` member of the response.
    fn decode(field: &'static str, payload: String) -> Result<Self, TransportError> {
        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|source| TransportError::Base64 { field, source })?;
        Ok(Self { payload, bytes })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:image/png;base64,<payload>`, ready for an image source attribute.
    pub fn data_uri(&self) -> String {
        format!("{PNG_DATA_URI_PREFIX}{}", self.payload)
    }
}

/// Outcome of one conversion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionResult {
    Success {
        original: RenderedImage,
        converted: RenderedImage,
    },
    Failure {
        message: String,
    },
}

impl ConversionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionResult::Success { .. })
    }

    /// Build a result from the raw JSON body of a 2xx response.
    pub fn from_response_body(body: &str) -> Self {
        match decode_success(body) {
            Ok((original, converted)) => ConversionResult::Success {
                original,
                converted,
            },
            Err(err) => ConversionResult::Failure {
                message: err.to_string(),
            },
        }
    }
}

#[derive(Deserialize)]
struct ConvertResponse {
    original: String,
    converted: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    detail: Option<serde_json::Value>,
}

fn decode_success(body: &str) -> Result<(RenderedImage, RenderedImage), TransportError> {
    let response: ConvertResponse = serde_json::from_str(body)?;
    let original = RenderedImage::decode("original", response.original)?;
    let converted = RenderedImage::decode("converted", response.converted)?;
    Ok((original, converted))
}

/// Pull the service's error text out of a failed response, if it sent JSON.
fn error_detail(body: &str) -> Option<String> {
    let parsed: ErrorResponse = serde_json::from_str(body).ok()?;
    parsed.error.or_else(|| {
        parsed.detail.map(|detail| match detail {
            serde_json::Value::String(text) => text,
            other => other.to_string(),
        })
    })
}

/// Sends conversion requests to the remote service.
///
/// Makes exactly one attempt per call. Callers that want at-most-one request in
/// flight must serialize calls themselves.
#[derive(Debug, Clone)]
pub struct ConversionClient {
    http: reqwest::Client,
    endpoint: reqwest::Url,
}

impl ConversionClient {
    pub fn new(preferences: &ClientPreferences) -> Result<Self, ConvertError> {
        let endpoint = reqwest::Url::parse(preferences.endpoint.trim())
            .map_err(|_| ConvertError::InvalidEndpoint(preferences.endpoint.clone()))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(ConvertError::InvalidEndpoint(preferences.endpoint.clone()));
        }

        let http = reqwest::Client::builder()
            .user_agent(preferences.user_agent.as_str())
            .timeout(Duration::from_secs(preferences.timeout_secs.max(1)))
            .build()?;

        Ok(Self { http, endpoint })
    }

    pub fn endpoint(&self) -> &reqwest::Url {
        &self.endpoint
    }

    /// Post `request` and decode the image pair. Never fails; errors become
    /// [`ConversionResult::Failure`].
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        let started = Instant::now();
        match self.try_convert(request).await {
            Ok((original, converted)) => {
                info!(
                    model = request.model_id,
                    params = request.params.len(),
                    upload_bytes = request.file.len(),
                    converted_bytes = converted.bytes().len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "conversion succeeded"
                );
                ConversionResult::Success {
                    original,
                    converted,
                }
            }
            Err(err) => {
                warn!(
                    model = request.model_id,
                    error = %err,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "conversion failed"
                );
                ConversionResult::Failure {
                    message: err.to_string(),
                }
            }
        }
    }

    async fn try_convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<(RenderedImage, RenderedImage), TransportError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .multipart(build_form(request)?)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status,
                detail: error_detail(&body),
            });
        }

        decode_success(&body)
    }
}

fn build_form(request: &ConversionRequest) -> Result<Form, TransportError> {
    let file = Part::bytes(request.file.bytes().to_vec())
        .file_name(request.file.name().to_string())
        .mime_str(request.file.mime_type())?;

    let mut form = Form::new()
        .part("file", file)
        .text("model", request.model_id);
    for (key, value) in request.params.iter() {
        form = form.text(key, value.to_string());
    }
    Ok(form)
}
