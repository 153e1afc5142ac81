//! Display text for call outcomes.
//!
//! Strings are shown as-is, other JSON values pretty-printed with two-space
//! indentation, raw responses as their body text, and failures as the
//! error's display form.

use serde_json::Value;

use crate::client::ApiResponse;
use crate::error::ApiError;

/// Placeholder shown while a call is in flight.
pub const LOADING: &str = "Loading...";

pub fn render_payload(payload: &ApiResponse<Value>) -> String {
    match payload {
        ApiResponse::Json(Value::String(text)) => text.clone(),
        ApiResponse::Json(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        ApiResponse::Raw(response) => match response.text() {
            Ok(text) => text.into_owned(),
            Err(_) => response.status_text.clone(),
        },
    }
}

pub fn render_outcome(outcome: &Result<ApiResponse<Value>, ApiError>) -> String {
    match outcome {
        Ok(payload) => render_payload(payload),
        Err(err) => err.to_string(),
    }
}
