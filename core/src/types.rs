//! Domain DTOs for the LaTech API.
//!
//! # Design
//! These mirror the mock-server's schema but are defined independently.
//! Integration tests catch drift between the two crates. Field names follow
//! the backend's wire format (`job_id`, `latex_id`, ...).

use serde::{Deserialize, Serialize};

/// A conversion job as listed by `GET /api/jobs`.
///
/// The artifact ids are filled in by the backend pipeline as the job
/// progresses through upload, preprocessing, conversion and compilation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Job {
    pub job_id: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latex_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_id: Option<String>,
}

/// Acknowledgement carrying the id of the job an operation was queued for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobResp {
    pub job_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
}

/// Request and response body of `POST /api/echo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EchoMessage {
    pub message: String,
}

/// Target size for the preprocessing resize step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreprocessResize {
    pub width: u32,
    pub height: u32,
}

/// Image clean-up applied before conversion. Defaults to grayscale only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PreprocessOptions {
    #[serde(default = "default_grayscale")]
    pub grayscale: bool,
    #[serde(default)]
    pub denoise: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resize: Option<PreprocessResize>,
}

fn default_grayscale() -> bool {
    true
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            grayscale: true,
            denoise: false,
            threshold: None,
            resize: None,
        }
    }
}

/// Progress report from `GET /api/status/{job_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusResponse {
    pub state: String,
    pub progress: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
