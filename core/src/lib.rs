//! Typed HTTP client core for the LaTech job-status API.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). A `Transport` executes the
//! round-trip; `UreqTransport` is the bundled blocking one.
//!
//! # Design
//! - `ApiClient` is stateless; it holds only the injected base URL.
//! - Responses branch on content type into `ApiResponse::Json(T)` or
//!   `ApiResponse::Raw(HttpResponse)`, so the untyped path is explicit.
//! - Every endpoint has a pure `build_*` / `parse_*` pair plus a method that
//!   runs both around a transport.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod transport;
pub mod types;

pub use client::{ApiClient, ApiResponse};
pub use config::ClientConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
pub use transport::Transport;
#[cfg(feature = "ureq")]
pub use transport::UreqTransport;
pub use types::{EchoMessage, HealthStatus, Job, JobResp, PreprocessOptions, PreprocessResize, StatusResponse};
