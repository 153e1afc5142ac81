//! Executes `HttpRequest` values against the network.
//!
//! # Design
//! The client core only builds and parses plain data; a `Transport` is the
//! one place that performs I/O. Implementations must return non-2xx
//! responses as data, not as errors, so status interpretation stays in
//! `ApiClient::parse_response`.

use std::sync::Arc;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Performs one HTTP round-trip.
pub trait Transport {
    /// Execute `request` and return whatever response the server sent.
    ///
    /// Only failures that prevent a response from arriving at all are
    /// reported as `ApiError::Network`.
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::blocking::UreqTransport;

#[cfg(feature = "ureq")]
mod blocking {
    use tracing::debug;

    use super::Transport;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    /// Blocking transport backed by a ureq agent.
    ///
    /// The agent is configured with `http_status_as_error(false)` so 4xx/5xx
    /// responses come back as data. It has no timeout, follows ureq's
    /// default redirect policy and reads response bodies without a size
    /// limit.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    /// Reason phrase for `status`. Codes without a registered phrase get
    /// `UNKNOWN_STATUS_TEXT` so error messages never read `"599 : ..."`.
    pub(crate) fn status_text(status: ureq::http::StatusCode) -> String {
        status.canonical_reason().unwrap_or(UNKNOWN_STATUS_TEXT).to_string()
    }

    pub(crate) const UNKNOWN_STATUS_TEXT: &str = "Unknown Status";

    fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
        for (name, value) in headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let url = request.url.as_str();
            let body = request.body.as_deref().map(str::as_bytes);

            let result = match (request.method, body) {
                (HttpMethod::Get, Some(_)) => {
                    return Err(ApiError::InvalidRequest(format!("GET request to {url} cannot have a body")));
                }
                (HttpMethod::Get, None) => with_headers(self.agent.get(url), &request.headers).call(),
                (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), &request.headers).call(),
                (HttpMethod::Delete, Some(body)) => {
                    with_headers(self.agent.delete(url), &request.headers).force_send_body().send(body)
                }
                (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), &request.headers).send(body),
                (HttpMethod::Post, None) => with_headers(self.agent.post(url), &request.headers).send_empty(),
                (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), &request.headers).send(body),
                (HttpMethod::Put, None) => with_headers(self.agent.put(url), &request.headers).send_empty(),
            };
            let mut response = result.map_err(|e| ApiError::Network(e.to_string()))?;

            let status = response.status();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
                .collect();
            let body = match response.body_mut().with_config().limit(u64::MAX).read_to_vec() {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    debug!(url = %url, error = %e, "response body could not be read");
                    None
                }
            };

            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status_text(status),
                headers,
                body,
            })
        }
    }
}
