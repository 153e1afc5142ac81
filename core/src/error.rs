//! Error types for the LaTech API client.
//!
//! # Design
//! Every non-2xx response lands in `Http` with the status, the reason
//! phrase and the best-effort body text. Transport failures keep the
//! transport's own message so callers see exactly what went wrong on the
//! wire.

use thiserror::Error;

/// Errors returned by `ApiClient` and `Transport` implementations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS).
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{status} {status_text}: {detail}")]
    Http {
        status: u16,
        status_text: String,
        detail: String,
    },

    /// The response declared `application/json` but its body did not decode.
    #[error("decode error: {0}")]
    Decode(String),

    /// The request cannot be sent as described (e.g. a `GET` with a body).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A typed helper got the other side of the content-type branch.
    #[error("unexpected content-type {content_type:?}")]
    UnexpectedContentType { content_type: String },

    /// The transport delivered a status but the body could not be read.
    #[error("response body could not be read")]
    BodyUnreadable,
}

impl ApiError {
    /// HTTP status for `Http` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_message_format() {
        let err = ApiError::Http {
            status: 500,
            status_text: "Internal Server Error".to_string(),
            detail: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "500 Internal Server Error: boom");
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn network_error_keeps_transport_message() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status(), None);
    }
}
