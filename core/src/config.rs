//! Client configuration.

/// Environment variable holding the API base URL.
pub const BASE_URL_ENV: &str = "PUBLIC_API_BASE";

/// Settings injected into `ApiClient` at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// Prefix prepended verbatim to every request path. Empty means the
    /// paths themselves are complete or root-relative URLs.
    pub base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Read the base URL from `PUBLIC_API_BASE`, defaulting to `""`.
    pub fn from_env() -> Self {
        Self::new(std::env::var(BASE_URL_ENV).unwrap_or_default())
    }
}
