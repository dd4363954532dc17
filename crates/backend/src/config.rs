//! Client configuration.

use std::time::Duration;

use url::Url;

use crate::BackendError;

/// Production API origin.
pub const DEFAULT_BASE_URL: &str = "https://zendor-backend.onrender.com/api";

/// Transport timeout applied to every request.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where and how to reach the remote API.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL; endpoint paths are appended to it verbatim.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BackendConfig {
    /// Config pointing at `base_url` with the default timeout.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Validated base URL with any trailing slash removed.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::InvalidBaseUrl`] if the URL does not parse or
    /// is not http(s).
    pub fn normalized_base_url(&self) -> Result<String, BackendError> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| BackendError::InvalidBaseUrl(format!("{}: {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(BackendError::InvalidBaseUrl(format!(
                "{}: scheme must be http or https",
                self.base_url
            )));
        }
        Ok(self.base_url.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_production() {
        let config = BackendConfig::default();
        assert_eq!(
            config.normalized_base_url().unwrap(),
            "https://zendor-backend.onrender.com/api"
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = BackendConfig::with_base_url("http://localhost:5000/api/");
        assert_eq!(
            config.normalized_base_url().unwrap(),
            "http://localhost:5000/api"
        );
    }

    #[test]
    fn test_rejects_non_http() {
        assert!(
            BackendConfig::with_base_url("ftp://example.com")
                .normalized_base_url()
                .is_err()
        );
        assert!(
            BackendConfig::with_base_url("not a url")
                .normalized_base_url()
                .is_err()
        );
    }
}
