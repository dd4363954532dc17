//! HTTP plumbing shared by every endpoint.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use zendor_core::ProductFamily;

use crate::types::ErrorBody;
use crate::{BackendConfig, BackendError, BearerToken};

/// Client for the Zendor REST API.
///
/// Cheap to clone; clones share the connection pool and the category cache.
#[derive(Clone)]
pub struct BackendClient {
    pub(crate) inner: Arc<BackendClientInner>,
}

pub(crate) struct BackendClientInner {
    client: reqwest::Client,
    base_url: String,
    pub(crate) categories: Cache<ProductFamily, Vec<String>>,
}

impl BackendClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = config.normalized_base_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        let categories = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url,
                categories,
            }),
        })
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Drop all cached category vocabularies.
    pub fn invalidate_categories(&self) {
        self.inner.categories.invalidate_all();
    }

    /// Send a request and decode the JSON body.
    ///
    /// `path` must start with `/` and may carry a query string.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<T, BackendError> {
        let url = format!("{}{path}", self.inner.base_url);

        let mut request = self.inner.client.request(method.clone(), &url);
        if let Some(token) = token {
            request = request.bearer_auth(token.expose());
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(BackendError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(error_for_status(status, path, &body));
        }

        // Some endpoints (DELETE) answer with an empty body.
        let json = if body.trim().is_empty() { "null" } else { body.as_str() };

        serde_json::from_str(json).map_err(|e| {
            tracing::error!(
                error = %e,
                %method,
                path,
                body = %truncate(&body, 500),
                "Failed to parse API response"
            );
            BackendError::Parse(e)
        })
    }
}

/// Map a non-2xx response to the matching error variant.
fn error_for_status(status: StatusCode, path: &str, body: &str) -> BackendError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized,
        StatusCode::NOT_FOUND => BackendError::NotFound(path.to_string()),
        _ => {
            let message = serde_json::from_str::<ErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| truncate(body, 200));
            tracing::error!(
                status = %status,
                path,
                body = %truncate(body, 500),
                "API returned non-success status"
            );
            BackendError::Api {
                status: status.as_u16(),
                message,
            }
        }
    }
}

fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
