//! Client for the Zendor REST API.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for products, users and orders;
//!   nothing is synced locally
//! - Every request carries `Authorization: Bearer <token>` when the caller
//!   supplies a token (the token comes from the visitor's session and is
//!   passed explicitly, never read from global state)
//! - Category vocabularies are cached in memory via `moka` (5 minute TTL)
//!
//! # Endpoints
//!
//! ```text
//! GET    /{wallpapers|wooden-floors}/getCategories
//! GET    /{wallpapers|wooden-floors}/products?page=&limit=10&subCategories=&search=
//! GET    /{wallpapers|wooden-floors}/product/{id}
//! DELETE /wooden-floors/products/{id}
//! GET    /user/getUserProfile
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use zendor_backend::{BackendClient, BackendConfig, BearerToken};
//! use zendor_core::{ProductFamily, listing::{FilterSet, ProductsQuery}};
//!
//! let client = BackendClient::new(&BackendConfig::default())?;
//! let token = BearerToken::new("eyJhbGciOi...");
//!
//! let query = ProductsQuery::new(1, "", &FilterSet::new());
//! let page = client
//!     .get_products(ProductFamily::Wallpapers, &query, Some(&token))
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod catalog;
mod client;
mod config;
mod conversions;
mod token;
pub mod types;
mod user;

pub use client::BackendClient;
pub use config::{BackendConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use token::{BearerToken, SessionHandoff};

use thiserror::Error;

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Transport failure (connect, timeout, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Non-2xx response not covered by a more specific variant.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or a prefix of the raw body.
        message: String,
    },

    /// Missing, expired or insufficient credentials (401/403).
    #[error("Unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// 2xx response whose envelope status was not `"success"`.
    #[error("Request unsuccessful: {0}")]
    Unsuccessful(String),

    /// The product family has no catalog on the remote API.
    #[error("No catalog for product family {0}")]
    NoCatalog(zendor_core::ProductFamily),

    /// The configured base URL cannot be used.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
