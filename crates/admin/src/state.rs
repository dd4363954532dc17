//! Application state shared across handlers.

use std::sync::Arc;

use zendor_backend::{BackendClient, BackendError};

use crate::config::AdminConfig;
use crate::listing::ListingRegistry;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    backend: BackendClient,
    listings: ListingRegistry,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the API client cannot be built from the
    /// configuration.
    pub fn new(config: AdminConfig) -> Result<Self, BackendError> {
        let backend = BackendClient::new(&config.backend)?;
        let listings = ListingRegistry::new(config.listing_idle);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                backend,
                listings,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the remote API client.
    #[must_use]
    pub fn backend(&self) -> &BackendClient {
        &self.inner.backend
    }

    /// Get a reference to the live product listings.
    #[must_use]
    pub fn listings(&self) -> &ListingRegistry {
        &self.inner.listings
    }
}
