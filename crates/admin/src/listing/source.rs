//! Where listing tasks get their data from.

use std::future::Future;

use zendor_backend::{BackendClient, BackendError, BearerToken};
use zendor_core::listing::ProductsQuery;
use zendor_core::{Product, ProductFamily};

/// Product data consumed by a listing task.
pub trait ProductSource: Clone + Send + Sync + 'static {
    /// Sub-category vocabulary of `family`.
    fn categories(
        &self,
        family: ProductFamily,
    ) -> impl Future<Output = Result<Vec<String>, BackendError>> + Send;

    /// One page of products.
    fn products(
        &self,
        family: ProductFamily,
        query: &ProductsQuery,
    ) -> impl Future<Output = Result<Vec<Product>, BackendError>> + Send;
}

/// The remote catalog, queried with the admin's bearer token.
#[derive(Clone)]
pub struct CatalogSource {
    client: BackendClient,
    token: Option<BearerToken>,
}

impl CatalogSource {
    #[must_use]
    pub const fn new(client: BackendClient, token: Option<BearerToken>) -> Self {
        Self { client, token }
    }
}

impl ProductSource for CatalogSource {
    async fn categories(&self, family: ProductFamily) -> Result<Vec<String>, BackendError> {
        self.client.get_categories(family, self.token.as_ref()).await
    }

    async fn products(
        &self,
        family: ProductFamily,
        query: &ProductsQuery,
    ) -> Result<Vec<Product>, BackendError> {
        self.client
            .get_products(family, query, self.token.as_ref())
            .await
    }
}
