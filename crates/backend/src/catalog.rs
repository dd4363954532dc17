//! Catalog endpoints: categories, product pages, product detail, delete.

use reqwest::Method;
use tracing::instrument;
use zendor_core::listing::ProductsQuery;
use zendor_core::{Product, ProductFamily, ProductId};

use crate::conversions::{convert_product, convert_products};
use crate::types::{CategoryRecord, Envelope, ProductRecord};
use crate::{BackendClient, BackendError, BearerToken};

impl BackendClient {
    /// Sub-category vocabulary of a family, in API order.
    ///
    /// Cached per family for 5 minutes. A response without `data` yields an
    /// empty vocabulary.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NoCatalog`] for families without a remote
    /// catalog, or any transport or API error.
    #[instrument(skip(self, token), fields(family = %family))]
    pub async fn get_categories(
        &self,
        family: ProductFamily,
        token: Option<&BearerToken>,
    ) -> Result<Vec<String>, BackendError> {
        let segment = family
            .api_segment()
            .ok_or(BackendError::NoCatalog(family))?;

        if let Some(cached) = self.inner.categories.get(&family).await {
            tracing::debug!("Cache hit for categories");
            return Ok(cached);
        }

        let envelope: Envelope<Vec<CategoryRecord>> = self
            .request(Method::GET, &format!("/{segment}/getCategories"), token)
            .await?;

        let names: Vec<String> = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .filter_map(|c| c.name)
            .collect();

        self.inner.categories.insert(family, names.clone()).await;
        Ok(names)
    }

    /// One page of products matching `query`.
    ///
    /// A response without `data` yields an empty page.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NoCatalog`] for families without a remote
    /// catalog, or any transport or API error.
    #[instrument(skip(self, query, token), fields(family = %family, page = query.page))]
    pub async fn get_products(
        &self,
        family: ProductFamily,
        query: &ProductsQuery,
        token: Option<&BearerToken>,
    ) -> Result<Vec<Product>, BackendError> {
        let segment = family
            .api_segment()
            .ok_or(BackendError::NoCatalog(family))?;

        let path = format!("/{segment}/products?{}", query.query_string());
        let envelope: Envelope<Vec<ProductRecord>> =
            self.request(Method::GET, &path, token).await?;

        let products = convert_products(envelope.data.unwrap_or_default());
        tracing::debug!(count = products.len(), "Fetched products page");
        Ok(products)
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unsuccessful`] unless the envelope status is
    /// exactly `"success"` and carries a product, plus the usual transport
    /// and API errors.
    #[instrument(skip(self, token), fields(family = %family, id = %id))]
    pub async fn get_product(
        &self,
        family: ProductFamily,
        id: &ProductId,
        token: Option<&BearerToken>,
    ) -> Result<Product, BackendError> {
        let segment = family
            .api_segment()
            .ok_or(BackendError::NoCatalog(family))?;

        let path = format!("/{segment}/product/{}", urlencoding::encode(id.as_str()));
        let envelope: Envelope<ProductRecord> = self.request(Method::GET, &path, token).await?;

        if envelope.status.as_deref() != Some("success") {
            return Err(BackendError::Unsuccessful(
                envelope
                    .message
                    .unwrap_or_else(|| format!("product {id} was not returned")),
            ));
        }

        envelope
            .data
            .and_then(convert_product)
            .ok_or_else(|| BackendError::Unsuccessful(format!("product {id} has no data")))
    }

    /// Delete a product.
    ///
    /// The API exposes deletion only under the wooden-floors collection,
    /// whatever family the product belongs to.
    ///
    /// # Errors
    ///
    /// Returns any transport or API error.
    #[instrument(skip(self, token), fields(id = %id))]
    pub async fn delete_product(
        &self,
        id: &ProductId,
        token: Option<&BearerToken>,
    ) -> Result<(), BackendError> {
        let path = format!("/wooden-floors/products/{}", urlencoding::encode(id.as_str()));
        let _: serde_json::Value = self.request(Method::DELETE, &path, token).await?;
        tracing::info!("Product deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::BackendConfig;

    use super::*;

    fn client() -> BackendClient {
        BackendClient::new(&BackendConfig::with_base_url("http://127.0.0.1:9/api")).unwrap()
    }

    #[tokio::test]
    async fn test_acoustics_has_no_catalog() {
        let client = client();
        let result = client.get_categories(ProductFamily::Acoustics, None).await;
        assert!(matches!(
            result,
            Err(BackendError::NoCatalog(ProductFamily::Acoustics))
        ));

        let query = ProductsQuery::new(1, "", &zendor_core::listing::FilterSet::new());
        let result = client
            .get_products(ProductFamily::Acoustics, &query, None)
            .await;
        assert!(matches!(result, Err(BackendError::NoCatalog(_))));
    }

    #[tokio::test]
    async fn test_cached_categories_skip_network() {
        let client = client();
        client
            .inner
            .categories
            .insert(ProductFamily::Wallpapers, vec!["Matte".to_string()])
            .await;
        let categories = client
            .get_categories(ProductFamily::Wallpapers, None)
            .await
            .unwrap();
        assert_eq!(categories, vec!["Matte".to_string()]);
    }
}
