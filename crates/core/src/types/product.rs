//! Catalog product as shown in listings and detail pages.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A catalog product.
///
/// Owned by the remote API. Values held here are a read-only, possibly
/// stale copy of one page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// List price.
    pub price: Option<Price>,
    /// Cost of ordering a sample, when the family sells samples.
    pub sample_cost: Option<Price>,
    /// Primary image URL.
    pub image: Option<String>,
    pub description: String,
    pub brand: Option<String>,
    pub finish: Option<String>,
    pub surface: Option<String>,
    pub sub_category: Option<String>,
    pub stock: Option<i64>,
    pub tags: Vec<String>,
}

impl Product {
    /// Price shown on the product card.
    ///
    /// A non-zero sample cost takes precedence over the list price.
    #[must_use]
    pub fn display_price(&self) -> Option<Price> {
        self.sample_cost
            .filter(|cost| !cost.amount.is_zero())
            .or(self.price)
    }

    /// A product with only the required fields set.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: None,
            sample_cost: None,
            image: None,
            description: String::new(),
            brand: None,
            finish: None,
            surface: None,
            sub_category: None,
            stock: None,
            tags: Vec::new(),
        }
    }
}
