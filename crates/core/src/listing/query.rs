//! Request parameters for one page of products.

use std::fmt::Write as _;

use super::{FilterSet, PAGE_SIZE};

/// Parameters of a `GET /{family}/products` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductsQuery {
    /// 1-based page number.
    pub page: u32,
    pub limit: usize,
    pub search: String,
    /// Sub-category filters in selection order.
    pub sub_categories: Vec<String>,
}

impl ProductsQuery {
    /// Query for `page` under the given search term and filters.
    #[must_use]
    pub fn new(page: u32, search: &str, filters: &FilterSet) -> Self {
        Self {
            page,
            limit: PAGE_SIZE,
            search: search.to_owned(),
            sub_categories: filters.iter().map(str::to_owned).collect(),
        }
    }

    /// Encoded query string, without the leading `?`.
    ///
    /// Parameter order and shape match what the remote API has always been
    /// sent: `page`, `limit`, then `subCategories` (omitted when empty,
    /// values comma-joined) and finally `search`, which is always present
    /// even when blank.
    ///
    /// ```
    /// use zendor_core::listing::{FilterSet, ProductsQuery};
    ///
    /// let filters: FilterSet = ["Matte", "Glossy"].into_iter().collect();
    /// let query = ProductsQuery::new(2, "blue wall", &filters);
    /// assert_eq!(
    ///     query.query_string(),
    ///     "page=2&limit=10&subCategories=Matte,Glossy&search=blue%20wall"
    /// );
    /// ```
    #[must_use]
    pub fn query_string(&self) -> String {
        let mut out = format!("page={}&limit={}", self.page, self.limit);

        if !self.sub_categories.is_empty() {
            let joined = self
                .sub_categories
                .iter()
                .map(|c| urlencoding::encode(c))
                .collect::<Vec<_>>()
                .join(",");
            let _ = write!(out, "&subCategories={joined}");
        }

        let _ = write!(out, "&search={}", urlencoding::encode(&self.search));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_query_has_blank_search_and_no_filters() {
        let query = ProductsQuery::new(1, "", &FilterSet::new());
        assert_eq!(query.query_string(), "page=1&limit=10&search=");
    }

    #[test]
    fn test_filter_values_are_encoded_individually() {
        let filters: FilterSet = ["Wood & Stone", "3D"].into_iter().collect();
        let query = ProductsQuery::new(1, "", &filters);
        assert_eq!(
            query.query_string(),
            "page=1&limit=10&subCategories=Wood%20%26%20Stone,3D&search="
        );
    }
}
