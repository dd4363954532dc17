//! Listing state machine.

use crate::types::{Product, ProductFamily, ProductId};

use super::{FilterSet, PAGE_SIZE, ProductsQuery};

/// Identifies the query state a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    /// Query generation; bumped by every search, filter or family change.
    pub generation: u64,
    /// Page requested.
    pub page: u32,
}

/// What happened to a fetch completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The result was merged into the list.
    Applied,
    /// The query changed since the fetch was issued; the result was dropped.
    Stale,
}

/// State of one product listing (one family, one viewer).
///
/// Invariants:
/// - `products` is exactly pages `1..=page` of the current
///   (search, filters) pair, or a prefix of it while a fetch is pending.
/// - Any change of search, filters or family resets `page` to 1, clears
///   `products` and bumps `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingState {
    family: ProductFamily,
    categories: Option<Vec<String>>,
    page: u32,
    search: String,
    filters: FilterSet,
    products: Vec<Product>,
    has_more: bool,
    loading: bool,
    needs_fetch: bool,
    generation: u64,
    in_flight: Option<FetchTicket>,
}

impl ListingState {
    /// Fresh listing for `family`, wanting its first page.
    #[must_use]
    pub fn new(family: ProductFamily) -> Self {
        Self {
            family,
            categories: None,
            page: 1,
            search: String::new(),
            filters: FilterSet::new(),
            products: Vec::new(),
            has_more: true,
            loading: false,
            needs_fetch: family.has_catalog(),
            generation: 0,
            in_flight: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub const fn family(&self) -> ProductFamily {
        self.family
    }

    /// Category vocabulary; `None` until loaded.
    #[must_use]
    pub fn categories(&self) -> Option<&[String]> {
        self.categories.as_deref()
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }

    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    /// A fetch for the current query is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The current query has not been fetched yet.
    #[must_use]
    pub const fn needs_fetch(&self) -> bool {
        self.needs_fetch
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Nothing is loading or waiting to load.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.loading && !self.needs_fetch
    }

    /// The "No products found" condition: settled with an empty list.
    #[must_use]
    pub fn is_empty_result(&self) -> bool {
        self.is_settled() && self.products.is_empty()
    }

    // =========================================================================
    // Parameter changes
    // =========================================================================

    /// Set the free-text search term. Returns `true` if it changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        if self.search == term {
            return false;
        }
        term.clone_into(&mut self.search);
        self.reset_query();
        true
    }

    /// Toggle a sub-category filter. Always changes the query.
    ///
    /// The accumulated list is cleared immediately so rows from the old
    /// filter set are never shown alongside the new ones.
    pub fn toggle_filter(&mut self, category: &str) -> bool {
        self.filters.toggle(category);
        self.reset_query();
        true
    }

    /// Remove every filter. Returns `true` if any was selected.
    pub fn clear_filters(&mut self) -> bool {
        if !self.filters.clear() {
            return false;
        }
        self.reset_query();
        true
    }

    /// Switch product family, discarding categories, search and filters.
    /// Returns `true` if the family changed.
    pub fn set_family(&mut self, family: ProductFamily) -> bool {
        if self.family == family {
            return false;
        }
        let generation = self.generation;
        *self = Self::new(family);
        self.generation = generation + 1;
        true
    }

    /// Install the category vocabulary fetched for `family`.
    ///
    /// Ignored if the listing has since moved to another family.
    pub fn set_categories(&mut self, family: ProductFamily, categories: Vec<String>) -> bool {
        if self.family != family {
            return false;
        }
        self.categories = Some(categories);
        true
    }

    /// Advance to the next page (the scroll sentinel became visible).
    ///
    /// Only advances when the last page was full, nothing is loading or
    /// pending, and there is a rendered last item to have been seen.
    pub fn advance(&mut self) -> bool {
        if !self.has_more || !self.is_settled() || self.products.is_empty() {
            return false;
        }
        self.page += 1;
        self.needs_fetch = true;
        true
    }

    /// Drop a product after it was deleted remotely.
    pub fn remove_product(&mut self, id: &ProductId) -> bool {
        let before = self.products.len();
        self.products.retain(|p| &p.id != id);
        self.products.len() != before
    }

    fn reset_query(&mut self) {
        self.page = 1;
        self.products.clear();
        self.has_more = true;
        self.loading = false;
        self.in_flight = None;
        self.needs_fetch = self.family.has_catalog();
        self.generation += 1;
    }

    // =========================================================================
    // Fetch lifecycle
    // =========================================================================

    /// Start fetching the current page.
    ///
    /// Returns `None` when there is nothing to fetch (already fetched, or
    /// the family has no catalog).
    pub fn begin_fetch(&mut self) -> Option<(FetchTicket, ProductsQuery)> {
        if !self.needs_fetch || !self.family.has_catalog() {
            return None;
        }
        let ticket = FetchTicket {
            generation: self.generation,
            page: self.page,
        };
        self.needs_fetch = false;
        self.loading = true;
        self.in_flight = Some(ticket);
        Some((ticket, ProductsQuery::new(self.page, &self.search, &self.filters)))
    }

    /// Merge a fetched page.
    ///
    /// Page 1 replaces the list, later pages append. `has_more` is set iff
    /// the page was full.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, page: Vec<Product>) -> FetchOutcome {
        if self.in_flight != Some(ticket) {
            return FetchOutcome::Stale;
        }
        self.has_more = page.len() == PAGE_SIZE;
        if ticket.page == 1 {
            self.products = page;
        } else {
            self.products.extend(page);
        }
        self.loading = false;
        self.in_flight = None;
        FetchOutcome::Applied
    }

    /// Record a failed fetch. The list is left as it was.
    ///
    /// A failed later page rolls the cursor back so the next sentinel
    /// reveal asks for the same page again; the list always holds pages
    /// `1..=page`.
    pub fn fail_fetch(&mut self, ticket: FetchTicket) -> FetchOutcome {
        if self.in_flight != Some(ticket) {
            return FetchOutcome::Stale;
        }
        if ticket.page > 1 {
            self.page = ticket.page - 1;
        }
        self.loading = false;
        self.in_flight = None;
        FetchOutcome::Applied
    }
}
