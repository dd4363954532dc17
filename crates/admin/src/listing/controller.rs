//! The listing task and its handle.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::Instrument;
use zendor_backend::BackendError;
use zendor_core::listing::{FetchOutcome, FetchTicket, ListingState};
use zendor_core::{Product, ProductFamily, ProductId};

use super::{DEBOUNCE, ProductSource};

/// Depth of the request inbox; senders wait when it is full.
const INBOX_CAPACITY: usize = 32;

/// The listing task has stopped (its registry entry was evicted).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("listing task has stopped")]
pub struct ListingClosed;

/// Immutable view of a listing, published after every change.
#[derive(Debug, Clone)]
pub struct ListingSnapshot {
    pub state: ListingState,
    /// The category vocabulary is being fetched.
    pub categories_loading: bool,
    /// A parameter changed and the debounce has not fired yet.
    pub debounce_pending: bool,
}

impl ListingSnapshot {
    /// No debounce pending, no fetch in flight, vocabulary loaded.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        !self.debounce_pending && !self.categories_loading && self.state.is_settled()
    }
}

enum Command {
    SetSearch(String),
    ToggleFilter(String),
    ClearFilters,
    SetFamily(ProductFamily),
    Advance,
    Remove(ProductId),
}

struct Request {
    command: Command,
    /// Answered with whether the command changed anything, after the
    /// resulting snapshot has been published.
    applied: oneshot::Sender<bool>,
}

enum Completion {
    Products {
        ticket: FetchTicket,
        result: Result<Vec<Product>, BackendError>,
    },
    Categories {
        family: ProductFamily,
        result: Result<Vec<String>, BackendError>,
    },
}

/// Cloneable handle to a listing task.
#[derive(Clone)]
pub struct ListingHandle {
    requests: mpsc::Sender<Request>,
    snapshots: watch::Receiver<ListingSnapshot>,
}

impl ListingHandle {
    /// Start a listing task for `family`.
    ///
    /// The category vocabulary is requested immediately; the first page
    /// after the debounce period. Must be called within a tokio runtime.
    #[must_use]
    pub fn spawn<S: ProductSource>(family: ProductFamily, source: S) -> Self {
        let (requests_tx, requests_rx) = mpsc::channel(INBOX_CAPACITY);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let state = ListingState::new(family);
        let (snapshots_tx, snapshots_rx) = watch::channel(ListingSnapshot {
            state: state.clone(),
            categories_loading: false,
            debounce_pending: false,
        });

        let mut task = ListingTask {
            source,
            state,
            requests: requests_rx,
            completions_tx,
            completions: completions_rx,
            snapshots: snapshots_tx,
            deadline: None,
            categories_loading: false,
        };
        task.load_categories();
        task.schedule();
        task.publish();

        let span = tracing::debug_span!("listing", %family);
        tokio::spawn(task.run().instrument(span));

        Self {
            requests: requests_tx,
            snapshots: snapshots_rx,
        }
    }

    async fn send(&self, command: Command) -> Result<bool, ListingClosed> {
        let (applied, done) = oneshot::channel();
        self.requests
            .send(Request { command, applied })
            .await
            .map_err(|_| ListingClosed)?;
        done.await.map_err(|_| ListingClosed)
    }

    /// Set the search term. Returns whether it changed.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task has stopped.
    pub async fn set_search(&self, term: impl Into<String>) -> Result<bool, ListingClosed> {
        self.send(Command::SetSearch(term.into())).await
    }

    /// Toggle a sub-category filter.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task has stopped.
    pub async fn toggle_filter(&self, category: impl Into<String>) -> Result<bool, ListingClosed> {
        self.send(Command::ToggleFilter(category.into())).await
    }

    /// Remove every filter. Returns whether any was selected.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task has stopped.
    pub async fn clear_filters(&self) -> Result<bool, ListingClosed> {
        self.send(Command::ClearFilters).await
    }

    /// Switch product family, resetting categories, search and filters.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task has stopped.
    pub async fn set_family(&self, family: ProductFamily) -> Result<bool, ListingClosed> {
        self.send(Command::SetFamily(family)).await
    }

    /// The scroll sentinel was revealed. Returns whether the page advanced.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task has stopped.
    pub async fn advance(&self) -> Result<bool, ListingClosed> {
        self.send(Command::Advance).await
    }

    /// Drop a product that was deleted remotely.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task has stopped.
    pub async fn remove(&self, id: ProductId) -> Result<bool, ListingClosed> {
        self.send(Command::Remove(id)).await
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ListingSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until nothing is pending, then return that snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the task stops first.
    pub async fn settled(&self) -> Result<ListingSnapshot, ListingClosed> {
        let mut snapshots = self.snapshots.clone();
        let snapshot = snapshots
            .wait_for(ListingSnapshot::is_settled)
            .await
            .map_err(|_| ListingClosed)?;
        Ok(snapshot.clone())
    }
}

struct ListingTask<S> {
    source: S,
    state: ListingState,
    requests: mpsc::Receiver<Request>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
    snapshots: watch::Sender<ListingSnapshot>,
    deadline: Option<Instant>,
    categories_loading: bool,
}

impl<S: ProductSource> ListingTask<S> {
    async fn run(mut self) {
        tracing::debug!("Listing started");

        loop {
            let ack = tokio::select! {
                request = self.requests.recv() => {
                    let Some(Request { command, applied }) = request else {
                        break;
                    };
                    Some((applied, self.apply(command)))
                }
                Some(completion) = self.completions.recv() => {
                    self.complete(completion);
                    None
                }
                () = debounce(self.deadline) => {
                    self.deadline = None;
                    self.fetch_page();
                    None
                }
            };

            self.publish();

            if let Some((applied, changed)) = ack {
                let _ = applied.send(changed);
            }
        }

        tracing::debug!("Listing stopped");
    }

    fn apply(&mut self, command: Command) -> bool {
        let changed = match command {
            Command::SetSearch(term) => self.state.set_search(&term),
            Command::ToggleFilter(category) => self.state.toggle_filter(&category),
            Command::ClearFilters => self.state.clear_filters(),
            Command::SetFamily(family) => {
                let changed = self.state.set_family(family);
                if changed {
                    self.load_categories();
                }
                changed
            }
            Command::Advance => self.state.advance(),
            Command::Remove(id) => return self.state.remove_product(&id),
        };

        if changed {
            self.schedule();
        }
        changed
    }

    /// (Re)arm the debounce if the current query still needs fetching.
    fn schedule(&mut self) {
        self.deadline = self
            .state
            .needs_fetch()
            .then(|| Instant::now() + DEBOUNCE);
    }

    fn fetch_page(&mut self) {
        let Some((ticket, query)) = self.state.begin_fetch() else {
            return;
        };
        let family = self.state.family();
        tracing::debug!(
            page = ticket.page,
            generation = ticket.generation,
            search = %query.search,
            "Fetching products"
        );

        let source = self.source.clone();
        let completions = self.completions_tx.clone();
        tokio::spawn(
            async move {
                let result = source.products(family, &query).await;
                let _ = completions.send(Completion::Products { ticket, result });
            }
            .in_current_span(),
        );
    }

    fn load_categories(&mut self) {
        let family = self.state.family();
        if !family.has_catalog() {
            self.categories_loading = false;
            return;
        }
        self.categories_loading = true;

        let source = self.source.clone();
        let completions = self.completions_tx.clone();
        tokio::spawn(
            async move {
                let result = source.categories(family).await;
                let _ = completions.send(Completion::Categories { family, result });
            }
            .in_current_span(),
        );
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Products { ticket, result } => {
                let outcome = match result {
                    Ok(page) => {
                        let count = page.len();
                        let outcome = self.state.complete_fetch(ticket, page);
                        if outcome == FetchOutcome::Applied {
                            tracing::debug!(
                                page = ticket.page,
                                count,
                                has_more = self.state.has_more(),
                                "Products page applied"
                            );
                        }
                        outcome
                    }
                    Err(error) => {
                        let outcome = self.state.fail_fetch(ticket);
                        if outcome == FetchOutcome::Applied {
                            tracing::error!(
                                %error,
                                page = ticket.page,
                                "Failed to fetch products"
                            );
                        }
                        outcome
                    }
                };

                if outcome == FetchOutcome::Stale {
                    tracing::debug!(
                        page = ticket.page,
                        generation = ticket.generation,
                        current_generation = self.state.generation(),
                        "Discarding stale products page"
                    );
                }
            }
            Completion::Categories { family, result } => {
                if family == self.state.family() {
                    self.categories_loading = false;
                }
                let categories = result.unwrap_or_else(|error| {
                    tracing::error!(%error, %family, "Failed to fetch categories");
                    Vec::new()
                });
                self.state.set_categories(family, categories);
            }
        }
    }

    fn publish(&self) {
        let snapshot = ListingSnapshot {
            state: self.state.clone(),
            categories_loading: self.categories_loading,
            debounce_pending: self.deadline.is_some(),
        };
        self.snapshots.send_replace(snapshot);
    }
}

/// Resolves at `deadline`, or never when there is none.
async fn debounce(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use zendor_core::listing::{PAGE_SIZE, ProductsQuery};

    use super::*;

    /// In-memory catalog that filters and paginates like the remote API.
    #[derive(Clone, Default)]
    struct FakeSource {
        inner: Arc<Mutex<FakeInner>>,
    }

    #[derive(Default)]
    struct FakeInner {
        catalog: Vec<Product>,
        queries: Vec<String>,
        category_calls: usize,
        slow_search: Option<(String, Duration)>,
        category_delay: Duration,
        fail: bool,
    }

    impl FakeSource {
        fn with_catalog(catalog: Vec<Product>) -> Self {
            let source = Self::default();
            source.inner.lock().unwrap().catalog = catalog;
            source
        }

        fn queries(&self) -> Vec<String> {
            self.inner.lock().unwrap().queries.clone()
        }

        fn category_calls(&self) -> usize {
            self.inner.lock().unwrap().category_calls
        }

        fn delay_search(&self, term: &str, delay: Duration) {
            self.inner.lock().unwrap().slow_search = Some((term.to_string(), delay));
        }

        fn fail(&self) {
            self.inner.lock().unwrap().fail = true;
        }

        fn delay_categories(&self, delay: Duration) {
            self.inner.lock().unwrap().category_delay = delay;
        }
    }

    impl ProductSource for FakeSource {
        async fn categories(&self, family: ProductFamily) -> Result<Vec<String>, BackendError> {
            let delay = {
                let mut inner = self.inner.lock().unwrap();
                inner.category_calls += 1;
                inner.category_delay
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            Ok(match family {
                ProductFamily::Wallpapers => vec!["Matte".to_string(), "Glossy".to_string()],
                _ => vec!["Oak".to_string()],
            })
        }

        async fn products(
            &self,
            _family: ProductFamily,
            query: &ProductsQuery,
        ) -> Result<Vec<Product>, BackendError> {
            let (delay, result) = {
                let mut inner = self.inner.lock().unwrap();
                inner.queries.push(query.query_string());

                let delay = inner
                    .slow_search
                    .as_ref()
                    .filter(|(term, _)| *term == query.search)
                    .map_or(Duration::from_millis(10), |(_, delay)| *delay);

                let result = if inner.fail {
                    Err(BackendError::Api {
                        status: 500,
                        message: "boom".to_string(),
                    })
                } else {
                    let skip = (query.page as usize - 1) * query.limit;
                    Ok(inner
                        .catalog
                        .iter()
                        .filter(|p| p.name.contains(&query.search))
                        .filter(|p| {
                            query.sub_categories.is_empty()
                                || p.sub_category
                                    .as_ref()
                                    .is_some_and(|c| query.sub_categories.contains(c))
                        })
                        .skip(skip)
                        .take(query.limit)
                        .cloned()
                        .collect())
                };
                (delay, result)
            };
            tokio::time::sleep(delay).await;
            result
        }
    }

    fn catalog(n: usize) -> Vec<Product> {
        (0..n)
            .map(|i| {
                let (name, category) = match i % 3 {
                    0 => (format!("blue wall {i}"), "Matte"),
                    1 => (format!("blue {i}"), "Glossy"),
                    _ => (format!("red {i}"), "Textured"),
                };
                let mut product = Product::new(format!("p{i}"), name);
                product.sub_category = Some(category.to_string());
                product
            })
            .collect()
    }

    fn names(snapshot: &ListingSnapshot) -> Vec<String> {
        snapshot
            .state
            .products()
            .iter()
            .map(|p| p.name.clone())
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_load_fetches_first_page() {
        let source = FakeSource::with_catalog(catalog(4));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());

        let snapshot = listing.settled().await.unwrap();

        assert_eq!(source.queries(), vec!["page=1&limit=10&search="]);
        assert_eq!(source.category_calls(), 1);
        assert_eq!(snapshot.state.products().len(), 4);
        assert!(!snapshot.state.has_more());
        assert_eq!(
            snapshot.state.categories(),
            Some(&["Matte".to_string(), "Glossy".to_string()][..])
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_within_debounce_issues_one_request() {
        let source = FakeSource::with_catalog(catalog(9));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        listing.settled().await.unwrap();

        listing.set_search("blue").await.unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        listing.set_search("blue wall").await.unwrap();
        let snapshot = listing.settled().await.unwrap();

        assert_eq!(
            source.queries(),
            vec![
                "page=1&limit=10&search=",
                "page=1&limit=10&search=blue%20wall",
            ]
        );
        assert!(names(&snapshot).iter().all(|n| n.contains("blue wall")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_for_old_term_is_discarded() {
        let source = FakeSource::with_catalog(catalog(9));
        source.delay_search("blue", Duration::from_secs(2));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        listing.settled().await.unwrap();

        listing.set_search("blue").await.unwrap();
        // Let the debounce fire so the slow request is in flight.
        tokio::time::sleep(DEBOUNCE + Duration::from_millis(50)).await;
        assert!(listing.snapshot().state.is_loading());

        listing.set_search("blue wall").await.unwrap();
        let snapshot = listing.settled().await.unwrap();
        let expected = names(&snapshot);
        assert!(expected.iter().all(|n| n.contains("blue wall")));

        // The slow "blue" page lands afterwards and must not be merged.
        tokio::time::sleep(Duration::from_secs(3)).await;
        let after = listing.snapshot();
        assert_eq!(names(&after), expected);
        assert_eq!(after.state.search(), "blue wall");
        assert_eq!(source.queries().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_filter_toggles_issue_one_request_and_clear_list() {
        let source = FakeSource::with_catalog(catalog(9));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        let initial = listing.settled().await.unwrap();
        assert_eq!(initial.state.products().len(), 9);

        listing.toggle_filter("Matte").await.unwrap();
        assert!(listing.snapshot().state.products().is_empty());
        listing.toggle_filter("Glossy").await.unwrap();
        assert!(listing.snapshot().state.products().is_empty());

        let snapshot = listing.settled().await.unwrap();
        assert_eq!(
            source.queries().last().map(String::as_str),
            Some("page=1&limit=10&subCategories=Matte,Glossy&search=")
        );
        assert_eq!(source.queries().len(), 2);
        assert_eq!(snapshot.state.products().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_twice_restores_unfiltered_list() {
        let source = FakeSource::with_catalog(catalog(9));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source);
        let before = names(&listing.settled().await.unwrap());

        listing.toggle_filter("Matte").await.unwrap();
        listing.settled().await.unwrap();
        listing.toggle_filter("Matte").await.unwrap();
        let after = names(&listing.settled().await.unwrap());

        assert_eq!(before, after);
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_appends_until_short_page() {
        let source = FakeSource::with_catalog(catalog(PAGE_SIZE + 5));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());

        let first = listing.settled().await.unwrap();
        assert_eq!(first.state.products().len(), PAGE_SIZE);
        assert!(first.state.has_more());

        assert!(listing.advance().await.unwrap());
        let second = listing.settled().await.unwrap();
        assert_eq!(second.state.products().len(), PAGE_SIZE + 5);
        assert!(!second.state.has_more());
        assert_eq!(second.state.page(), 2);

        assert!(!listing.advance().await.unwrap());
        assert_eq!(source.queries().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exact_multiple_of_page_size_fetches_one_empty_page() {
        let source = FakeSource::with_catalog(catalog(PAGE_SIZE * 2));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        listing.settled().await.unwrap();

        listing.advance().await.unwrap();
        assert!(listing.settled().await.unwrap().state.has_more());
        listing.advance().await.unwrap();
        let last = listing.settled().await.unwrap();

        assert!(!last.state.has_more());
        assert_eq!(last.state.products().len(), PAGE_SIZE * 2);
        assert_eq!(
            source.queries().last().map(String::as_str),
            Some("page=3&limit=10&search=")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_advance_is_noop_while_loading() {
        let source = FakeSource::with_catalog(catalog(PAGE_SIZE * 2));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source);
        assert!(!listing.advance().await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_family_resets_query_and_categories() {
        let source = FakeSource::with_catalog(catalog(6));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        listing.settled().await.unwrap();
        listing.set_search("red").await.unwrap();
        listing.toggle_filter("Textured").await.unwrap();
        listing.settled().await.unwrap();

        // Keep the new vocabulary in flight while the reset is observed.
        source.delay_categories(Duration::from_secs(1));
        assert!(listing.set_family(ProductFamily::WoodenFloorings).await.unwrap());
        let snapshot = listing.snapshot();
        assert_eq!(snapshot.state.search(), "");
        assert!(snapshot.state.filters().is_empty());
        assert!(snapshot.categories_loading);
        assert!(snapshot.state.categories().is_none());

        let snapshot = listing.settled().await.unwrap();
        assert_eq!(snapshot.state.family(), ProductFamily::WoodenFloorings);
        assert_eq!(snapshot.state.products().len(), 6);
        assert_eq!(snapshot.state.categories(), Some(&["Oak".to_string()][..]));
        assert_eq!(source.category_calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_family_without_catalog_never_fetches() {
        let source = FakeSource::with_catalog(catalog(3));
        let listing = ListingHandle::spawn(ProductFamily::Acoustics, source.clone());

        let snapshot = listing.settled().await.unwrap();
        assert!(snapshot.state.is_empty_result());
        assert!(snapshot.state.categories().is_none());
        assert!(source.queries().is_empty());
        assert_eq!(source.category_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_fetch_is_not_retried() {
        let source = FakeSource::with_catalog(catalog(3));
        source.fail();
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());

        let snapshot = listing.settled().await.unwrap();
        assert!(snapshot.state.is_empty_result());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(source.queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_drops_product_without_refetch() {
        let source = FakeSource::with_catalog(catalog(3));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        listing.settled().await.unwrap();

        assert!(listing.remove(ProductId::new("p1")).await.unwrap());
        assert!(!listing.remove(ProductId::new("missing")).await.unwrap());

        let snapshot = listing.settled().await.unwrap();
        assert_eq!(snapshot.state.products().len(), 2);
        assert_eq!(source.queries().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_search_does_not_refetch() {
        let source = FakeSource::with_catalog(catalog(3));
        let listing = ListingHandle::spawn(ProductFamily::Wallpapers, source.clone());
        listing.settled().await.unwrap();

        assert!(!listing.set_search("").await.unwrap());
        assert!(listing.snapshot().is_settled());
        assert_eq!(source.queries().len(), 1);
    }
}
