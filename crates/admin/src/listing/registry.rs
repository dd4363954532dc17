//! Listing tasks per admin session.

use std::time::Duration;

use moka::future::Cache;
use uuid::Uuid;
use zendor_core::ProductFamily;

use super::{ListingClosed, ListingHandle, ProductSource};

/// Live listing tasks, one per session, evicted after a period of
/// inactivity.
///
/// A session browses one family at a time: opening another family switches
/// the session's listing, which discards its categories, search and
/// filters.
#[derive(Clone)]
pub struct ListingRegistry {
    listings: Cache<Uuid, ListingHandle>,
}

impl ListingRegistry {
    /// Registry whose entries are dropped after `idle` without access.
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        let listings = Cache::builder()
            .max_capacity(10_000)
            .time_to_idle(idle)
            .build();
        Self { listings }
    }

    /// The session's listing, showing `family`.
    ///
    /// Spawns one from `make_source` if the session has none; otherwise
    /// switches the existing listing to `family` (a no-op when it already
    /// shows it).
    ///
    /// # Errors
    ///
    /// Returns [`ListingClosed`] if the existing task has stopped.
    pub async fn get_or_spawn<S, F>(
        &self,
        session: Uuid,
        family: ProductFamily,
        make_source: F,
    ) -> Result<ListingHandle, ListingClosed>
    where
        S: ProductSource,
        F: FnOnce() -> S,
    {
        let handle = self
            .listings
            .get_with(session, async move {
                tracing::debug!(%session, %family, "Spawning listing");
                ListingHandle::spawn(family, make_source())
            })
            .await;

        if handle.set_family(family).await? {
            tracing::debug!(%session, %family, "Listing switched family");
        }
        Ok(handle)
    }

    /// Drop the session's listing (sign-out).
    pub async fn close_session(&self, session: Uuid) {
        self.listings.invalidate(&session).await;
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, session: Uuid) -> bool {
        self.listings.contains_key(&session)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use zendor_backend::BackendError;
    use zendor_core::Product;
    use zendor_core::listing::ProductsQuery;

    use super::*;

    #[derive(Clone, Default)]
    struct EmptySource;

    impl ProductSource for EmptySource {
        async fn categories(&self, _family: ProductFamily) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }

        async fn products(
            &self,
            _family: ProductFamily,
            _query: &ProductsQuery,
        ) -> Result<Vec<Product>, BackendError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_reuses_one_listing() {
        let registry = ListingRegistry::new(Duration::from_secs(60));
        let session = Uuid::new_v4();
        let spawned = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let spawned = Arc::clone(&spawned);
            registry
                .get_or_spawn(session, ProductFamily::Wallpapers, move || {
                    spawned.fetch_add(1, Ordering::SeqCst);
                    EmptySource
                })
                .await
                .unwrap();
        }
        let handle = registry
            .get_or_spawn(session, ProductFamily::Acoustics, || EmptySource)
            .await
            .unwrap();

        assert_eq!(spawned.load(Ordering::SeqCst), 1);
        assert_eq!(handle.snapshot().state.family(), ProductFamily::Acoustics);
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_family_starts_fresh() {
        let registry = ListingRegistry::new(Duration::from_secs(60));
        let session = Uuid::new_v4();

        let handle = registry
            .get_or_spawn(session, ProductFamily::Wallpapers, || EmptySource)
            .await
            .unwrap();
        handle.set_search("oak").await.unwrap();
        handle.toggle_filter("Matte").await.unwrap();
        handle.settled().await.unwrap();

        registry
            .get_or_spawn(session, ProductFamily::WoodenFloorings, || EmptySource)
            .await
            .unwrap();
        let handle = registry
            .get_or_spawn(session, ProductFamily::Wallpapers, || EmptySource)
            .await
            .unwrap();

        let snapshot = handle.settled().await.unwrap();
        assert_eq!(snapshot.state.family(), ProductFamily::Wallpapers);
        assert_eq!(snapshot.state.search(), "");
        assert!(snapshot.state.filters().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_session_drops_listing() {
        let registry = ListingRegistry::new(Duration::from_secs(60));
        let session = Uuid::new_v4();
        let other = Uuid::new_v4();

        registry
            .get_or_spawn(session, ProductFamily::Wallpapers, || EmptySource)
            .await
            .unwrap();
        registry
            .get_or_spawn(other, ProductFamily::Wallpapers, || EmptySource)
            .await
            .unwrap();

        registry.close_session(session).await;

        assert!(!registry.contains(session));
        assert!(registry.contains(other));
    }
}
