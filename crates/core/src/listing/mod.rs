//! Paginated, filterable product listing.
//!
//! [`ListingState`] is the pure state machine behind the admin product grid:
//! search term, selected sub-category filters, page cursor and the
//! accumulated result list. It performs no I/O and knows nothing about
//! timers; the caller decides *when* to fetch (see the admin crate's
//! listing controller, which debounces) and feeds results back in.
//!
//! Every fetch is issued against a [`FetchTicket`] carrying the query
//! generation and page it was issued for. Completions whose ticket no longer
//! matches are discarded, so a slow response for an old search can never be
//! merged into the list for a newer one.

mod filters;
mod query;
mod state;

pub use filters::FilterSet;
pub use query::ProductsQuery;
pub use state::{FetchOutcome, FetchTicket, ListingState};

/// Number of products requested per page.
///
/// A page shorter than this marks the end of the listing.
pub const PAGE_SIZE: usize = 10;
