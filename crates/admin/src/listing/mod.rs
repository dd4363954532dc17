//! Debounced product listing controller.
//!
//! Each signed-in admin gets one listing task, showing one product family
//! at a time. The task
//! owns a [`ListingState`](zendor_core::listing::ListingState) and is the
//! only thing that mutates it; handlers talk to it through a cloneable
//! [`ListingHandle`].
//!
//! ```text
//!  handler ──Request──▶ ┌──────────────┐ ──spawn──▶ fetch task
//!                       │ listing task │                │
//!  handler ◀─snapshot── └──────────────┘ ◀─Completion───┘
//!            (watch)       ▲ debounce: sleep_until raced in select!
//! ```
//!
//! Parameter changes (re)arm a 300 ms debounce; when it fires, one fetch is
//! issued for the current page. Completions carry the
//! [`FetchTicket`](zendor_core::listing::FetchTicket) they were issued
//! with and are dropped if the query has moved on since.
//!
//! Handles live in a [`ListingRegistry`] keyed by session and are evicted
//! after a period of inactivity. Opening another family switches the
//! session's listing, resetting its categories, search and filters. Dropping the last handle closes the
//! inbox and ends the task.

mod controller;
mod registry;
mod source;

use std::time::Duration;

pub use controller::{ListingClosed, ListingHandle, ListingSnapshot};
pub use registry::ListingRegistry;
pub use source::{CatalogSource, ProductSource};

/// Quiet period after the last parameter change before a fetch is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(300);
