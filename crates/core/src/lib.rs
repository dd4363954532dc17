//! Zendor Core - Shared types library.
//!
//! This crate provides common types used across all Zendor components:
//! - `backend` - Client for the remote Zendor REST API
//! - `storefront` - Public-facing site (profile, visit-store)
//! - `admin` - Product administration console
//!
//! # Architecture
//!
//! The core crate contains only types and pure state machines - no I/O, no
//! HTTP clients, no timers. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, phones, product families
//! - [`listing`] - Paginated, filterable product listing state

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod listing;
pub mod types;

pub use types::*;
