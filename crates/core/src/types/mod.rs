//! Core types for Zendor.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod family;
pub mod id;
pub mod phone;
pub mod price;
pub mod product;
pub mod profile;
pub mod status;

pub use email::{Email, EmailError};
pub use family::{FamilyError, ProductFamily};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use price::{CurrencyCode, Price};
pub use product::Product;
pub use profile::{Address, CartItem, GUEST_USER_NAME, MoodBoardItem, OrderSummary, UserProfile};
pub use status::*;
