//! Account profile mirrored from the remote API.
//!
//! Nested collections are deserialized leniently: every field is optional
//! and unknown fields are ignored, since the remote API owns their shape.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Email, OrderId, PhoneNumber, ProductId, UserId, UserRole};

/// Display name used when the API returns none.
pub const GUEST_USER_NAME: &str = "Guest User";

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Option<UserId>,
    pub user_name: String,
    pub email: Option<Email>,
    pub phone: Option<PhoneNumber>,
    /// Avatar URL.
    pub profile_picture: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub role: UserRole,
    pub orders: Vec<OrderSummary>,
    pub mood_board: Vec<MoodBoardItem>,
    pub cart: Vec<CartItem>,
    pub billing_address: Option<Address>,
    pub shipping_address: Option<Address>,
}

impl UserProfile {
    /// The profile shown when the fetch fails.
    #[must_use]
    pub fn guest() -> Self {
        Self {
            id: None,
            user_name: GUEST_USER_NAME.to_owned(),
            email: None,
            phone: None,
            profile_picture: None,
            created_at: None,
            role: UserRole::Customer,
            orders: Vec::new(),
            mood_board: Vec::new(),
            cart: Vec::new(),
            billing_address: None,
            shipping_address: None,
        }
    }

    /// Year the account was created ("Member since ...").
    #[must_use]
    pub fn member_since(&self) -> Option<i32> {
        self.created_at.map(|at| at.year())
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn cart_units(&self) -> u32 {
        self.cart.iter().map(|item| item.quantity.max(1)).sum()
    }
}

/// One order in the order history.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrderSummary {
    #[serde(alias = "_id")]
    pub id: Option<OrderId>,
    pub status: Option<String>,
    pub total_amount: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
}

/// One line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CartItem {
    #[serde(alias = "product")]
    pub product_id: Option<ProductId>,
    pub name: Option<String>,
    pub quantity: u32,
    pub price: Option<Decimal>,
}

/// A product pinned to the user's mood board.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoodBoardItem {
    #[serde(alias = "_id")]
    pub product_id: Option<ProductId>,
    pub name: Option<String>,
    pub image: Option<String>,
}

/// A billing or shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(alias = "zipCode", alias = "pinCode")]
    pub pincode: Option<String>,
    pub country: Option<String>,
}

impl Address {
    /// True when no field is set (the API sends `{}` for missing addresses).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.pincode,
            &self.country,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(str::is_empty))
    }

    /// Comma-separated single line for display.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            &self.street,
            &self.city,
            &self.state,
            &self.pincode,
            &self.country,
        ]
        .iter()
        .filter_map(|field| field.as_deref())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}
