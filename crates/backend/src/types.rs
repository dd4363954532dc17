//! Wire types of the remote API.
//!
//! These mirror the JSON the API actually returns, which is loose: ids
//! arrive as `_id` or `id`, collections may be `null` or contain bare id
//! strings instead of objects, and optional strings sometimes hold the
//! literal `"None"`. Everything is optional here; the conversions module
//! turns records into the normalised `zendor_core` types.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response envelope used by every endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    /// `"success"` on success; absent on some endpoints.
    #[serde(default)]
    pub status: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    /// True unless the envelope explicitly reports a non-success status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == "success")
    }
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default, alias = "error")]
    pub message: Option<String>,
}

/// One entry of `getCategories`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRecord {
    pub name: Option<String>,
}

/// A product as returned by the products and product endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub sample_cost: Option<Decimal>,
    pub images: Option<Vec<String>>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub brand: Option<String>,
    pub finish: Option<String>,
    pub surface: Option<String>,
    pub sub_category: Option<String>,
    pub stock: Option<i64>,
    pub tags: Option<Vec<String>>,
}

/// The user document returned by `getUserProfile`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(rename = "_id")]
    pub mongo_id: Option<String>,
    pub user_name: Option<String>,
    pub email: Option<String>,
    /// String or number; `"None"` when unset.
    pub phone: Option<serde_json::Value>,
    /// URL; `"None"` when unset.
    pub profile_picture: Option<String>,
    pub created_at: Option<String>,
    pub role: Option<String>,
    /// Objects or bare order ids.
    pub orders: Option<Vec<serde_json::Value>>,
    #[serde(rename = "MoodBoard", alias = "moodBoard")]
    pub mood_board: Option<Vec<serde_json::Value>>,
    pub cart: Option<Vec<serde_json::Value>>,
    pub billing_address: Option<serde_json::Value>,
    pub shipping_address: Option<serde_json::Value>,
}
