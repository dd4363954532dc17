//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};
use zendor_backend::{BearerToken, SessionHandoff};
use zendor_core::{Email, GUEST_USER_NAME, UserRole};

/// Session-stored customer identity.
///
/// The four values the remote login flow hands over: token, email, name
/// and role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentCustomer {
    /// Bearer token for the remote API.
    pub token: BearerToken,
    /// Customer's email address.
    pub email: Option<Email>,
    /// Customer's display name.
    pub name: String,
    /// Role reported by the remote API.
    pub role: UserRole,
}

impl From<SessionHandoff> for CurrentCustomer {
    fn from(handoff: SessionHandoff) -> Self {
        let name = handoff
            .display_name()
            .unwrap_or(GUEST_USER_NAME)
            .to_owned();

        Self {
            token: handoff.token,
            email: handoff.email,
            name,
            role: handoff.role,
        }
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in customer.
    pub const CURRENT_CUSTOMER: &str = "current_customer";
}
