//! Session-related types for admin authentication.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zendor_backend::{BearerToken, SessionHandoff};
use zendor_core::{Email, UserRole};

/// Session-stored admin identity.
///
/// Everything the remote login flow handed over, plus a key identifying
/// this sign-in's listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Key of this sign-in's product listings; fresh for every handoff.
    pub session_key: Uuid,
    /// Bearer token for the remote API.
    pub token: BearerToken,
    /// Admin's email address.
    pub email: Option<Email>,
    /// Admin's display name.
    pub name: String,
    /// Role reported by the remote API.
    pub role: UserRole,
}

impl CurrentAdmin {
    /// Build the session identity from a handoff.
    #[must_use]
    pub fn from_handoff(handoff: SessionHandoff) -> Self {
        let name = handoff
            .display_name()
            .map(str::to_owned)
            .or_else(|| handoff.email.as_ref().map(|e| e.as_str().to_owned()))
            .unwrap_or_else(|| "Admin".to_owned());

        Self {
            session_key: Uuid::new_v4(),
            token: handoff.token,
            email: handoff.email,
            name,
            role: handoff.role,
        }
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_handoff_falls_back_to_email() {
        let handoff: SessionHandoff =
            serde_json::from_str(r#"{"token":"abc","email":"ops@zendor.in","role":"admin"}"#)
                .unwrap();
        let admin = CurrentAdmin::from_handoff(handoff);
        assert_eq!(admin.name, "ops@zendor.in");
        assert!(admin.role.is_admin());
    }

    #[test]
    fn test_each_handoff_gets_a_new_key() {
        let handoff: SessionHandoff = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        let first = CurrentAdmin::from_handoff(handoff.clone());
        let second = CurrentAdmin::from_handoff(handoff);
        assert_ne!(first.session_key, second.session_key);
        assert_eq!(first.name, "Admin");
    }

    #[test]
    fn test_round_trips_through_session_json() {
        let handoff: SessionHandoff = serde_json::from_str(r#"{"token":"abc"}"#).unwrap();
        let admin = CurrentAdmin::from_handoff(handoff);
        let json = serde_json::to_value(&admin).unwrap();
        let back: CurrentAdmin = serde_json::from_value(json).unwrap();
        assert_eq!(back.token, admin.token);
        assert_eq!(back.session_key, admin.session_key);
    }
}
