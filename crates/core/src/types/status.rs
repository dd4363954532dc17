//! Role and navigation enums.

use serde::{Deserialize, Serialize};

/// Role assigned to an account by the remote API.
///
/// Unknown role strings deserialize as [`UserRole::Customer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    #[default]
    #[serde(other)]
    Customer,
}

impl UserRole {
    /// Capitalised label shown under the avatar.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Admin => "Admin",
        }
    }

    /// Whether the role may use the admin console.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Sub-views of the account page, numbered as in the `?to=` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProfileSection {
    #[default]
    Dashboard,
    Orders,
    Cart,
    MoodBoard,
    Addresses,
}

impl ProfileSection {
    /// Menu order.
    pub const ALL: [Self; 5] = [
        Self::Dashboard,
        Self::Orders,
        Self::Cart,
        Self::MoodBoard,
        Self::Addresses,
    ];

    /// Numeric menu id.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Orders => 2,
            Self::Cart => 3,
            Self::MoodBoard => 4,
            Self::Addresses => 5,
        }
    }

    /// Section for a menu id; unknown ids fall back to the dashboard.
    #[must_use]
    pub fn from_id(id: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|section| section.id() == id)
            .unwrap_or_default()
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Orders => "My Orders",
            Self::Cart => "My Cart",
            Self::MoodBoard => "Mood Board",
            Self::Addresses => "Addresses",
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_role_is_customer() {
        let role: UserRole = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(role, UserRole::Customer);
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert!(role.is_admin());
    }

    #[test]
    fn test_section_ids() {
        assert_eq!(ProfileSection::from_id(3), ProfileSection::Cart);
        assert_eq!(ProfileSection::from_id(0), ProfileSection::Dashboard);
        assert_eq!(ProfileSection::from_id(42), ProfileSection::Dashboard);
    }
}
