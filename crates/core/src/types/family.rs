//! Product families (catalog domains).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a path segment names no known product family.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown product family: {0}")]
pub struct FamilyError(pub String);

/// A catalog domain sold by the store.
///
/// Only wallpapers and wooden floorings are backed by a listable,
/// filterable catalog on the remote API. Acoustic panels are sold through
/// consultation and have no catalog endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductFamily {
    Wallpapers,
    WoodenFloorings,
    Acoustics,
}

impl ProductFamily {
    /// All families, in navigation order.
    pub const ALL: [Self; 3] = [Self::Wallpapers, Self::WoodenFloorings, Self::Acoustics];

    /// URL slug used in this application's routes.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Wallpapers => "wallpapers",
            Self::WoodenFloorings => "wooden-floorings",
            Self::Acoustics => "acoustics",
        }
    }

    /// Path segment of the remote API, if the family has a catalog there.
    ///
    /// Note the remote API spells wooden floorings `wooden-floors`.
    #[must_use]
    pub const fn api_segment(self) -> Option<&'static str> {
        match self {
            Self::Wallpapers => Some("wallpapers"),
            Self::WoodenFloorings => Some("wooden-floors"),
            Self::Acoustics => None,
        }
    }

    /// Whether products and a category vocabulary exist for this family.
    #[must_use]
    pub const fn has_catalog(self) -> bool {
        self.api_segment().is_some()
    }

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wallpapers => "Wallpapers",
            Self::WoodenFloorings => "Wooden Floorings",
            Self::Acoustics => "Acoustics",
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for ProductFamily {
    type Err = FamilyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|family| family.slug() == s)
            .ok_or_else(|| FamilyError(s.to_owned()))
    }
}
