//! Bearer credential issued by the remote API.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zendor_core::{Email, UserRole};

/// Access token sent as `Authorization: Bearer <token>`.
///
/// `Debug` is redacted. The token serializes as a plain string so it can
/// live in the server-side session store.
#[derive(Clone)]
pub struct BearerToken(SecretString);

impl BearerToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Parse a token, rejecting blank input.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        (!token.is_empty()).then(|| Self::new(token))
    }

    /// The raw token, for building the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

impl PartialEq for BearerToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for BearerToken {}

impl Serialize for BearerToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose())
    }
}

impl<'de> Deserialize<'de> for BearerToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| serde::de::Error::custom("bearer token cannot be blank"))
    }
}

/// What the remote login flow hands over once a user has signed in.
///
/// Posted as JSON to `/auth/session` by both web binaries and kept in the
/// server-side session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionHandoff {
    pub token: BearerToken,
    #[serde(default)]
    pub email: Option<Email>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

impl SessionHandoff {
    /// Display name, if one was given.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}
