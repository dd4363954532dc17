//! Visit-store lead deep links.
//!
//! A visitor leaves their name and picks a channel; the store is then
//! reached through the visitor's own phone or `WhatsApp`, with a prefilled
//! message introducing them.

use thiserror::Error;
use zendor_core::PhoneNumber;

/// Errors building a lead link.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeadError {
    /// `WhatsApp` leads must say who is asking.
    #[error("a name is required to message the store")]
    MissingName,
}

/// How the visitor wants to reach the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadChannel {
    Call,
    WhatsApp,
}

impl LeadChannel {
    /// Name used in logs and Sentry breadcrumbs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::WhatsApp => "whatsapp",
        }
    }
}

/// A visitor's request to visit the store.
#[derive(Debug, Clone)]
pub struct VisitRequest<'a> {
    name: &'a str,
    store_phone: &'a PhoneNumber,
}

impl<'a> VisitRequest<'a> {
    #[must_use]
    pub fn new(name: &'a str, store_phone: &'a PhoneNumber) -> Self {
        Self {
            name: name.trim(),
            store_phone,
        }
    }

    /// The prefilled message.
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "Hi!My name is {}. I would like to visit your store. Please provide more information.",
            self.name
        )
    }

    /// Deep link for `channel`.
    ///
    /// # Errors
    ///
    /// Returns [`LeadError::MissingName`] for a `WhatsApp` lead without a
    /// name. Calls need only the store phone.
    pub fn link(&self, channel: LeadChannel) -> Result<String, LeadError> {
        // Every reserved character is escaped, `!` included (`%21`); the
        // decoded text is unchanged.
        let message = urlencoding::encode(&self.message()).into_owned();
        let phone = self.store_phone.digits();

        match channel {
            LeadChannel::Call => Ok(format!("tel:{phone}?body={message}")),
            LeadChannel::WhatsApp if self.name.is_empty() => Err(LeadError::MissingName),
            LeadChannel::WhatsApp => Ok(format!("https://wa.me/{phone}?text={message}")),
        }
    }
}
