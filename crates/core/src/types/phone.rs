//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// No digits were found.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input contains characters other than digits and separators.
    #[error("phone number contains invalid character {0:?}")]
    InvalidCharacter(char),
    /// Too few or too many digits.
    #[error("phone number must have between {min} and {max} digits")]
    Length {
        /// Minimum digit count.
        min: usize,
        /// Maximum digit count.
        max: usize,
    },
}

/// A phone number reduced to its digits.
///
/// Accepts the separators people actually type (spaces, dashes, dots,
/// parentheses and a leading `+`) and stores only the digits, which is the
/// form both `tel:` and `wa.me` links expect.
///
/// ```
/// use zendor_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+91 84339 00692").unwrap();
/// assert_eq!(phone.digits(), "918433900692");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits (local numbers without country code).
    pub const MIN_DIGITS: usize = 7;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a phone number, discarding separators.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has no digits, contains letters or other
    /// symbols, or has a digit count outside `MIN_DIGITS..=MAX_DIGITS`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let s = s.trim();
        let s = s.strip_prefix('+').unwrap_or(s);

        let mut digits = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                ' ' | '-' | '.' | '(' | ')' => {}
                other => return Err(PhoneError::InvalidCharacter(other)),
            }
        }

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }
        if !(Self::MIN_DIGITS..=Self::MAX_DIGITS).contains(&digits.len()) {
            return Err(PhoneError::Length {
                min: Self::MIN_DIGITS,
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// The digits of the number.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_separators() {
        assert_eq!(
            PhoneNumber::parse("(843) 390-0692").unwrap().digits(),
            "8433900692"
        );
        assert_eq!(
            PhoneNumber::parse("8433900692").unwrap().to_string(),
            "8433900692"
        );
    }

    #[test]
    fn test_parse_rejects_letters() {
        assert_eq!(
            PhoneNumber::parse("None"),
            Err(PhoneError::InvalidCharacter('N'))
        );
    }

    #[test]
    fn test_parse_length_bounds() {
        assert_eq!(PhoneNumber::parse(" + "), Err(PhoneError::Empty));
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(PhoneError::Length { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("1234567890123456"),
            Err(PhoneError::Length { .. })
        ));
    }
}
