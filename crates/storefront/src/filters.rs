//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Upper-cased first letter, for the avatar placeholder.
///
/// Usage in templates: `{{ profile.user_name|initial }}`
#[askama::filter_fn]
pub fn initial(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(first_letter(&value.to_string()))
}

fn first_letter(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().collect())
}
