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

/// Upper-cases the first character, leaving the rest untouched.
///
/// Usage in templates: `{{ category|capitalize_first }}`
#[askama::filter_fn]
pub fn capitalize_first(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(upper_first(&value.to_string()))
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_first() {
        assert_eq!(upper_first("men's clothing"), "Men's clothing");
        assert_eq!(upper_first("All"), "All");
        assert_eq!(upper_first("électronique"), "Électronique");
        assert_eq!(upper_first(""), "");
    }
}
