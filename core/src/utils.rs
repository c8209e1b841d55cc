//! Utility functions and types.

use std::fmt::Debug;

/// Redacts secret material for `Debug` output.
///
/// - Values shorter than 12 characters are fully hidden.
/// - Longer values keep their first and last three characters so that two
///   different keys can still be told apart in logs.
///
/// Redaction operates on characters, so multi-byte input never panics.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        Redact(value.as_deref().unwrap_or_default())
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let chars = self.0.chars().count();
        match chars {
            0 => f.write_str("EMPTY"),
            1..=11 => f.write_str("***"),
            _ => {
                let head: String = self.0.chars().take(3).collect();
                let tail: String = self.0.chars().skip(chars - 3).collect();
                write!(f, "{head}***{tail}")
            }
        }
    }
}
