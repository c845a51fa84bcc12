//! Display-name derivation
//!
//! Identity providers hand over a single display name; accounts store a
//! first/last split. The split rule: first whitespace-separated token is the
//! first name (placeholder `"Unknown"` when nothing is there), the remaining
//! tokens rejoined with single spaces are the last name.

use serde::{Deserialize, Serialize};

/// Placeholder first name used when the provider supplied no usable name
pub const UNKNOWN_FIRST_NAME: &str = "Unknown";

/// A first/last name pair derived from a provider display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    /// First name; `"Unknown"` when underivable
    pub first: String,
    /// Last name; empty when the display name had a single token
    pub last: String,
}

impl PersonName {
    /// Split a display name into first and last name.
    ///
    /// `"Ada"` becomes `("Ada", "")`; `"Ada Lovelace Byron"` becomes
    /// `("Ada", "Lovelace Byron")`; an empty or all-whitespace input becomes
    /// `("Unknown", "")`.
    pub fn from_display_name(display_name: &str) -> Self {
        let mut tokens = display_name.split_whitespace();
        let first = match tokens.next() {
            Some(token) => token.to_string(),
            None => UNKNOWN_FIRST_NAME.to_string(),
        };
        let last = tokens.collect::<Vec<_>>().join(" ");
        Self { first, last }
    }

    /// Whether the first name is still the placeholder
    pub fn is_placeholder(&self) -> bool {
        self.first == UNKNOWN_FIRST_NAME
    }
}
