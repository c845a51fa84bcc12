//! Validated, normalized email addresses
//!
//! Email is the identity key of the whole platform and is matched
//! case-insensitively everywhere, so addresses are lowercased once at the
//! boundary and every later comparison is plain equality.
//!
//! Validation here is syntactic only (non-empty local part and domain around
//! a single `@`); cryptographic verification of ownership happens upstream at
//! the identity provider and is a trust boundary for this crate.

use crate::errors::AtriumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A syntactically valid email address, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize an address.
    ///
    /// Rejects empty input, missing `@`, an empty local part or domain, and
    /// embedded whitespace. Everything accepted is stored lowercased.
    pub fn parse(raw: &str) -> Result<Self, AtriumError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AtriumError::invalid("email must not be empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(AtriumError::invalid(format!(
                "email '{trimmed}' contains whitespace"
            )));
        }
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or_else(|| AtriumError::invalid(format!("email '{trimmed}' has no '@'")))?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(AtriumError::invalid(format!(
                "email '{trimmed}' is malformed"
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    /// The normalized address as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The domain part (after the `@`), already lowercased
    pub fn domain(&self) -> &str {
        // Parse guarantees exactly one '@' with a non-empty tail.
        self.0.rsplit('@').next().unwrap_or("")
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = AtriumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = AtriumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
