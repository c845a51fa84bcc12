//! Flat role model
//!
//! Three roles cover the whole platform. There is no permission lattice
//! beyond them; authorization downstream compares roles directly.

use crate::errors::AtriumError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role held by an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Full administrative access, including user and invitation management
    Admin,
    /// Project-level management access
    Manager,
    /// Ordinary platform access
    #[default]
    Employee,
}

impl Role {
    /// All roles, most privileged first
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Employee];

    /// String form used in configuration and session claims
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Employee => "Employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AtriumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            other => Err(AtriumError::invalid(format!("unknown role '{other}'"))),
        }
    }
}
