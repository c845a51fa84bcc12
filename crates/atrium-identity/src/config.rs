//! Engine configuration
//!
//! Four knobs drive the engine: the allowed email domain (absent or empty
//! means no restriction), the default role for uninvited sign-ups, an
//! optional bootstrap admin promoted idempotently at startup, and the bounded
//! retry budget for transient storage failures.

use atrium_core::{AtriumError, EmailAddress, Result, Role};
use serde::{Deserialize, Serialize};

fn default_role() -> Role {
    Role::Employee
}

fn default_max_attempts() -> usize {
    3
}

/// Configuration for the identity reconciliation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Email domain external identities must carry; `None` or empty allows all
    #[serde(default)]
    pub allowed_domain: Option<String>,

    /// Role granted to new accounts that arrive without an invitation
    #[serde(default = "default_role")]
    pub default_role: Role,

    /// Email promoted to `Admin` by the startup bootstrap pass, if set
    #[serde(default)]
    pub bootstrap_admin_email: Option<String>,

    /// How many times one reconciliation is attempted across transient
    /// storage failures before the error surfaces to the caller
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            allowed_domain: None,
            default_role: default_role(),
            bootstrap_admin_email: None,
            max_attempts: default_max_attempts(),
        }
    }
}

impl IdentityConfig {
    /// Parse a TOML fragment into a validated configuration
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)
            .map_err(|e| AtriumError::invalid(format!("bad identity config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check internal consistency; call after any manual construction
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(AtriumError::invalid("max_attempts must be at least 1"));
        }
        if let Some(raw) = &self.bootstrap_admin_email {
            if !raw.trim().is_empty() {
                EmailAddress::parse(raw)?;
            }
        }
        Ok(())
    }

    /// The bootstrap admin address, parsed; `None` when unset or blank
    pub fn bootstrap_admin(&self) -> Result<Option<EmailAddress>> {
        match &self.bootstrap_admin_email {
            Some(raw) if !raw.trim().is_empty() => Ok(Some(EmailAddress::parse(raw)?)),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_permissive() {
        let config = IdentityConfig::default();
        assert!(config.allowed_domain.is_none());
        assert_eq!(config.default_role, Role::Employee);
        assert_eq!(config.max_attempts, 3);
        config.validate().unwrap();
    }

    #[test]
    fn parses_toml_fragment() {
        let config = IdentityConfig::from_toml_str(
            r#"
            allowed_domain = "acme.com"
            default_role = "Employee"
            bootstrap_admin_email = "root@acme.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.allowed_domain.as_deref(), Some("acme.com"));
        assert_eq!(
            config.bootstrap_admin().unwrap().unwrap().as_str(),
            "root@acme.com"
        );
    }

    #[test]
    fn rejects_zero_attempts_and_bad_bootstrap_email() {
        let mut config = IdentityConfig {
            max_attempts: 0,
            ..IdentityConfig::default()
        };
        assert!(config.validate().is_err());

        config.max_attempts = 1;
        config.bootstrap_admin_email = Some("not-an-email".into());
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_bootstrap_email_means_none() {
        let config = IdentityConfig {
            bootstrap_admin_email: Some("   ".into()),
            ..IdentityConfig::default()
        };
        config.validate().unwrap();
        assert!(config.bootstrap_admin().unwrap().is_none());
    }
}
