//! Account record owned by the user store
//!
//! One account exists per email address (case-insensitive). The email is
//! immutable after creation; everything else is mutated only by identity
//! reconciliation and by explicit admin commands outside this workspace.

use crate::email::EmailAddress;
use crate::name::PersonName;
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Internal account state for one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique, case-insensitive identity key; immutable after creation
    pub email: EmailAddress,
    /// First name derived from the provider display name
    pub first_name: String,
    /// Last name; empty when the display name had a single token
    pub last_name: String,
    /// Role driving downstream authorization
    pub role: Role,
    /// Whether the account may sign in; toggled only by admin commands
    pub is_active: bool,
    /// True while the account was created out-of-band by an admin and the
    /// user has not yet completed a real sign-in
    pub is_provisioned: bool,
    /// Who issued the invitation that set this account's role, if any
    pub invited_by: Option<EmailAddress>,
    /// When that invitation was issued
    pub invited_at: Option<DateTime<Utc>>,
    /// First completed sign-in that took the account into active use
    pub activated_at: Option<DateTime<Utc>>,
    /// Most recent successful sign-in
    pub last_login_at: Option<DateTime<Utc>>,
    /// Record creation instant
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Build a fresh, active, non-provisioned account as created by a first
    /// external sign-in.
    pub fn new(email: EmailAddress, name: PersonName, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            email,
            first_name: name.first,
            last_name: name.last,
            role,
            is_active: true,
            is_provisioned: false,
            invited_by: None,
            invited_at: None,
            activated_at: Some(now),
            last_login_at: Some(now),
            created_at: now,
        }
    }

    /// Build a pre-provisioned account as created by an admin before the
    /// target user ever signed in.
    pub fn provisioned(email: EmailAddress, name: PersonName, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            email,
            first_name: name.first,
            last_name: name.last,
            role,
            is_active: true,
            is_provisioned: true,
            invited_by: None,
            invited_at: None,
            activated_at: None,
            last_login_at: None,
            created_at: now,
        }
    }

    /// Current first/last pair as a `PersonName`
    pub fn person_name(&self) -> PersonName {
        PersonName {
            first: self.first_name.clone(),
            last: self.last_name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_account_is_active_and_stamped() {
        let email = EmailAddress::parse("grace@acme.com").unwrap();
        let name = PersonName::from_display_name("Grace Hopper");
        let account = Account::new(email, name, Role::Manager, t0());
        assert!(account.is_active);
        assert!(!account.is_provisioned);
        assert_eq!(account.activated_at, Some(t0()));
        assert_eq!(account.last_login_at, Some(t0()));
    }

    #[test]
    fn provisioned_account_has_no_login_history() {
        let email = EmailAddress::parse("grace@acme.com").unwrap();
        let name = PersonName::from_display_name("Grace Hopper");
        let account = Account::provisioned(email, name, Role::Admin, t0());
        assert!(account.is_provisioned);
        assert_eq!(account.activated_at, None);
        assert_eq!(account.last_login_at, None);
    }
}
