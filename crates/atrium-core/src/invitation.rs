//! Single-use, time-boxed role invitations
//!
//! An invitation grants an intended role to a specific email address. It is
//! consumed at most once, atomically with the account write that applies it,
//! and becomes unusable (but is kept for audit) after `expires_at`.

use crate::email::EmailAddress;
use crate::role::Role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique invitation identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InvitationId(Uuid);

impl InvitationId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InvitationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A pending or consumed role grant for one email address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    /// Unique invitation identifier
    pub id: InvitationId,
    /// Target identity
    pub email: EmailAddress,
    /// Role granted when the invitation is consumed
    pub intended_role: Role,
    /// Who issued the invitation
    pub invited_by: EmailAddress,
    /// When the invitation was issued
    pub invited_at: DateTime<Utc>,
    /// Instant after which the invitation can no longer be consumed
    pub expires_at: DateTime<Utc>,
    /// Set exactly once, atomically with the consuming account write
    pub is_used: bool,
    /// When the invitation was consumed
    pub used_at: Option<DateTime<Utc>>,
}

impl Invitation {
    /// Whether this invitation can still be consumed at `now`
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        !self.is_used && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    fn sample(expires_at: DateTime<Utc>) -> Invitation {
        Invitation {
            id: InvitationId::new(),
            email: EmailAddress::parse("new@acme.com").unwrap(),
            intended_role: Role::Manager,
            invited_by: EmailAddress::parse("admin@acme.com").unwrap(),
            invited_at: t0(),
            expires_at,
            is_used: false,
            used_at: None,
        }
    }

    #[test]
    fn usable_until_expiry() {
        let invitation = sample(t0() + Duration::days(7));
        assert!(invitation.is_usable(t0()));
        assert!(!invitation.is_usable(t0() + Duration::days(7)));
        assert!(!invitation.is_usable(t0() + Duration::days(8)));
    }

    #[test]
    fn used_invitation_is_never_usable() {
        let mut invitation = sample(t0() + Duration::days(7));
        invitation.is_used = true;
        invitation.used_at = Some(t0());
        assert!(!invitation.is_usable(t0()));
    }
}
