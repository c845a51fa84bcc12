//! Store ports the engine drives
//!
//! The persistence engine is out of scope; the reconciler sees it through
//! these two traits. Implementations must key accounts and invitations by the
//! normalized (lowercase) email and report transient failures as
//! `AtriumError::Storage` or `AtriumError::Conflict` so the retry loop can
//! classify them.

use async_trait::async_trait;
use atrium_core::{Account, EmailAddress, Invitation, InvitationId, Result};
use chrono::{DateTime, Utc};

/// Persisted account records
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up the account for an address, if any
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>>;

    /// Persist a brand-new account.
    ///
    /// Must fail with `AtriumError::Conflict` if an account for the same
    /// email already exists, so a racing creation falls back into the
    /// existing-account branches on retry.
    async fn insert(&self, account: Account) -> Result<Account>;

    /// Persist changes to an existing account.
    ///
    /// Fails with `AtriumError::NotFound` if no account exists for the email.
    async fn update(&self, account: Account) -> Result<Account>;
}

/// Persisted invitation records
#[async_trait]
pub trait InvitationStore: Send + Sync {
    /// All invitations for this address that are unused and unexpired at
    /// `now`.
    ///
    /// Upstream invitation creation keeps at most one active; more than one
    /// is a data anomaly the reconciler resolves by newest `invited_at`.
    async fn find_active_for_email(
        &self,
        email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> Result<Vec<Invitation>>;

    /// Conditionally consume an invitation.
    ///
    /// Sets `is_used = true, used_at = now` iff the invitation is still
    /// unused; returns `false` when it was already consumed (the caller must
    /// re-read and retry without it).
    async fn mark_used(&self, id: InvitationId, now: DateTime<Utc>) -> Result<bool>;
}
