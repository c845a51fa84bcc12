//! In-memory implementations of the identity store ports
//!
//! Behave like the real stores at the contract level: accounts are keyed by
//! the normalized email with insert conflicting on duplicates, and
//! `mark_used` is the conditional single-use update. `fail_next` injects
//! transient storage errors to exercise the engine's retry loop.

use async_trait::async_trait;
use atrium_core::{Account, AtriumError, EmailAddress, Invitation, InvitationId, Result};
use atrium_identity::{InvitationStore, UserStore};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn take_injected_failure(budget: &AtomicUsize) -> Result<()> {
    // Decrement-if-positive; the CAS loop keeps concurrent ops from driving
    // the budget below zero.
    loop {
        let current = budget.load(Ordering::SeqCst);
        if current == 0 {
            return Ok(());
        }
        if budget
            .compare_exchange(current, current - 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return Err(AtriumError::storage("injected transient failure"));
        }
    }
}

/// In-memory account store double
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserStore {
    accounts: Arc<Mutex<HashMap<EmailAddress, Account>>>,
    failures: Arc<AtomicUsize>,
}

impl InMemoryUserStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account directly, bypassing the engine
    pub fn seed(&self, account: Account) {
        self.accounts.lock().insert(account.email.clone(), account);
    }

    /// Make the next `n` operations fail with a retryable storage error
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Snapshot of every stored account
    pub fn dump(&self) -> Vec<Account> {
        self.accounts.lock().values().cloned().collect()
    }

    /// Number of stored accounts
    pub fn len(&self) -> usize {
        self.accounts.lock().len()
    }

    /// Whether the store holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.lock().is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>> {
        take_injected_failure(&self.failures)?;
        Ok(self.accounts.lock().get(email).cloned())
    }

    async fn insert(&self, account: Account) -> Result<Account> {
        take_injected_failure(&self.failures)?;
        let mut accounts = self.accounts.lock();
        if accounts.contains_key(&account.email) {
            return Err(AtriumError::conflict(format!(
                "account {} already exists",
                account.email
            )));
        }
        accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account> {
        take_injected_failure(&self.failures)?;
        let mut accounts = self.accounts.lock();
        if !accounts.contains_key(&account.email) {
            return Err(AtriumError::not_found(format!(
                "no account for {}",
                account.email
            )));
        }
        accounts.insert(account.email.clone(), account.clone());
        Ok(account)
    }
}

/// In-memory invitation store double
#[derive(Debug, Default, Clone)]
pub struct InMemoryInvitationStore {
    invitations: Arc<Mutex<HashMap<InvitationId, Invitation>>>,
    failures: Arc<AtomicUsize>,
}

impl InMemoryInvitationStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an invitation directly, bypassing the engine
    pub fn seed(&self, invitation: Invitation) {
        self.invitations.lock().insert(invitation.id, invitation);
    }

    /// Make the next `n` operations fail with a retryable storage error
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// The invitation with this id, if present
    pub fn get(&self, id: InvitationId) -> Option<Invitation> {
        self.invitations.lock().get(&id).cloned()
    }
}

#[async_trait]
impl InvitationStore for InMemoryInvitationStore {
    async fn find_active_for_email(
        &self,
        email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> Result<Vec<Invitation>> {
        take_injected_failure(&self.failures)?;
        Ok(self
            .invitations
            .lock()
            .values()
            .filter(|i| &i.email == email && i.is_usable(now))
            .cloned()
            .collect())
    }

    async fn mark_used(&self, id: InvitationId, now: DateTime<Utc>) -> Result<bool> {
        take_injected_failure(&self.failures)?;
        let mut invitations = self.invitations.lock();
        let invitation = invitations
            .get_mut(&id)
            .ok_or_else(|| AtriumError::not_found(format!("no invitation {id}")))?;
        if invitation.is_used {
            return Ok(false);
        }
        invitation.is_used = true;
        invitation.used_at = Some(now);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::active_invitation;
    use atrium_core::Role;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn mark_used_is_single_shot() {
        let store = InMemoryInvitationStore::new();
        let invitation = active_invitation("a@x.com", Role::Manager, t0());
        store.seed(invitation.clone());

        assert!(store.mark_used(invitation.id, t0()).await.unwrap());
        assert!(!store.mark_used(invitation.id, t0()).await.unwrap());
        assert!(store.get(invitation.id).unwrap().is_used);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed() {
        let store = InMemoryUserStore::new();
        store.fail_next(1);
        let email = EmailAddress::parse("a@x.com").unwrap();
        assert!(store.find_by_email(&email).await.is_err());
        assert!(store.find_by_email(&email).await.is_ok());
    }
}
