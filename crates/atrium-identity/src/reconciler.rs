//! The reconciliation procedure itself
//!
//! `reconcile` is the single authoritative path turning a verified external
//! identity into a consistent internal account. It is deterministic and
//! total: every branch ends in a persisted account or an explicit rejection.
//!
//! # Concurrency
//!
//! The read-modify-write sequence runs under a per-email async lock, and the
//! whole procedure retries from the lookup step on transient storage errors
//! or a lost invitation-consumption race. Invitation consumption claims the
//! invitation with a conditional update before the account write, so a
//! crashed reconciliation can never leave one invitation applied twice.

use crate::config::IdentityConfig;
use crate::lock::EmailLocks;
use crate::policy::DomainPolicy;
use crate::ports::{InvitationStore, UserStore};
use atrium_core::name::UNKNOWN_FIRST_NAME;
use atrium_core::{
    Account, AtriumError, Clock, EmailAddress, Invitation, PersonName, Result, Role, SystemClock,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// How a reconciliation concluded.
///
/// Callers use this for logging and telemetry only; authorization downstream
/// reads the account's `role` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconcileOutcome {
    /// A brand-new account was created for this identity
    Created,
    /// A pre-provisioned account completed its first real sign-in
    Activated,
    /// An ordinary repeat sign-in
    Reauthenticated,
    /// The email's domain is not on the allow-list; nothing was mutated
    DomainRejected,
}

/// Result of one reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// How the reconciliation concluded
    pub outcome: ReconcileOutcome,
    /// The persisted, post-mutation account; absent only on rejection
    pub account: Option<Account>,
}

impl Reconciliation {
    fn rejected() -> Self {
        Self {
            outcome: ReconcileOutcome::DomainRejected,
            account: None,
        }
    }

    fn completed(outcome: ReconcileOutcome, account: Account) -> Self {
        Self {
            outcome,
            account: Some(account),
        }
    }
}

/// The identity reconciliation engine
pub struct IdentityReconciler {
    pub(crate) users: Arc<dyn UserStore>,
    pub(crate) invitations: Arc<dyn InvitationStore>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) policy: DomainPolicy,
    pub(crate) config: IdentityConfig,
    locks: EmailLocks,
}

impl IdentityReconciler {
    /// Build an engine over the given stores with the system clock
    pub fn new(
        users: Arc<dyn UserStore>,
        invitations: Arc<dyn InvitationStore>,
        config: IdentityConfig,
    ) -> Result<Self> {
        Self::with_clock(users, invitations, config, Arc::new(SystemClock))
    }

    /// Build an engine with an injected clock (tests use a manual one)
    pub fn with_clock(
        users: Arc<dyn UserStore>,
        invitations: Arc<dyn InvitationStore>,
        config: IdentityConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let policy = DomainPolicy::new(config.allowed_domain.as_deref());
        Ok(Self {
            users,
            invitations,
            clock,
            policy,
            config,
            locks: EmailLocks::default(),
        })
    }

    /// Map a verified external identity onto an internal account.
    ///
    /// `email` must be the address verified by the upstream identity
    /// provider; a malformed address is a programmer error
    /// (`AtriumError::Invalid`), distinct from the normal
    /// [`ReconcileOutcome::DomainRejected`] rejection.
    pub async fn reconcile(&self, email: &str, display_name: &str) -> Result<Reconciliation> {
        let email = EmailAddress::parse(email)?;
        if !self.policy.is_allowed(&email) {
            info!(email = %email, "sign-in rejected by domain policy");
            return Ok(Reconciliation::rejected());
        }

        let lock = self.locks.for_email(&email);
        let _guard = lock.lock().await;

        let mut attempt = 1;
        loop {
            match self.reconcile_once(&email, display_name).await {
                Ok(reconciliation) => {
                    info!(
                        email = %email,
                        outcome = ?reconciliation.outcome,
                        attempt,
                        "reconciliation complete"
                    );
                    return Ok(reconciliation);
                }
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    debug!(email = %email, attempt, error = %err, "retrying reconciliation");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// One pass of the decision procedure, from a fresh lookup
    async fn reconcile_once(
        &self,
        email: &EmailAddress,
        display_name: &str,
    ) -> Result<Reconciliation> {
        let now = self.clock.now();
        match self.users.find_by_email(email).await? {
            None => self.create_account(email, display_name, now).await,
            Some(account) if account.is_provisioned => {
                self.activate_provisioned(account, display_name, now).await
            }
            Some(account) => self.reauthenticate(account, now).await,
        }
    }

    /// Branch A: first sign-in ever for this address
    async fn create_account(
        &self,
        email: &EmailAddress,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Reconciliation> {
        let invitation = self.pick_active_invitation(email, now).await?;
        let name = PersonName::from_display_name(display_name);
        let role = invitation
            .as_ref()
            .map(|i| i.intended_role)
            .unwrap_or(self.config.default_role);

        let mut account = Account::new(email.clone(), name, role, now);
        if let Some(invitation) = &invitation {
            self.consume(invitation, now).await?;
            account.invited_by = Some(invitation.invited_by.clone());
            account.invited_at = Some(invitation.invited_at);
        }

        let account = self.users.insert(account).await?;
        Ok(Reconciliation::completed(ReconcileOutcome::Created, account))
    }

    /// Branch B: first real sign-in for an admin-created account.
    ///
    /// The admin-assigned role is authoritative; invitations are not
    /// consulted here so a deliberate role grant is never overridden.
    async fn activate_provisioned(
        &self,
        mut account: Account,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Reconciliation> {
        account.is_provisioned = false;
        if account.activated_at.is_none() {
            account.activated_at = Some(now);
        }
        account.last_login_at = Some(later(account.last_login_at, now));

        if account.first_name == UNKNOWN_FIRST_NAME && !display_name.trim().is_empty() {
            let name = PersonName::from_display_name(display_name);
            account.first_name = name.first;
            account.last_name = name.last;
        }

        let account = self.users.update(account).await?;
        Ok(Reconciliation::completed(
            ReconcileOutcome::Activated,
            account,
        ))
    }

    /// Branch C: ordinary repeat sign-in
    async fn reauthenticate(
        &self,
        mut account: Account,
        now: DateTime<Utc>,
    ) -> Result<Reconciliation> {
        account.last_login_at = Some(later(account.last_login_at, now));

        if let Some(invitation) = self.pick_active_invitation(&account.email, now).await? {
            // The invitation is consumed either way; an admin's role is
            // sticky against invitation-driven change, but the invitation
            // must not linger as a dangling grant.
            self.consume(&invitation, now).await?;
            if account.role == Role::Admin {
                info!(
                    email = %account.email,
                    invitation = %invitation.id,
                    "invitation consumed without role change; admin role is sticky"
                );
            } else {
                account.role = invitation.intended_role;
                account.invited_by = Some(invitation.invited_by.clone());
                account.invited_at = Some(invitation.invited_at);
            }
        }

        let account = self.users.update(account).await?;
        Ok(Reconciliation::completed(
            ReconcileOutcome::Reauthenticated,
            account,
        ))
    }

    /// The single consumable invitation for this address, if any.
    ///
    /// More than one active invitation is an upstream data anomaly; the
    /// newest wins and the condition is logged.
    async fn pick_active_invitation(
        &self,
        email: &EmailAddress,
        now: DateTime<Utc>,
    ) -> Result<Option<Invitation>> {
        let mut active = self.invitations.find_active_for_email(email, now).await?;
        if active.len() > 1 {
            warn!(
                email = %email,
                count = active.len(),
                "multiple active invitations for one email; consuming the newest"
            );
        }
        active.sort_by_key(|i| std::cmp::Reverse(i.invited_at));
        Ok(active.into_iter().next())
    }

    /// Claim an invitation with the conditional update.
    ///
    /// Zero rows affected means another reconciliation consumed it first;
    /// surfacing that as a conflict sends the whole procedure back to the
    /// lookup step, where the invitation is no longer active.
    async fn consume(&self, invitation: &Invitation, now: DateTime<Utc>) -> Result<()> {
        if self.invitations.mark_used(invitation.id, now).await? {
            Ok(())
        } else {
            Err(AtriumError::conflict(format!(
                "invitation {} already consumed",
                invitation.id
            )))
        }
    }

    /// Idempotent startup pass promoting the configured bootstrap admin.
    ///
    /// Runs through the same store-mutation path as reconciliation: absent
    /// account is created pre-provisioned with `Admin`, a lesser role is
    /// promoted, an existing admin is left untouched. Domain policy does not
    /// apply; the address comes from configuration, not an external sign-in.
    pub async fn ensure_bootstrap_admin(&self) -> Result<Option<Account>> {
        let Some(email) = self.config.bootstrap_admin()? else {
            return Ok(None);
        };

        let lock = self.locks.for_email(&email);
        let _guard = lock.lock().await;

        let mut attempt = 1;
        loop {
            match self.bootstrap_once(&email).await {
                Ok(account) => return Ok(Some(account)),
                Err(err) if err.is_retryable() && attempt < self.config.max_attempts => {
                    debug!(email = %email, attempt, error = %err, "retrying admin bootstrap");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn bootstrap_once(&self, email: &EmailAddress) -> Result<Account> {
        let now = self.clock.now();
        match self.users.find_by_email(email).await? {
            None => {
                info!(email = %email, "creating bootstrap admin account");
                let account = Account::provisioned(
                    email.clone(),
                    PersonName::from_display_name(""),
                    Role::Admin,
                    now,
                );
                self.users.insert(account).await
            }
            Some(account) if account.role == Role::Admin => Ok(account),
            Some(mut account) => {
                info!(email = %email, from = %account.role, "promoting bootstrap admin");
                account.role = Role::Admin;
                self.users.update(account).await
            }
        }
    }
}

/// Monotonic timestamp update: never move an existing stamp backwards
fn later(previous: Option<DateTime<Utc>>, now: DateTime<Utc>) -> DateTime<Utc> {
    previous.map_or(now, |p| p.max(now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn later_never_regresses() {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap();
        let t1 = t0 + Duration::minutes(5);
        assert_eq!(later(None, t0), t0);
        assert_eq!(later(Some(t0), t1), t1);
        assert_eq!(later(Some(t1), t0), t1);
    }
}
