//! Request-scoped identity claims for session validation
//!
//! Session middleware validates a cookie on every request and needs the
//! caller's current role. The role is read fresh from the account store and
//! attached to a short-lived, immutable snapshot; long-lived principal
//! objects are never mutated in place, so a role change made by an admin
//! takes effect on the next request without touching issued sessions.

use crate::reconciler::IdentityReconciler;
use atrium_core::{AtriumError, EmailAddress, Result, Role};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable identity snapshot for one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The authenticated address
    pub email: EmailAddress,
    /// Role at the instant of validation
    pub role: Role,
    /// When this snapshot was taken
    pub issued_at: DateTime<Utc>,
}

impl IdentityReconciler {
    /// Fresh claims for an already-reconciled identity.
    ///
    /// Fails with `NotFound` for an unknown address and `PermissionDenied`
    /// for a deactivated account; in both cases the caller must terminate
    /// the session rather than serve the request.
    pub async fn claims_for(&self, email: &EmailAddress) -> Result<SessionClaims> {
        let account = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AtriumError::not_found(format!("no account for {email}")))?;

        if !account.is_active {
            return Err(AtriumError::permission_denied(format!(
                "account {email} is deactivated"
            )));
        }

        Ok(SessionClaims {
            email: account.email,
            role: account.role,
            issued_at: self.clock.now(),
        })
    }
}
