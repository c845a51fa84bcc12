//! # Atrium Identity - Reconciliation Engine
//!
//! Maps a verified external identity (email + display name) onto an internal
//! account, honoring domain restrictions, pending invitations,
//! pre-provisioning, and role-protection invariants.
//!
//! # Architecture
//!
//! The engine is a library-level contract, not a network protocol. The
//! upstream identity-provider exchange, HTTP routing, and session issuance
//! all live outside this crate and interact with it through one entry point:
//!
//! 1. The sign-in callback hands `IdentityReconciler::reconcile` the verified
//!    `(email, display_name)` pair, identically regardless of which provider
//!    produced it
//! 2. The reconciler runs its read-modify-write sequence under a per-email
//!    critical section against the [`UserStore`] and [`InvitationStore`] ports
//! 3. The caller encodes the returned account into a session, or terminates
//!    the external session on [`ReconcileOutcome::DomainRejected`]
//!
//! Session validation reads the role fresh through
//! [`IdentityReconciler::claims_for`] into an immutable request-scoped
//! [`SessionClaims`]; long-lived principals are never patched in place.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Engine configuration
pub mod config;

/// Allowed-domain gate for external identities
pub mod policy;

/// Store ports the engine drives
pub mod ports;

/// The reconciliation procedure itself
pub mod reconciler;

/// Request-scoped identity claims for session validation
pub mod session;

mod lock;

pub use config::IdentityConfig;
pub use policy::DomainPolicy;
pub use ports::{InvitationStore, UserStore};
pub use reconciler::{IdentityReconciler, ReconcileOutcome, Reconciliation};
pub use session::SessionClaims;

// Re-export core types callers need alongside the engine
pub use atrium_core::{Account, AtriumError, EmailAddress, Invitation, PersonName, Role};
