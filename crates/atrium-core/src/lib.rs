//! # Atrium Core - Domain Foundation
//!
//! Domain types shared across the Atrium intranet platform: roles, validated
//! email addresses, accounts, invitations, and the unified error type.
//!
//! # Architecture Constraints
//!
//! This crate is the foundation layer and depends on nothing else in the
//! workspace:
//! - YES domain types and their pure invariant-checking logic
//! - YES the unified `AtriumError` type
//! - NO store implementations (those are ports in `atrium-identity`)
//! - NO async execution (pure synchronous domain logic)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Unified error type for all Atrium operations
pub mod errors;

/// Validated, normalized email addresses
pub mod email;

/// Flat role model
pub mod role;

/// Account record owned by the user store
pub mod account;

/// Single-use, time-boxed role invitations
pub mod invitation;

/// Display-name derivation
pub mod name;

/// Clock abstraction for testable time
pub mod time;

pub use account::Account;
pub use email::EmailAddress;
pub use errors::{AtriumError, Result};
pub use invitation::{Invitation, InvitationId};
pub use name::PersonName;
pub use role::Role;
pub use time::{Clock, SystemClock};
