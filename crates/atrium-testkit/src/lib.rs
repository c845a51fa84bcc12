//! Atrium Testing Infrastructure
//!
//! In-memory implementations of the identity store ports, a manual clock,
//! and fixture builders, shared by tests across the workspace.
//!
//! # Usage
//!
//! Add this to your crate's `Cargo.toml` dev-dependencies:
//! ```toml
//! [dev-dependencies]
//! atrium-testkit = { path = "../atrium-testkit" }
//! ```

#![forbid(unsafe_code)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

pub mod clock;
pub mod fixtures;
pub mod logging;
pub mod stores;

pub use clock::ManualClock;
pub use fixtures::{active_invitation, expired_invitation, provisioned_account};
pub use logging::init_test_logging;
pub use stores::{InMemoryInvitationStore, InMemoryUserStore};

// Re-export commonly used external types for convenience
pub use atrium_core::{Account, EmailAddress, Invitation, InvitationId, PersonName, Role};
