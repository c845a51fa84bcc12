//! Clock abstraction for testable time
//!
//! Reconciliation stamps several timestamps (`activated_at`, `last_login_at`,
//! `used_at`) whose monotonicity is an invariant; injecting the clock keeps
//! those invariants testable without sleeping in tests.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
