//! Per-email mutual exclusion
//!
//! Duplicate browser tabs or retried callbacks can race reconciliations for
//! the same address. The read-modify-write sequence must be serialized per
//! normalized email; unrelated addresses proceed concurrently.

use atrium_core::EmailAddress;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;

/// Lazily-populated map of per-email async locks
#[derive(Debug, Default)]
pub(crate) struct EmailLocks {
    inner: Mutex<HashMap<EmailAddress, Arc<AsyncMutex<()>>>>,
}

impl EmailLocks {
    /// The lock guarding this address, created on first use.
    ///
    /// Entries are never removed; the key space is bounded by the user
    /// population of an intranet deployment.
    pub(crate) fn for_email(&self, email: &EmailAddress) -> Arc<AsyncMutex<()>> {
        let mut map = self.inner.lock();
        map.entry(email.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }
}
