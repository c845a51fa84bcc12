//! Manually driven clock
//!
//! Tests advance time explicitly so timestamp monotonicity and invitation
//! expiry can be asserted without sleeping.

use atrium_core::Clock;
use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// A settable clock shared between a test and the engine under test
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    /// A clock frozen at the given instant
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// A clock frozen at an arbitrary fixed workday instant
    pub fn fixed() -> Self {
        Self::at(Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap())
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }

    /// Jump the clock to an absolute instant
    pub fn set(&self, to: DateTime<Utc>) {
        *self.now.lock() = to;
    }

    /// Current instant without needing the `Clock` trait in scope
    pub fn now_value(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_time_forward() {
        let clock = ManualClock::fixed();
        let t0 = clock.now();
        clock.advance(Duration::minutes(10));
        assert_eq!(clock.now(), t0 + Duration::minutes(10));
    }
}
