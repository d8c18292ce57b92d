//! Wall-clock source for task creation timestamps.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_epoch_ms(&self) -> i64;
}

/// Clock backed by `SystemTime`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_ms(&self) -> i64 {
        // A clock set before 1970 reports 0 rather than failing task creation.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0)
    }
}

/// Settable clock for deterministic tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicI64,
}

impl ManualClock {
    pub fn new(start_epoch_ms: i64) -> Self {
        Self {
            now_ms: AtomicI64::new(start_epoch_ms),
        }
    }

    pub fn set(&self, epoch_ms: i64) {
        self.now_ms.store(epoch_ms, Ordering::SeqCst);
    }

    pub fn advance_ms(&self, delta_ms: i64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_epoch_ms(&self) -> i64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, ManualClock, SystemClock};

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now_epoch_ms() > 1_577_836_800_000);
    }

    #[test]
    fn manual_clock_moves_only_when_told() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_epoch_ms(), 1_000);
        clock.advance_ms(250);
        assert_eq!(clock.now_epoch_ms(), 1_250);
        clock.set(5);
        assert_eq!(clock.now_epoch_ms(), 5);
    }
}
