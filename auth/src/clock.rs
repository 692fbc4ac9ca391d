use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

use chrono::Duration;
use chrono::Utc;

/// Source of the current Unix timestamp used for token issuance and expiry.
pub trait Clock: Send + Sync {
    /// Seconds since the Unix epoch.
    fn timestamp(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Manually driven clock for tests and simulations.
///
/// Starts at a fixed timestamp and only moves when told to.
#[derive(Debug, Default)]
pub struct FixedClock {
    seconds: AtomicI64,
}

impl FixedClock {
    /// Create a clock frozen at `timestamp`.
    pub fn at(timestamp: i64) -> Self {
        Self {
            seconds: AtomicI64::new(timestamp),
        }
    }

    /// Create a clock frozen at the current wall-clock time.
    pub fn now() -> Self {
        Self::at(Utc::now().timestamp())
    }

    /// Move the clock forward (or backward, for a negative duration).
    pub fn advance(&self, by: Duration) {
        self.seconds.fetch_add(by.num_seconds(), Ordering::SeqCst);
    }

    /// Jump to an absolute timestamp.
    pub fn set(&self, timestamp: i64) {
        self.seconds.store(timestamp, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> i64 {
        self.seconds.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_only_moves_when_advanced() {
        let clock = FixedClock::at(1_000);
        assert_eq!(clock.timestamp(), 1_000);

        clock.advance(Duration::seconds(30));
        assert_eq!(clock.timestamp(), 1_030);

        clock.set(42);
        assert_eq!(clock.timestamp(), 42);
    }

    #[test]
    fn test_system_clock_is_close_to_now() {
        let delta = (SystemClock.timestamp() - Utc::now().timestamp()).abs();
        assert!(delta <= 1);
    }
}
