//! Time sources for `last_updated` stamps.

use std::fmt;

use chrono::Utc;
use feed_core::types::Timestamp;
use tokio::time::Instant;

/// Source of the timestamp stamped on each completed refresh.
pub trait Clock: Send + Sync {
    /// Current time.
    fn now(&self) -> Timestamp;
}

/// Wall clock, Unix epoch milliseconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::from_millis(Utc::now().timestamp_millis())
    }
}

/// Milliseconds since creation, measured on Tokio's clock.
///
/// Follows `tokio::time::pause` / `advance`, so timestamps are exact under a
/// paused test runtime.
#[derive(Clone, Copy)]
pub struct RuntimeClock {
    origin: Instant,
}

impl RuntimeClock {
    /// Start counting from now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for RuntimeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuntimeClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeClock")
            .field("elapsed_ms", &self.origin.elapsed().as_millis())
            .finish()
    }
}

impl Clock for RuntimeClock {
    fn now(&self) -> Timestamp {
        let elapsed = self.origin.elapsed().as_millis();
        Timestamp::from_millis(i64::try_from(elapsed).unwrap_or(i64::MAX))
    }
}
