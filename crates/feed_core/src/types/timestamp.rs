//! Millisecond timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds on whatever clock the runtime was configured with.
///
/// With the system clock this is Unix epoch milliseconds; with the runtime
/// clock it is milliseconds since the clock was created.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Wrap a raw millisecond value.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Raw millisecond value.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Interpret as Unix epoch milliseconds.
    ///
    /// Returns `None` when the value is out of chrono's representable range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_to_datetime() {
        let ts = Timestamp::from_millis(1_700_000_000_000);
        let dt = ts.to_datetime().unwrap();
        assert_eq!(dt.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_timestamp_ordering() {
        assert!(Timestamp::from_millis(100) > Timestamp::from_millis(50));
        assert_eq!(Timestamp::default().as_millis(), 0);
    }
}
