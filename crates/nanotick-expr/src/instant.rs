//! Nanosecond-resolution points on the Unix timeline.

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Largest valid nanosecond-of-second component.
pub const MAX_NANOS: u32 = 999_999_999;

/// A point in time: whole seconds since the Unix epoch plus nanoseconds
/// within that second.
///
/// Ordering is lexicographic on `(secs, nanos)`. The type does not enforce
/// `nanos <= MAX_NANOS`; operations that consume instants reject invalid
/// ones instead (see [`Instant::is_valid`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instant {
    /// Seconds since `1970-01-01T00:00:00Z`; may be negative.
    pub secs: i64,
    /// Nanoseconds within the second, `0..=999_999_999` when valid.
    pub nanos: u32,
}

impl Instant {
    /// An instant from seconds and nanoseconds.
    pub const fn new(secs: i64, nanos: u32) -> Self {
        Self { secs, nanos }
    }

    /// An instant on a whole-second boundary.
    pub const fn from_secs(secs: i64) -> Self {
        Self { secs, nanos: 0 }
    }

    /// True when the nanosecond component is in range.
    pub const fn is_valid(&self) -> bool {
        self.nanos <= MAX_NANOS
    }

    /// Current UTC wall-clock time.
    pub fn now() -> Self {
        let now = Utc::now();
        // chrono folds leap seconds into nanos >= 1e9; clamp back into range
        Self {
            secs: now.timestamp(),
            nanos: now.timestamp_subsec_nanos().min(MAX_NANOS),
        }
    }
}

impl fmt::Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.secs, self.nanos)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_ordering_is_lexicographic() {
        let a = Instant::new(10, 999_999_999);
        let b = Instant::new(11, 0);
        assert!(a < b);

        let c = Instant::new(10, 5);
        let d = Instant::new(10, 6);
        assert!(c < d);
        assert_eq!(c, Instant::new(10, 5));
    }

    #[test]
    fn test_validity() {
        assert!(Instant::new(0, 0).is_valid());
        assert!(Instant::new(-1, MAX_NANOS).is_valid());
        assert!(!Instant::new(0, MAX_NANOS + 1).is_valid());
    }

    #[test]
    fn test_display_pads_nanoseconds() {
        assert_eq!(Instant::new(1_739_788_200, 5).to_string(), "1739788200.000000005");
        assert_eq!(Instant::new(-3, 0).to_string(), "-3.000000000");
    }

    #[test]
    fn test_now_is_valid() {
        assert!(Instant::now().is_valid());
    }

    #[test]
    fn test_serde_roundtrip() {
        let at = Instant::new(1_739_788_200, 250_000_000);
        let json = serde_json::to_string(&at).unwrap();
        let back: Instant = serde_json::from_str(&json).unwrap();
        assert_eq!(at, back);
    }
}
