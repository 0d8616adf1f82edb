//! Scheduler configuration.

use serde::{Deserialize, Serialize};

use crate::SchedulerError;

/// Largest accepted UTC offset magnitude, in minutes (24 hours).
pub const MAX_UTC_OFFSET_MINUTES: i32 = 1440;

/// Configuration for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Fixed offset from UTC, in minutes, applied when breaking instants
    /// down into calendar fields. No DST rules are applied. Defaults to 0.
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

impl SchedulerConfig {
    /// Configuration with the given fixed offset.
    pub fn with_offset(utc_offset_minutes: i32) -> Self {
        Self { utc_offset_minutes }
    }

    /// Check that the offset is within ±[`MAX_UTC_OFFSET_MINUTES`].
    pub fn validate(&self) -> Result<(), SchedulerError> {
        if !(-MAX_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES).contains(&self.utc_offset_minutes) {
            return Err(SchedulerError::OffsetOutOfRange(self.utc_offset_minutes));
        }
        Ok(())
    }
}
