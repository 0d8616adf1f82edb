//! Error types for the scheduler crate.

use nanotick_expr::ParseError;
use thiserror::Error;

/// Errors that can occur during scheduler operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The schedule text failed to parse; nothing was registered.
    #[error("invalid schedule expression: {0}")]
    Parse(#[from] ParseError),

    /// A UTC offset outside ±1440 minutes.
    #[error("utc offset {0} out of range -1440..=1440 minutes")]
    OffsetOutOfRange(i32),

    /// The handle does not refer to a schedule in this scheduler.
    #[error("schedule not found")]
    ScheduleNotFound,

    /// An instant carried an out-of-range nanosecond component.
    #[error("instant has out-of-range nanoseconds")]
    InvalidInstant,

    /// The scheduler was destroyed; no further operations are accepted.
    #[error("scheduler has been destroyed")]
    Destroyed,
}
