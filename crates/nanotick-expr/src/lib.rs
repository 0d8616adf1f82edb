//! Schedule expression core for nanosecond-resolution cron timers.
//!
//! An expression has exactly 7 whitespace-separated fields:
//!
//! ```text
//! nanosecond (0-999999999)  second (0-59)  minute (0-59)  hour (0-23)
//! day-of-month (1-31)  month (1-12)  day-of-week (0-6, 0 = Sunday)
//! ```
//!
//! Every field supports the same syntax:
//!
//! | Form | Meaning |
//! |------|---------|
//! | `*` | any value |
//! | `42` | exact value |
//! | `10-20` | inclusive range |
//! | `1,3,5` | list (up to 12 entries) |
//! | `*/15` | every 15th value from the field minimum |
//! | `10-50/5` | every 5th value inside the range |
//! | `10/5` | every 5th value from 10 to the field maximum |
//!
//! The standard vixie-cron day rule applies: when both day-of-month and
//! day-of-week are restricted they are OR-ed, otherwise AND-ed. A field
//! written as `0-6` admits every weekday but still counts as restricted;
//! only a bare `*` is a wildcard.
//!
//! # Example
//!
//! ```
//! use nanotick_expr::{Instant, ScheduleExpr, WallTime};
//!
//! // Weekdays at 09:30:00.000000000
//! let expr: ScheduleExpr = "0 0 30 9 * * 1-5".parse().unwrap();
//!
//! // 2025-02-18 09:30:00 UTC, a Tuesday
//! let wall = WallTime::from_instant(Instant::new(1_739_871_000, 0), 0).unwrap();
//! assert!(expr.matches(&wall));
//! ```

mod error;
mod field;
mod instant;
mod parser;
mod schedule;

pub use error::ParseError;
pub use field::{Field, MAX_ATOMS_PER_FIELD};
pub use instant::{Instant, MAX_NANOS};
pub use parser::MAX_SCHEDULE_LEN;
pub use schedule::{ScheduleExpr, WallTime};
