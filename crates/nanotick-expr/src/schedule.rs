//! Parsed schedule expressions and instant matching.

use std::str::FromStr;

use chrono::{DateTime, Datelike, Timelike, Utc};

use crate::error::ParseError;
use crate::field::Field;
use crate::instant::{Instant, MAX_NANOS};
use crate::parser;

/// A broken-down instant, the unit the matcher consumes.
///
/// Produced by shifting an [`Instant`] by a fixed offset and decomposing the
/// result into calendar fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallTime {
    /// Nanoseconds within the second, carried through unchanged.
    pub nanos: u32,
    pub second: u32,
    pub minute: u32,
    pub hour: u32,
    /// Day of month, `1..=31`.
    pub day: u32,
    /// Month, `1..=12`.
    pub month: u32,
    /// Day of week, `0..=6` with `0` = Sunday.
    pub weekday: u32,
}

impl WallTime {
    /// Break `at` down after shifting it by `utc_offset_minutes`.
    ///
    /// Returns `None` when the shifted seconds overflow or fall outside the
    /// representable calendar range.
    pub fn from_instant(at: Instant, utc_offset_minutes: i32) -> Option<Self> {
        let shifted = at
            .secs
            .checked_add(i64::from(utc_offset_minutes) * 60)?;
        let utc = DateTime::<Utc>::from_timestamp(shifted, 0)?;
        Some(Self {
            nanos: at.nanos,
            second: utc.second(),
            minute: utc.minute(),
            hour: utc.hour(),
            day: utc.day(),
            month: utc.month(),
            weekday: utc.weekday().num_days_from_sunday(),
        })
    }
}

/// A parsed 7-field schedule expression.
///
/// Field order is `nanosecond second minute hour day-of-month month
/// day-of-week`; see the crate docs for the grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleExpr {
    pub(crate) nanosecond: Field,
    pub(crate) second: Field,
    pub(crate) minute: Field,
    pub(crate) hour: Field,
    pub(crate) day_of_month: Field,
    pub(crate) month: Field,
    pub(crate) day_of_week: Field,
}

impl ScheduleExpr {
    /// True when the expression matches the full broken-down instant.
    pub fn matches(&self, wall: &WallTime) -> bool {
        self.nanosecond.matches(u64::from(wall.nanos)) && self.matches_second(wall)
    }

    /// Like [`ScheduleExpr::matches`] but ignoring the nanosecond field.
    ///
    /// Next-trigger searches fix the matching second first and resolve the
    /// nanosecond within it separately.
    pub fn matches_second(&self, wall: &WallTime) -> bool {
        if !self.second.matches(u64::from(wall.second))
            || !self.minute.matches(u64::from(wall.minute))
            || !self.hour.matches(u64::from(wall.hour))
            || !self.month.matches(u64::from(wall.month))
        {
            return false;
        }
        self.day_fields_match(wall)
    }

    /// Smallest matching nanosecond `>= lo`, if any.
    pub fn next_nanosecond(&self, lo: u32) -> Option<u32> {
        self.nanosecond
            .next_match(u64::from(lo), u64::from(MAX_NANOS))
            .and_then(|nanos| u32::try_from(nanos).ok())
    }

    // Vixie day rule: OR when both day fields are restricted, AND otherwise.
    fn day_fields_match(&self, wall: &WallTime) -> bool {
        let dom = self.day_of_month.matches(u64::from(wall.day));
        let dow = self.day_of_week.matches(u64::from(wall.weekday));
        if self.day_of_month.is_wildcard() || self.day_of_week.is_wildcard() {
            dom && dow
        } else {
            dom || dow
        }
    }
}

impl FromStr for ScheduleExpr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse_expression(s)
    }
}
