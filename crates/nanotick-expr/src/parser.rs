//! Expression parser: schedule text into a [`ScheduleExpr`].

use crate::error::ParseError;
use crate::field::{Atom, Field, MAX_ATOMS_PER_FIELD};
use crate::instant::MAX_NANOS;
use crate::schedule::ScheduleExpr;

/// Longest accepted schedule text, in bytes.
pub const MAX_SCHEDULE_LEN: usize = 512;

/// Per-position bounds plus a display name for error reporting.
#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    min: u64,
    max: u64,
}

const FIELD_COUNT: usize = 7;

const FIELD_SPECS: [FieldSpec; FIELD_COUNT] = [
    FieldSpec { name: "nanosecond", min: 0, max: MAX_NANOS as u64 },
    FieldSpec { name: "second", min: 0, max: 59 },
    FieldSpec { name: "minute", min: 0, max: 59 },
    FieldSpec { name: "hour", min: 0, max: 23 },
    FieldSpec { name: "day-of-month", min: 1, max: 31 },
    FieldSpec { name: "month", min: 1, max: 12 },
    FieldSpec { name: "day-of-week", min: 0, max: 6 },
];

pub(crate) fn parse_expression(text: &str) -> Result<ScheduleExpr, ParseError> {
    if text.len() > MAX_SCHEDULE_LEN {
        return Err(ParseError::TooLong { len: text.len() });
    }

    let tokens: Vec<&str> = text.split_ascii_whitespace().collect();
    let found = tokens.len();
    let tokens: [&str; FIELD_COUNT] = tokens
        .try_into()
        .map_err(|_| ParseError::FieldCount { found })?;

    Ok(ScheduleExpr {
        nanosecond: parse_field(tokens[0], &FIELD_SPECS[0])?,
        second: parse_field(tokens[1], &FIELD_SPECS[1])?,
        minute: parse_field(tokens[2], &FIELD_SPECS[2])?,
        hour: parse_field(tokens[3], &FIELD_SPECS[3])?,
        day_of_month: parse_field(tokens[4], &FIELD_SPECS[4])?,
        month: parse_field(tokens[5], &FIELD_SPECS[5])?,
        day_of_week: parse_field(tokens[6], &FIELD_SPECS[6])?,
    })
}

fn parse_field(token: &str, spec: &FieldSpec) -> Result<Field, ParseError> {
    // The wildcard marker is reserved for a field that is exactly `*`; a
    // `*` segment inside a list still covers the full range but leaves the
    // field restricted.
    if token == "*" {
        return Ok(Field::wildcard(spec.min, spec.max));
    }

    let mut atoms = Vec::new();
    for segment in token.split(',') {
        if segment.is_empty() {
            return Err(ParseError::EmptySegment { field: spec.name });
        }
        if atoms.len() == MAX_ATOMS_PER_FIELD {
            return Err(ParseError::TooManySegments { field: spec.name });
        }
        atoms.push(parse_segment(segment, spec)?);
    }
    Ok(Field::from_atoms(atoms))
}

fn parse_segment(segment: &str, spec: &FieldSpec) -> Result<Atom, ParseError> {
    let (body, step_text) = match segment.split_once('/') {
        Some((body, step)) => (body, Some(step)),
        None => (segment, None),
    };

    let (start, end, explicit_range) = if body == "*" {
        (spec.min, spec.max, true)
    } else if let Some((start_text, end_text)) = body.split_once('-') {
        let start = parse_bounded(start_text, spec)?;
        let end = parse_bounded(end_text, spec)?;
        if end < start {
            return Err(ParseError::InvertedRange {
                field: spec.name,
                start,
                end,
            });
        }
        (start, end, true)
    } else {
        let value = parse_bounded(body, spec)?;
        (value, value, false)
    };

    let step = match step_text {
        Some(text) => {
            let step = parse_number(text, spec)?;
            if step == 0 || step > u64::from(u32::MAX) {
                return Err(ParseError::StepOutOfRange {
                    field: spec.name,
                    step,
                });
            }
            step as u32
        }
        None => 1,
    };

    // "10/5" runs from 10 to the field maximum, vixie-style.
    let end = if step > 1 && !explicit_range { spec.max } else { end };

    Ok(Atom::new(start, end, step))
}

fn parse_bounded(text: &str, spec: &FieldSpec) -> Result<u64, ParseError> {
    let value = parse_number(text, spec)?;
    if value < spec.min || value > spec.max {
        return Err(ParseError::ValueOutOfRange {
            field: spec.name,
            value,
            min: spec.min,
            max: spec.max,
        });
    }
    Ok(value)
}

fn parse_number(text: &str, spec: &FieldSpec) -> Result<u64, ParseError> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidNumber {
            field: spec.name,
            text: text.to_string(),
        });
    }
    // All-digit input can only fail the conversion by overflowing.
    text.parse::<u64>().map_err(|_| ParseError::NumberOverflow {
        field: spec.name,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn expr(text: &str) -> ScheduleExpr {
        parse_expression(text).unwrap()
    }

    fn err(text: &str) -> ParseError {
        parse_expression(text).unwrap_err()
    }

    #[test]
    fn test_accepts_full_wildcard() {
        let parsed = expr("* * * * * * *");
        assert!(parsed.nanosecond.is_wildcard());
        assert!(parsed.day_of_week.is_wildcard());
    }

    #[test]
    fn test_wildcard_only_for_bare_star() {
        // Same value set, but `0-6` leaves the day-of-week restricted.
        let spelled_out = expr("0 0 0 0 * * 0-6");
        assert!(!spelled_out.day_of_week.is_wildcard());
        for weekday in 0..=6 {
            assert!(spelled_out.day_of_week.matches(weekday));
        }

        let starred = expr("0 0 0 0 * * *");
        assert!(starred.day_of_week.is_wildcard());
    }

    #[test]
    fn test_star_segment_in_list_is_not_wildcard() {
        let parsed = expr("0 *,5 * * * * *");
        assert!(!parsed.second.is_wildcard());
        assert!(parsed.second.matches(17));
    }

    #[test]
    fn test_step_from_wildcard() {
        let parsed = expr("*/250000000 * * * * * *");
        assert!(!parsed.nanosecond.is_wildcard());
        assert!(parsed.nanosecond.matches(0));
        assert!(parsed.nanosecond.matches(500_000_000));
        assert!(!parsed.nanosecond.matches(1));
    }

    #[test]
    fn test_step_without_range_runs_to_field_max() {
        let parsed = expr("0 10/5 * * * * *");
        assert!(parsed.second.matches(10));
        assert!(parsed.second.matches(55));
        assert!(!parsed.second.matches(11));
        assert!(!parsed.second.matches(5));
        assert_eq!(parsed.second.next_match(11, 59), Some(15));
    }

    #[test]
    fn test_step_of_one_without_range_stays_exact() {
        // "10/1" is just the value 10, not 10..max.
        let parsed = expr("0 10/1 * * * * *");
        assert!(parsed.second.matches(10));
        assert!(!parsed.second.matches(11));
    }

    #[test]
    fn test_range_with_step() {
        let parsed = expr("0 0 10-50/20 * * * *");
        assert!(parsed.minute.matches(10));
        assert!(parsed.minute.matches(30));
        assert!(parsed.minute.matches(50));
        assert!(!parsed.minute.matches(20));
        assert!(!parsed.minute.matches(51));
    }

    #[test]
    fn test_list_segments() {
        let parsed = expr("250000000,750000000 * * * * * *");
        assert!(parsed.nanosecond.matches(250_000_000));
        assert!(parsed.nanosecond.matches(750_000_000));
        assert!(!parsed.nanosecond.matches(500_000_000));
    }

    #[test]
    fn test_twelve_segments_accepted_thirteen_rejected() {
        let twelve = (0..12).map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        assert!(parse_expression(&format!("0 {twelve} * * * * *")).is_ok());

        let thirteen = (0..13).map(|v| v.to_string()).collect::<Vec<_>>().join(",");
        assert_eq!(
            err(&format!("0 {thirteen} * * * * *")),
            ParseError::TooManySegments { field: "second" }
        );
    }

    #[test]
    fn test_rejects_wrong_field_counts() {
        assert_eq!(err(""), ParseError::FieldCount { found: 0 });
        assert_eq!(err("* * * * *"), ParseError::FieldCount { found: 5 });
        assert_eq!(err("* * * * * * * *"), ParseError::FieldCount { found: 8 });
    }

    #[test]
    fn test_rejects_out_of_bounds_values() {
        assert_eq!(
            err("1000000000 * * * * * *"),
            ParseError::ValueOutOfRange {
                field: "nanosecond",
                value: 1_000_000_000,
                min: 0,
                max: 999_999_999,
            }
        );
        assert_eq!(
            err("* 60 * * * * *"),
            ParseError::ValueOutOfRange {
                field: "second",
                value: 60,
                min: 0,
                max: 59,
            }
        );
        // day-of-month and month start at 1
        assert!(matches!(
            err("0 0 0 0 0 * *"),
            ParseError::ValueOutOfRange { field: "day-of-month", .. }
        ));
        assert!(matches!(
            err("0 0 0 0 1 0 *"),
            ParseError::ValueOutOfRange { field: "month", .. }
        ));
    }

    #[test]
    fn test_rejects_malformed_segments() {
        assert!(matches!(err("abc * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("+5 * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("1.5 * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("5- * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("-5 * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("*-5 * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("5x * * * * * *"), ParseError::InvalidNumber { .. }));
        assert!(matches!(err("5//2 * * * * * *"), ParseError::InvalidNumber { .. }));
    }

    #[test]
    fn test_rejects_empty_list_segments() {
        assert_eq!(
            err("0 1,,2 * * * * *"),
            ParseError::EmptySegment { field: "second" }
        );
        assert_eq!(
            err("0 1, * * * * *"),
            ParseError::EmptySegment { field: "second" }
        );
        assert_eq!(
            err("0 ,1 * * * * *"),
            ParseError::EmptySegment { field: "second" }
        );
    }

    #[test]
    fn test_rejects_inverted_range() {
        assert_eq!(
            err("0 0 0 9-5 * * *"),
            ParseError::InvertedRange {
                field: "hour",
                start: 9,
                end: 5,
            }
        );
    }

    #[test]
    fn test_rejects_bad_steps() {
        assert_eq!(
            err("*/0 * * * * * *"),
            ParseError::StepOutOfRange {
                field: "nanosecond",
                step: 0,
            }
        );
        assert_eq!(
            err("0 */4294967296 * * * * *"),
            ParseError::StepOutOfRange {
                field: "second",
                step: 4_294_967_296,
            }
        );
    }

    #[test]
    fn test_rejects_numeric_overflow() {
        assert!(matches!(
            err("99999999999999999999999999 * * * * * *"),
            ParseError::NumberOverflow { .. }
        ));
    }

    #[test]
    fn test_rejects_over_long_text() {
        let long = "1".repeat(600);
        assert_eq!(err(&long), ParseError::TooLong { len: 600 });
    }

    #[test]
    fn test_tolerates_mixed_whitespace() {
        assert!(parse_expression("0\t*  *\t\t* *   * *").is_ok());
        assert!(parse_expression("  0 * * * * * *  ").is_ok());
    }
}
