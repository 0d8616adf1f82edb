//! Parse failures for schedule expressions.
//!
//! Parsing is all-or-nothing: any failure leaves the caller untouched and
//! registers nothing.

use thiserror::Error;

/// Errors produced while parsing a schedule expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Schedule text longer than the accepted cap.
    #[error("schedule text is {len} bytes, longest accepted is {max}", max = crate::MAX_SCHEDULE_LEN)]
    TooLong { len: usize },

    /// Wrong number of whitespace-separated fields.
    #[error("expected 7 whitespace-separated fields, found {found}")]
    FieldCount { found: usize },

    /// A comma produced an empty list segment.
    #[error("{field}: empty list segment")]
    EmptySegment { field: &'static str },

    /// A field carried more list segments than supported.
    #[error("{field}: more than {max} list segments", max = crate::MAX_ATOMS_PER_FIELD)]
    TooManySegments { field: &'static str },

    /// A value was not a plain decimal number.
    #[error("{field}: invalid number {text:?}")]
    InvalidNumber { field: &'static str, text: String },

    /// A decimal number overflowed during accumulation.
    #[error("{field}: number {text:?} does not fit in 64 bits")]
    NumberOverflow { field: &'static str, text: String },

    /// A value fell outside the field's bounds.
    #[error("{field}: value {value} out of range {min}-{max}")]
    ValueOutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// A range ended before it started.
    #[error("{field}: range end {end} is below start {start}")]
    InvertedRange {
        field: &'static str,
        start: u64,
        end: u64,
    },

    /// A step value of zero, or one too large to represent.
    #[error("{field}: step {step} out of range 1-{max}", max = u32::MAX)]
    StepOutOfRange { field: &'static str, step: u64 },
}
