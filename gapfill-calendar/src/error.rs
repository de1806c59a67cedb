//! Structured error types for calendar operations.

use thiserror::Error;

/// Errors from formatting, parsing, and calendar lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("invalid format pattern '{0}'")]
    InvalidPattern(String),

    #[error("cannot parse '{input}' with pattern '{pattern}': {reason}")]
    Parse {
        input: String,
        pattern: String,
        reason: String,
    },

    #[error("invalid date value '{0}'")]
    UnrecognizedFormat(String),

    #[error("day of week must be between 1 and 7, got {0}")]
    InvalidWeekday(u32),

    #[error("unknown granularity '{0}' (expected hour, day, month or year)")]
    UnknownGranularity(String),

    #[error("date out of range: {0}")]
    OutOfRange(String),
}
