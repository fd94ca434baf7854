use crate::pattern::Field;
use thiserror::Error;

/// Crate specific Errors implementation.
///
/// Every variant except [`InvalidFieldCount`](CronError::InvalidFieldCount) names
/// the schedule field which caused the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash)]
pub enum CronError {
    /// Schedule has less than five fields.
    #[error("invalid schedule `{0}`: expected at least 5 fields")]
    InvalidFieldCount(String),
    /// Field (or an element of the list) is empty.
    #[error("empty {0} field")]
    EmptyField(Field),
    /// Numeric value is outside of the field bounds.
    #[error("{field} value `{value}` is out of range")]
    OutOfRange {
        /// Offending field.
        field: Field,
        /// Offending value.
        value: String,
    },
    /// Unknown name or unsupported special character.
    #[error("unknown {field} token `{value}`")]
    UnknownToken {
        /// Offending field.
        field: Field,
        /// Offending token.
        value: String,
    },
    /// Range with the start greater than the end, or a malformed range.
    #[error("invalid {field} range `{value}`")]
    InvalidRange {
        /// Offending field.
        field: Field,
        /// Offending range.
        value: String,
    },
    /// Zero or malformed repeating step.
    #[error("invalid {field} step `{value}`")]
    InvalidStep {
        /// Offending field.
        field: Field,
        /// Offending pattern.
        value: String,
    },
    /// Occurrence index of the `#` pattern is outside of `1-5`.
    #[error("invalid {field} occurrence `{value}`, expected 1-5")]
    InvalidOccurrence {
        /// Offending field.
        field: Field,
        /// Offending pattern.
        value: String,
    },
}

impl CronError {
    /// Returns the field which caused the error, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            CronError::InvalidFieldCount(_) => None,
            CronError::EmptyField(field)
            | CronError::OutOfRange { field, .. }
            | CronError::UnknownToken { field, .. }
            | CronError::InvalidRange { field, .. }
            | CronError::InvalidStep { field, .. }
            | CronError::InvalidOccurrence { field, .. } => Some(*field),
        }
    }
}
