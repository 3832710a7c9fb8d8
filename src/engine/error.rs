//! Typed rejections returned by the workflow engine.
//!
//! Every variant is produced before any state is written, so a caller can
//! fix its input and retry without compensating for a partial mutation.

use chrono::NaiveDate;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WorkflowError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// Week submitted without any recorded hours
    #[error("No hours recorded for week {0}")]
    EmptyWeek(String),

    /// Leave range resolves to zero business days
    #[error("Leave from {start} to {end} covers no business day")]
    ZeroDays { start: NaiveDate, end: NaiveDate },

    /// Rejection without a reason
    #[error("A reason is required to reject an item")]
    MissingReason,

    /// Entity is not in a state that allows the operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Malformed entry input (no allocations, non-positive hours, ...)
    #[error("Invalid entry: {0}")]
    InvalidEntry(String),

    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl WorkflowError {
    /// Stable identifier the presentation layer maps to a message.
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::EmptyWeek(_) => "empty_week",
            WorkflowError::ZeroDays { .. } => "zero_days",
            WorkflowError::MissingReason => "missing_reason",
            WorkflowError::InvalidState(_) => "invalid_state",
            WorkflowError::InvalidEntry(_) => "invalid_entry",
            WorkflowError::InvalidDateRange(_) => "invalid_date_range",
            WorkflowError::NotFound(_) => "not_found",
        }
    }
}
