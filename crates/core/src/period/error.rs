//! Period calculation error types.

use thiserror::Error;

/// Errors from period and due-date calculations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    /// Frequency string not recognized.
    #[error("Unknown frequency: {0}")]
    InvalidFrequency(String),

    /// Date arithmetic produced no valid calendar date.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Month outside the 1-12 contract.
    #[error("Month out of range (1-12): {0}")]
    InvalidMonth(u32),

    /// Week outside the 1-53 contract.
    #[error("Week out of range (1-53): {0}")]
    InvalidWeek(u32),
}
