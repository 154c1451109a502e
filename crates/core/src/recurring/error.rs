//! Recurring rule error types.

use tally_shared::error::{AppError, StoreError};
use tally_shared::types::RecurringRuleId;
use thiserror::Error;

use crate::period::PeriodError;

/// Recurring-rule errors.
#[derive(Debug, Error)]
pub enum RecurringError {
    /// Rule not found or not owned by the caller.
    #[error("Recurring rule not found: {0}")]
    NotFound(RecurringRuleId),

    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Amount must be strictly positive.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// End date precedes the schedule anchor.
    #[error("End date cannot be before start date")]
    EndBeforeStart,

    /// Invalid frequency or date arithmetic failure.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<RecurringError> for AppError {
    fn from(err: RecurringError) -> Self {
        match err {
            RecurringError::NotFound(_) => Self::NotFound(err.to_string()),
            RecurringError::MissingField(_)
            | RecurringError::NonPositiveAmount
            | RecurringError::EndBeforeStart
            | RecurringError::Period(_) => Self::Validation(err.to_string()),
            RecurringError::Store(e) => Self::Store(e),
        }
    }
}
