//! Budget error types.

use tally_shared::error::{AppError, StoreError};
use tally_shared::types::BudgetId;
use thiserror::Error;

use crate::period::{BudgetKind, PeriodError};

/// Budget-related errors.
#[derive(Debug, Error)]
pub enum BudgetError {
    /// Budget not found or not owned by the caller.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// A required field is missing or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Ceiling amount cannot be negative.
    #[error("Amount cannot be negative")]
    NegativeAmount,

    /// Alert threshold outside 0-100.
    #[error("Alert threshold must be between 0 and 100")]
    InvalidThreshold,

    /// An active budget already covers this category and period.
    #[error("Budget already exists for {category} in this {kind} period")]
    DuplicateBudget {
        /// Conflicting category.
        category: String,
        /// Period classification of the conflict.
        kind: BudgetKind,
    },

    /// Invalid period fields.
    #[error(transparent)]
    Period(#[from] PeriodError),

    /// Underlying storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BudgetError> for AppError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::NotFound(err.to_string()),
            BudgetError::DuplicateBudget { .. } => Self::Conflict(err.to_string()),
            BudgetError::MissingField(_)
            | BudgetError::NegativeAmount
            | BudgetError::InvalidThreshold
            | BudgetError::Period(_) => Self::Validation(err.to_string()),
            BudgetError::Store(e) => Self::Store(e),
        }
    }
}
