//! Budget tracking and spend aggregation.
//!
//! This module implements the budget engine:
//! - Per-period spend ceilings with active-uniqueness per category
//! - Spend-to-date aggregation over the ledger
//! - Status classification against the alert threshold
//! - Dashboard summary with current-period defaulting

pub mod error;
pub mod service;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::BudgetError;
pub use service::{BudgetService, compute_status};
pub use store::BudgetStore;
pub use types::{
    AlertStatus, Budget, BudgetFilter, BudgetStatus, BudgetSummaryReport, BudgetWithStatus,
    CategoryBreakdown, CreateBudgetInput, SummaryFilter, SummaryPeriod, SummaryTotals,
    UpdateBudgetPatch,
};
