//! The budget store boundary.

use async_trait::async_trait;
use tally_shared::error::StoreError;
use tally_shared::types::{BudgetId, UserId};

use super::types::{Budget, BudgetFilter};
use crate::period::BudgetPeriod;

/// Storage collaborator for budgets.
///
/// Implementations own the authoritative uniqueness constraint: at most one
/// active budget per (user, category, period). The service pre-checks, but a
/// race between concurrent creates must be resolved here.
#[async_trait]
pub trait BudgetStore: Send + Sync {
    /// Persists a new budget and returns the stored record.
    async fn insert(&self, budget: Budget) -> Result<Budget, StoreError>;

    /// Returns the budget if it exists and belongs to the user.
    async fn find(&self, user_id: UserId, id: BudgetId) -> Result<Option<Budget>, StoreError>;

    /// Replaces a stored budget with the given record.
    async fn update(&self, budget: Budget) -> Result<Budget, StoreError>;

    /// Removes a budget; returns false if it did not exist or was not owned.
    async fn delete(&self, user_id: UserId, id: BudgetId) -> Result<bool, StoreError>;

    /// Returns the user's active budgets satisfying the filter.
    async fn list_active(
        &self,
        user_id: UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<Budget>, StoreError>;

    /// Returns the user's active budget for an exact (category, period), if
    /// one exists.
    async fn find_active_for_period(
        &self,
        user_id: UserId,
        category: &str,
        period: &BudgetPeriod,
    ) -> Result<Option<Budget>, StoreError>;
}
