//! In-memory budget store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use tally_core::budget::{Budget, BudgetFilter, BudgetStore};
use tally_core::period::BudgetPeriod;
use tally_shared::error::StoreError;
use tally_shared::types::{BudgetId, UserId};

/// Budgets held in memory, keyed by id.
///
/// Owns the authoritative uniqueness constraint: inserting a second active
/// budget for the same (user, category, period) fails under the write lock,
/// regardless of what the caller pre-checked.
#[derive(Debug, Default)]
pub struct MemoryBudgetStore {
    budgets: RwLock<HashMap<BudgetId, Budget>>,
}

impl MemoryBudgetStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn conflicts(existing: &Budget, candidate: &Budget) -> bool {
        existing.id != candidate.id
            && existing.is_active
            && existing.user_id == candidate.user_id
            && existing.category == candidate.category
            && existing.period == candidate.period
    }
}

#[async_trait]
impl BudgetStore for MemoryBudgetStore {
    async fn insert(&self, budget: Budget) -> Result<Budget, StoreError> {
        let mut budgets = self.budgets.write().await;
        if budget.is_active && budgets.values().any(|b| Self::conflicts(b, &budget)) {
            return Err(StoreError::new(format!(
                "duplicate active budget for {} in {}",
                budget.category,
                budget.period.label()
            )));
        }
        budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn find(&self, user_id: UserId, id: BudgetId) -> Result<Option<Budget>, StoreError> {
        Ok(self
            .budgets
            .read()
            .await
            .get(&id)
            .filter(|b| b.user_id == user_id)
            .cloned())
    }

    async fn update(&self, budget: Budget) -> Result<Budget, StoreError> {
        let mut budgets = self.budgets.write().await;
        if !budgets.contains_key(&budget.id) {
            return Err(StoreError::new(format!("budget not found: {}", budget.id)));
        }
        if budget.is_active && budgets.values().any(|b| Self::conflicts(b, &budget)) {
            return Err(StoreError::new(format!(
                "duplicate active budget for {} in {}",
                budget.category,
                budget.period.label()
            )));
        }
        budgets.insert(budget.id, budget.clone());
        Ok(budget)
    }

    async fn delete(&self, user_id: UserId, id: BudgetId) -> Result<bool, StoreError> {
        let mut budgets = self.budgets.write().await;
        if budgets.get(&id).is_some_and(|b| b.user_id == user_id) {
            budgets.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list_active(
        &self,
        user_id: UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<Budget>, StoreError> {
        let mut budgets: Vec<_> = self
            .budgets
            .read()
            .await
            .values()
            .filter(|b| b.user_id == user_id && b.is_active && filter.matches(&b.period))
            .cloned()
            .collect();
        budgets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.category.cmp(&b.category)));
        Ok(budgets)
    }

    async fn find_active_for_period(
        &self,
        user_id: UserId,
        category: &str,
        period: &BudgetPeriod,
    ) -> Result<Option<Budget>, StoreError> {
        Ok(self
            .budgets
            .read()
            .await
            .values()
            .find(|b| {
                b.user_id == user_id
                    && b.is_active
                    && b.category == category
                    && b.period == *period
            })
            .cloned())
    }
}
