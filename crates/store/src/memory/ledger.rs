//! In-memory ledger store.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use tally_core::ledger::{EntryFilter, LedgerEntry, LedgerStore, NewLedgerEntry};
use tally_core::period::DateRange;
use tally_shared::error::StoreError;
use tally_shared::types::{LedgerEntryId, RecurringRuleId, UserId};

/// Ledger entries held in memory, insertion-ordered.
#[derive(Debug, Default)]
pub struct MemoryLedgerStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl MemoryLedgerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Soft-deletes an entry; returns false if it did not exist or was not
    /// owned. Interactive CRUD capability, not part of the engine-facing
    /// trait.
    pub async fn soft_delete(&self, user_id: UserId, id: LedgerEntryId) -> bool {
        let mut entries = self.entries.write().await;
        match entries
            .iter_mut()
            .find(|e| e.id == id && e.user_id == user_id)
        {
            Some(entry) => {
                entry.is_deleted = true;
                true
            }
            None => false,
        }
    }

    /// Returns every stored entry, deleted included. Test observability.
    pub async fn dump(&self) -> Vec<LedgerEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn insert(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError> {
        let stored = LedgerEntry {
            id: LedgerEntryId::new(),
            user_id: entry.user_id,
            name: entry.name,
            category: entry.category,
            amount: entry.amount,
            is_income: entry.is_income,
            occurred_on: entry.occurred_on,
            description: entry.description,
            is_deleted: false,
            is_generated: entry.is_generated,
            rule_id: entry.rule_id,
            occurrence: entry.occurrence,
            created_at: Utc::now(),
        };
        self.entries.write().await.push(stored.clone());
        Ok(stored)
    }

    async fn find(
        &self,
        user_id: UserId,
        filter: &EntryFilter,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e))
            .cloned()
            .collect())
    }

    async fn sum_expenses(
        &self,
        user_id: UserId,
        category: &str,
        range: &DateRange,
    ) -> Result<Decimal, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| {
                e.user_id == user_id
                    && !e.is_income
                    && !e.is_deleted
                    && e.category == category
                    && range.contains(e.occurred_on)
            })
            .map(|e| e.amount)
            .sum())
    }

    async fn find_by_rule(
        &self,
        user_id: UserId,
        rule_id: RecurringRuleId,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.user_id == user_id && e.rule_id == Some(rule_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use chrono::{DateTime, Utc};
    use rust_decimal_macros::dec;

    use super::*;

    fn expense(user_id: UserId, category: &str, amount: Decimal, on: DateTime<Utc>) -> NewLedgerEntry {
        NewLedgerEntry {
            user_id,
            name: "Groceries".to_string(),
            category: category.to_string(),
            amount,
            is_income: false,
            occurred_on: on,
            description: String::new(),
            is_generated: false,
            rule_id: None,
            occurrence: None,
        }
    }

    fn march(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_sum_excludes_income_and_deleted() {
        let store = MemoryLedgerStore::new();
        let user = UserId::new();

        store.insert(expense(user, "Food", dec!(40), march(5))).await.unwrap();
        let doomed = store
            .insert(expense(user, "Food", dec!(60), march(6)))
            .await
            .unwrap();
        let mut income = expense(user, "Food", dec!(500), march(7));
        income.is_income = true;
        store.insert(income).await.unwrap();

        assert!(store.soft_delete(user, doomed.id).await);

        let range = DateRange::new(march(1), march(31));
        let sum = store.sum_expenses(user, "Food", &range).await.unwrap();
        assert_eq!(sum, dec!(40));
    }

    #[tokio::test]
    async fn test_sum_is_zero_without_matches() {
        let store = MemoryLedgerStore::new();
        let range = DateRange::new(march(1), march(31));
        let sum = store
            .sum_expenses(UserId::new(), "Food", &range)
            .await
            .unwrap();
        assert_eq!(sum, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_sum_is_user_scoped() {
        let store = MemoryLedgerStore::new();
        let user = UserId::new();
        store.insert(expense(user, "Food", dec!(40), march(5))).await.unwrap();

        let range = DateRange::new(march(1), march(31));
        let other = store
            .sum_expenses(UserId::new(), "Food", &range)
            .await
            .unwrap();
        assert_eq!(other, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_soft_delete_requires_ownership() {
        let store = MemoryLedgerStore::new();
        let user = UserId::new();
        let entry = store
            .insert(expense(user, "Food", dec!(40), march(5)))
            .await
            .unwrap();

        assert!(!store.soft_delete(UserId::new(), entry.id).await);
        assert!(store.soft_delete(user, entry.id).await);
    }
}
