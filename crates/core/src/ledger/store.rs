//! The ledger store boundary.

use async_trait::async_trait;
use rust_decimal::Decimal;
use tally_shared::error::StoreError;
use tally_shared::types::{RecurringRuleId, UserId};

use super::types::{EntryFilter, LedgerEntry, NewLedgerEntry};
use crate::period::DateRange;

/// Storage collaborator for ledger entries.
///
/// Implementations are expected to be safe for concurrent reads; writes come
/// from a single writer (the recurrence engine plus interactive CRUD that is
/// out of this core's scope).
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Inserts a new entry and returns the stored record.
    async fn insert(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, StoreError>;

    /// Returns the user's entries satisfying the filter.
    async fn find(
        &self,
        user_id: UserId,
        filter: &EntryFilter,
    ) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Sums expense amounts for a user and category within a range.
    ///
    /// Excludes income and soft-deleted entries; no matches sum to zero.
    async fn sum_expenses(
        &self,
        user_id: UserId,
        category: &str,
        range: &DateRange,
    ) -> Result<Decimal, StoreError>;

    /// Returns the user's entries generated from the given rule.
    async fn find_by_rule(
        &self,
        user_id: UserId,
        rule_id: RecurringRuleId,
    ) -> Result<Vec<LedgerEntry>, StoreError>;
}
