//! Ledger entry data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{LedgerEntryId, RecurringRuleId, UserId};

use crate::period::DateRange;

/// A single recorded income or expense transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Entry ID.
    pub id: LedgerEntryId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-text category label.
    pub category: String,
    /// Amount; always positive, direction carried by `is_income`.
    pub amount: Decimal,
    /// True for income, false for expense.
    pub is_income: bool,
    /// When the transaction occurred.
    pub occurred_on: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
    /// Soft-delete flag; aggregation excludes deleted entries.
    pub is_deleted: bool,
    /// True when created by the recurrence engine.
    pub is_generated: bool,
    /// Originating recurring rule, if generated.
    pub rule_id: Option<RecurringRuleId>,
    /// The due date this entry was generated for; the explicit idempotence
    /// key alongside `rule_id`.
    pub occurrence: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Input for inserting a ledger entry.
#[derive(Debug, Clone)]
pub struct NewLedgerEntry {
    /// Owning user.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Free-text category label.
    pub category: String,
    /// Amount; always positive.
    pub amount: Decimal,
    /// True for income, false for expense.
    pub is_income: bool,
    /// When the transaction occurred.
    pub occurred_on: DateTime<Utc>,
    /// Free-text description.
    pub description: String,
    /// True when created by the recurrence engine.
    pub is_generated: bool,
    /// Originating recurring rule, if generated.
    pub rule_id: Option<RecurringRuleId>,
    /// The due date this entry was generated for, if generated.
    pub occurrence: Option<DateTime<Utc>>,
}

/// Query filter over ledger entries.
///
/// All `None` fields match everything; `include_deleted` defaults to false
/// so aggregation paths never see soft-deleted entries unless they ask.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Exact display-name match.
    pub name: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact amount match.
    pub amount: Option<Decimal>,
    /// Income/expense flag match.
    pub is_income: Option<bool>,
    /// Originating rule match.
    pub rule_id: Option<RecurringRuleId>,
    /// Occurred-on range, bounds inclusive.
    pub range: Option<DateRange>,
    /// Whether soft-deleted entries match.
    pub include_deleted: bool,
}

impl EntryFilter {
    /// Returns true if the entry satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if entry.is_deleted && !self.include_deleted {
            return false;
        }
        if self.name.as_deref().is_some_and(|n| n != entry.name) {
            return false;
        }
        if self.category.as_deref().is_some_and(|c| c != entry.category) {
            return false;
        }
        if self.amount.is_some_and(|a| a != entry.amount) {
            return false;
        }
        if self.is_income.is_some_and(|i| i != entry.is_income) {
            return false;
        }
        if self.rule_id.is_some_and(|r| Some(r) != entry.rule_id) {
            return false;
        }
        if self
            .range
            .as_ref()
            .is_some_and(|r| !r.contains(entry.occurred_on))
        {
            return false;
        }
        true
    }
}
