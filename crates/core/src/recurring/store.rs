//! The recurring-rule store boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tally_shared::error::StoreError;
use tally_shared::types::{RecurringRuleId, UserId};

use super::types::RecurringRule;
use crate::period::DateRange;

/// Storage collaborator for recurring rules.
#[async_trait]
pub trait RecurringRuleStore: Send + Sync {
    /// Persists a new rule and returns the stored record.
    async fn insert(&self, rule: RecurringRule) -> Result<RecurringRule, StoreError>;

    /// Returns the rule if it exists and belongs to the user.
    async fn find(
        &self,
        user_id: UserId,
        id: RecurringRuleId,
    ) -> Result<Option<RecurringRule>, StoreError>;

    /// Returns all of the user's rules.
    async fn list(&self, user_id: UserId) -> Result<Vec<RecurringRule>, StoreError>;

    /// Replaces a stored rule with the given record.
    async fn update(&self, rule: RecurringRule) -> Result<RecurringRule, StoreError>;

    /// Removes a rule; returns false if it did not exist or was not owned.
    async fn delete(&self, user_id: UserId, id: RecurringRuleId) -> Result<bool, StoreError>;

    /// Returns all active rules due as of the given instant, across users.
    ///
    /// A rule is due when `next_due_date <= as_of` and its end date, if any,
    /// has not passed (`end_date >= as_of`).
    async fn due_rules(&self, as_of: DateTime<Utc>) -> Result<Vec<RecurringRule>, StoreError>;

    /// Returns the user's active rules with a due date inside the range and
    /// an end date that has not passed, ascending by due date.
    async fn upcoming(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> Result<Vec<RecurringRule>, StoreError>;

    /// Returns all active rules whose reminder latch is clear, across users.
    async fn pending_reminders(&self) -> Result<Vec<RecurringRule>, StoreError>;
}
