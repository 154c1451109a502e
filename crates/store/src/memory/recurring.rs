//! In-memory recurring-rule store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use tally_core::period::{DateRange, is_due};
use tally_core::recurring::{RecurringRule, RecurringRuleStore};
use tally_shared::error::StoreError;
use tally_shared::types::{RecurringRuleId, UserId};

/// Recurring rules held in memory, keyed by id.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: RwLock<HashMap<RecurringRuleId, RecurringRule>>,
}

impl MemoryRuleStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecurringRuleStore for MemoryRuleStore {
    async fn insert(&self, rule: RecurringRule) -> Result<RecurringRule, StoreError> {
        self.rules.write().await.insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn find(
        &self,
        user_id: UserId,
        id: RecurringRuleId,
    ) -> Result<Option<RecurringRule>, StoreError> {
        Ok(self
            .rules
            .read()
            .await
            .get(&id)
            .filter(|r| r.user_id == user_id)
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<RecurringRule>, StoreError> {
        let mut rules: Vec<_> = self
            .rules
            .read()
            .await
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        rules.sort_by_key(|r| r.created_at);
        Ok(rules)
    }

    async fn update(&self, rule: RecurringRule) -> Result<RecurringRule, StoreError> {
        let mut rules = self.rules.write().await;
        if !rules.contains_key(&rule.id) {
            return Err(StoreError::new(format!("rule not found: {}", rule.id)));
        }
        rules.insert(rule.id, rule.clone());
        Ok(rule)
    }

    async fn delete(&self, user_id: UserId, id: RecurringRuleId) -> Result<bool, StoreError> {
        let mut rules = self.rules.write().await;
        if rules.get(&id).is_some_and(|r| r.user_id == user_id) {
            rules.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn due_rules(&self, as_of: DateTime<Utc>) -> Result<Vec<RecurringRule>, StoreError> {
        let mut due: Vec<_> = self
            .rules
            .read()
            .await
            .values()
            .filter(|r| {
                r.is_active
                    && is_due(r.next_due_date, as_of.date_naive())
                    && r.end_date.is_none_or(|end| end >= as_of)
            })
            .cloned()
            .collect();
        due.sort_by_key(|r| r.next_due_date);
        Ok(due)
    }

    async fn upcoming(
        &self,
        user_id: UserId,
        range: &DateRange,
    ) -> Result<Vec<RecurringRule>, StoreError> {
        let mut rules: Vec<_> = self
            .rules
            .read()
            .await
            .values()
            .filter(|r| {
                r.user_id == user_id
                    && r.is_active
                    && range.contains(r.next_due_date)
                    && r.end_date.is_none_or(|end| end >= range.start)
            })
            .cloned()
            .collect();
        rules.sort_by_key(|r| r.next_due_date);
        Ok(rules)
    }

    async fn pending_reminders(&self) -> Result<Vec<RecurringRule>, StoreError> {
        Ok(self
            .rules
            .read()
            .await
            .values()
            .filter(|r| r.is_active && !r.reminder_sent)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use tally_core::period::Frequency;

    use super::*;

    fn rule(user_id: UserId, due: DateTime<Utc>, end: Option<DateTime<Utc>>) -> RecurringRule {
        let created = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
        RecurringRule {
            id: RecurringRuleId::new(),
            user_id,
            name: "Rent".to_string(),
            category: "Housing".to_string(),
            amount: dec!(850),
            is_income: false,
            frequency: Frequency::Monthly,
            start_date: created,
            end_date: end,
            next_due_date: due,
            is_active: true,
            last_generated: None,
            generated_count: 0,
            reminder_sent: false,
            description: String::new(),
            created_at: created,
            updated_at: created,
        }
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_due_rules_respects_end_date_and_activity() {
        let store = MemoryRuleStore::new();
        let user = UserId::new();

        let live = store.insert(rule(user, utc(2025, 1, 10), None)).await.unwrap();
        store
            .insert(rule(user, utc(2025, 1, 10), Some(utc(2025, 1, 1))))
            .await
            .unwrap();
        let mut paused = rule(user, utc(2025, 1, 10), None);
        paused.is_active = false;
        store.insert(paused).await.unwrap();
        store.insert(rule(user, utc(2025, 2, 1), None)).await.unwrap();

        let due = store.due_rules(utc(2025, 1, 15)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, live.id);
    }

    #[tokio::test]
    async fn test_due_rules_spans_users() {
        let store = MemoryRuleStore::new();
        store
            .insert(rule(UserId::new(), utc(2025, 1, 10), None))
            .await
            .unwrap();
        store
            .insert(rule(UserId::new(), utc(2025, 1, 12), None))
            .await
            .unwrap();

        let due = store.due_rules(utc(2025, 1, 15)).await.unwrap();
        assert_eq!(due.len(), 2);
        // Soonest first.
        assert!(due[0].next_due_date <= due[1].next_due_date);
    }

    #[tokio::test]
    async fn test_update_missing_rule_errors() {
        let store = MemoryRuleStore::new();
        let ghost = rule(UserId::new(), utc(2025, 1, 10), None);
        assert!(store.update(ghost).await.is_err());
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let store = MemoryRuleStore::new();
        let user = UserId::new();
        let stored = store.insert(rule(user, utc(2025, 1, 10), None)).await.unwrap();

        assert!(!store.delete(UserId::new(), stored.id).await.unwrap());
        assert!(store.delete(user, stored.id).await.unwrap());
        assert!(!store.delete(user, stored.id).await.unwrap());
    }
}
