//! Recurrence scheduling engine.
//!
//! Turns due recurring rules into ledger entries exactly once per occurrence
//! and advances rule state monotonically. The cycle is driven by an external
//! timer; invoking it more often than rules come due is a no-op.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use tally_shared::clock::Clock;
use tally_shared::config::SchedulerConfig;
use tally_shared::types::{RecurringRuleId, UserId};

use super::error::RecurringError;
use super::store::RecurringRuleStore;
use super::types::{
    CreateRuleInput, CycleOutcome, RecurringRule, Reminder, RuleHistory, UpdateRulePatch,
};
use crate::ledger::{EntryFilter, LedgerStore, NewLedgerEntry};
use crate::period::{self, DateRange};

/// Recurrence scheduler over injected stores and clock.
pub struct RecurringService<R, L, C> {
    rules: Arc<R>,
    ledger: Arc<L>,
    clock: C,
    config: SchedulerConfig,
}

impl<R, L, C> RecurringService<R, L, C>
where
    R: RecurringRuleStore,
    L: LedgerStore,
    C: Clock,
{
    /// Creates a scheduler with default configuration.
    pub fn new(rules: Arc<R>, ledger: Arc<L>, clock: C) -> Self {
        Self::with_config(rules, ledger, clock, SchedulerConfig::default())
    }

    /// Creates a scheduler with explicit configuration.
    pub fn with_config(rules: Arc<R>, ledger: Arc<L>, clock: C, config: SchedulerConfig) -> Self {
        Self {
            rules,
            ledger,
            clock,
            config,
        }
    }

    /// Creates a recurring rule and initializes its schedule.
    ///
    /// The first due date is one frequency step after the start date.
    ///
    /// # Errors
    ///
    /// Returns a validation error for empty name/category, non-positive
    /// amount, or an end date before the start date.
    pub async fn create_rule(
        &self,
        user_id: UserId,
        input: CreateRuleInput,
    ) -> Result<RecurringRule, RecurringError> {
        if input.name.is_empty() {
            return Err(RecurringError::MissingField("name"));
        }
        if input.category.is_empty() {
            return Err(RecurringError::MissingField("category"));
        }
        if input.amount <= Decimal::ZERO {
            return Err(RecurringError::NonPositiveAmount);
        }
        if let Some(end) = input.end_date
            && end < input.start_date
        {
            return Err(RecurringError::EndBeforeStart);
        }

        let next_due_date = period::next_due_date(input.start_date, input.frequency)?;
        let now = self.clock.now();

        let rule = RecurringRule {
            id: RecurringRuleId::new(),
            user_id,
            name: input.name,
            category: input.category,
            amount: input.amount,
            is_income: input.is_income,
            frequency: input.frequency,
            start_date: input.start_date,
            end_date: input.end_date,
            next_due_date,
            is_active: true,
            last_generated: None,
            generated_count: 0,
            reminder_sent: false,
            description: input.description.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        Ok(self.rules.insert(rule).await?)
    }

    /// Returns all of the user's rules.
    pub async fn list_rules(&self, user_id: UserId) -> Result<Vec<RecurringRule>, RecurringError> {
        Ok(self.rules.list(user_id).await?)
    }

    /// Applies a partial update to a rule.
    ///
    /// Patching `start_date` or `frequency` re-anchors the schedule: the next
    /// due date is recomputed from the effective new values, discarding
    /// whatever position the old schedule had reached.
    pub async fn update_rule(
        &self,
        user_id: UserId,
        id: RecurringRuleId,
        patch: UpdateRulePatch,
    ) -> Result<RecurringRule, RecurringError> {
        let mut rule = self
            .rules
            .find(user_id, id)
            .await?
            .ok_or(RecurringError::NotFound(id))?;

        if let Some(amount) = patch.amount {
            if amount <= Decimal::ZERO {
                return Err(RecurringError::NonPositiveAmount);
            }
            rule.amount = amount;
        }
        if let Some(name) = patch.name {
            if name.is_empty() {
                return Err(RecurringError::MissingField("name"));
            }
            rule.name = name;
        }
        if let Some(category) = patch.category {
            if category.is_empty() {
                return Err(RecurringError::MissingField("category"));
            }
            rule.category = category;
        }
        if let Some(is_income) = patch.is_income {
            rule.is_income = is_income;
        }
        if let Some(description) = patch.description {
            rule.description = description;
        }
        if let Some(end_date) = patch.end_date {
            rule.end_date = end_date;
        }
        if let Some(is_active) = patch.is_active {
            rule.is_active = is_active;
        }

        if patch.start_date.is_some() || patch.frequency.is_some() {
            rule.start_date = patch.start_date.unwrap_or(rule.start_date);
            rule.frequency = patch.frequency.unwrap_or(rule.frequency);
            rule.next_due_date = period::next_due_date(rule.start_date, rule.frequency)?;
        }

        if let Some(end) = rule.end_date
            && end < rule.start_date
        {
            return Err(RecurringError::EndBeforeStart);
        }

        rule.updated_at = self.clock.now();
        Ok(self.rules.update(rule).await?)
    }

    /// Removes a rule. Entries it generated remain in the ledger.
    pub async fn delete_rule(
        &self,
        user_id: UserId,
        id: RecurringRuleId,
    ) -> Result<(), RecurringError> {
        if self.rules.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(RecurringError::NotFound(id))
        }
    }

    /// Pauses or resumes a rule.
    ///
    /// Only the flag changes; `next_due_date` is never touched. A rule
    /// resumed after several missed due dates catches up one occurrence per
    /// cycle from wherever the schedule stopped.
    pub async fn toggle_active(
        &self,
        user_id: UserId,
        id: RecurringRuleId,
        active: bool,
    ) -> Result<RecurringRule, RecurringError> {
        let mut rule = self
            .rules
            .find(user_id, id)
            .await?
            .ok_or(RecurringError::NotFound(id))?;

        rule.is_active = active;
        rule.updated_at = self.clock.now();
        Ok(self.rules.update(rule).await?)
    }

    /// Returns the user's active rules due within the lookahead window,
    /// soonest first.
    pub async fn list_upcoming(
        &self,
        user_id: UserId,
        within_days: Option<i64>,
    ) -> Result<Vec<RecurringRule>, RecurringError> {
        let days = within_days.unwrap_or(self.config.upcoming_window_days);
        let now = self.clock.now();
        let range = DateRange::new(now, now + Duration::days(days));
        Ok(self.rules.upcoming(user_id, &range).await?)
    }

    /// Returns a rule and the entries it generated, most recent first.
    pub async fn history(
        &self,
        user_id: UserId,
        id: RecurringRuleId,
    ) -> Result<RuleHistory, RecurringError> {
        let rule = self
            .rules
            .find(user_id, id)
            .await?
            .ok_or(RecurringError::NotFound(id))?;

        let mut entries = self.ledger.find_by_rule(user_id, id).await?;
        entries.sort_by(|a, b| b.occurred_on.cmp(&a.occurred_on));
        let total_generated = entries.len();

        Ok(RuleHistory {
            rule,
            entries,
            total_generated,
        })
    }

    /// Runs one generation cycle: selects due rules and generates the single
    /// pending occurrence of each.
    ///
    /// Rules are processed independently; a failing rule is logged, counted,
    /// and left unadvanced so the next cycle retries it. Re-invoking the
    /// cycle before anything new comes due is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a store error only if the due-rule scan itself fails;
    /// per-rule failures never abort the cycle.
    pub async fn run_generation_cycle(&self) -> Result<CycleOutcome, RecurringError> {
        let today = self.start_of_today();
        let due = self.rules.due_rules(today).await?;

        let mut outcome = CycleOutcome {
            scanned: due.len(),
            ..CycleOutcome::default()
        };
        debug!(due = due.len(), %today, "generation cycle start");

        for rule in due {
            match self.generate_for_rule(&rule).await {
                Ok(true) => outcome.generated += 1,
                Ok(false) => outcome.skipped += 1,
                Err(err) => {
                    warn!(rule_id = %rule.id, name = %rule.name, error = %err,
                        "rule generation failed; will retry next cycle");
                    outcome.failed += 1;
                }
            }
        }

        info!(
            scanned = outcome.scanned,
            generated = outcome.generated,
            skipped = outcome.skipped,
            failed = outcome.failed,
            "generation cycle complete"
        );
        Ok(outcome)
    }

    /// Scans for occurrences entering their reminder window and emits one
    /// reminder each, latching `reminder_sent` so a later scan stays quiet.
    ///
    /// Delivery is a collaborator concern; this only derives the list.
    pub async fn send_due_reminders(&self) -> Result<Vec<Reminder>, RecurringError> {
        let today = self.clock.today();
        let candidates = self.rules.pending_reminders().await?;

        let mut reminders = Vec::new();
        for mut rule in candidates {
            if !period::is_reminder_due(rule.next_due_date, today, self.config.reminder_days) {
                continue;
            }

            rule.reminder_sent = true;
            rule.updated_at = self.clock.now();
            // Latch first: if the update fails the reminder is not emitted
            // and the next scan retries.
            match self.rules.update(rule.clone()).await {
                Ok(saved) => reminders.push(Reminder {
                    rule_id: saved.id,
                    user_id: saved.user_id,
                    name: saved.name,
                    amount: saved.amount,
                    due_date: saved.next_due_date,
                }),
                Err(err) => {
                    warn!(rule_id = %rule.id, error = %err, "reminder latch failed; skipping");
                }
            }
        }

        Ok(reminders)
    }

    /// Generates the pending occurrence of one rule.
    ///
    /// Returns true if an entry was created, false if the occurrence already
    /// existed and only the schedule was advanced.
    async fn generate_for_rule(&self, rule: &RecurringRule) -> Result<bool, RecurringError> {
        let due_on = rule.next_due_date;
        let window = DateRange::new(due_on - Duration::days(1), due_on + Duration::days(1));

        if self.occurrence_exists(rule, &window).await? {
            debug!(rule_id = %rule.id, %due_on, "occurrence already present; advancing only");
            self.advance_schedule(rule.clone()).await?;
            return Ok(false);
        }

        let description = if rule.description.is_empty() {
            format!("Auto-generated from recurring: {}", rule.name)
        } else {
            rule.description.clone()
        };

        let entry = NewLedgerEntry {
            user_id: rule.user_id,
            name: rule.name.clone(),
            category: rule.category.clone(),
            amount: rule.amount,
            is_income: rule.is_income,
            occurred_on: due_on,
            description,
            is_generated: true,
            rule_id: Some(rule.id),
            occurrence: Some(due_on),
        };

        // Entry first: if the rule update below fails, the next cycle finds
        // this entry through the duplicate check and repairs the schedule.
        self.ledger.insert(entry).await?;
        debug!(rule_id = %rule.id, name = %rule.name, amount = %rule.amount, %due_on,
            "generated entry");

        self.advance_schedule(rule.clone()).await?;
        Ok(true)
    }

    /// Checks whether the pending occurrence already has a ledger entry.
    ///
    /// Matches the explicit `(rule_id, occurrence)` key first; falls back to
    /// the name/category/amount/flag heuristic within the ±1-day window for
    /// entries predating the key. The heuristic is best-effort: a hand-entered
    /// twin of the occurrence also satisfies it.
    async fn occurrence_exists(
        &self,
        rule: &RecurringRule,
        window: &DateRange,
    ) -> Result<bool, RecurringError> {
        let keyed = EntryFilter {
            rule_id: Some(rule.id),
            range: Some(*window),
            include_deleted: true,
            ..EntryFilter::default()
        };
        if !self.ledger.find(rule.user_id, &keyed).await?.is_empty() {
            return Ok(true);
        }

        let heuristic = EntryFilter {
            name: Some(rule.name.clone()),
            category: Some(rule.category.clone()),
            amount: Some(rule.amount),
            is_income: Some(rule.is_income),
            range: Some(*window),
            include_deleted: true,
            ..EntryFilter::default()
        };
        Ok(!self.ledger.find(rule.user_id, &heuristic).await?.is_empty())
    }

    /// Advances a rule past its current due date.
    ///
    /// The next due date steps from the previous due date, not from "now",
    /// so a late-running cycle never drifts the cadence.
    async fn advance_schedule(&self, mut rule: RecurringRule) -> Result<(), RecurringError> {
        let old_due = rule.next_due_date;
        rule.next_due_date = period::next_due_date(old_due, rule.frequency)?;
        rule.last_generated = Some(old_due);
        rule.generated_count += 1;
        rule.reminder_sent = false;
        rule.updated_at = self.clock.now();
        self.rules.update(rule).await?;
        Ok(())
    }

    /// The current UTC date at midnight, the scheduler's notion of "now".
    fn start_of_today(&self) -> DateTime<Utc> {
        self.clock.today().and_time(NaiveTime::MIN).and_utc()
    }
}
