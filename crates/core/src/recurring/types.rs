//! Recurring rule data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{RecurringRuleId, UserId};

use crate::ledger::LedgerEntry;
use crate::period::Frequency;

/// A template that generates ledger entries on a cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringRule {
    /// Rule ID.
    pub id: RecurringRuleId,
    /// Owning user.
    pub user_id: UserId,
    /// Display name, copied onto generated entries.
    pub name: String,
    /// Category, copied onto generated entries.
    pub category: String,
    /// Amount per occurrence; always positive.
    pub amount: Decimal,
    /// True for income, false for expense.
    pub is_income: bool,
    /// Recurrence cadence.
    pub frequency: Frequency,
    /// First anchor of the schedule.
    pub start_date: DateTime<Utc>,
    /// Optional end bound; no occurrences are generated past it.
    pub end_date: Option<DateTime<Utc>>,
    /// Next occurrence to generate. Advanced only by the scheduler.
    pub next_due_date: DateTime<Utc>,
    /// Paused rules are skipped by the scheduler without due-date drift.
    pub is_active: bool,
    /// Due date of the most recently generated occurrence.
    pub last_generated: Option<DateTime<Utc>>,
    /// Number of occurrences generated so far; monotonic.
    pub generated_count: u32,
    /// Latch preventing duplicate reminders for one occurrence.
    pub reminder_sent: bool,
    /// Free-text description, copied onto generated entries when present.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a recurring rule.
#[derive(Debug, Clone)]
pub struct CreateRuleInput {
    /// Display name.
    pub name: String,
    /// Category label.
    pub category: String,
    /// Amount per occurrence.
    pub amount: Decimal,
    /// True for income, false for expense.
    pub is_income: bool,
    /// Recurrence cadence.
    pub frequency: Frequency,
    /// First anchor of the schedule.
    pub start_date: DateTime<Utc>,
    /// Optional end bound.
    pub end_date: Option<DateTime<Utc>>,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial update for a recurring rule.
///
/// `end_date` is doubly optional: `None` leaves it untouched, `Some(None)`
/// clears it.
#[derive(Debug, Clone, Default)]
pub struct UpdateRulePatch {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New income/expense flag.
    pub is_income: Option<bool>,
    /// New cadence; triggers a schedule re-anchor.
    pub frequency: Option<Frequency>,
    /// New schedule anchor; triggers a schedule re-anchor.
    pub start_date: Option<DateTime<Utc>>,
    /// New end bound.
    pub end_date: Option<Option<DateTime<Utc>>>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Counters from one generation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleOutcome {
    /// Rules selected as due.
    pub scanned: usize,
    /// Entries created this cycle.
    pub generated: usize,
    /// Occurrences already present; state advanced without a new entry.
    pub skipped: usize,
    /// Rules that errored and were left unadvanced for the next cycle.
    pub failed: usize,
}

impl CycleOutcome {
    /// Returns true if the cycle found nothing to do.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.scanned == 0
    }
}

/// A derived due-soon notification for one upcoming occurrence.
#[derive(Debug, Clone, Serialize)]
pub struct Reminder {
    /// The rule the reminder is for.
    pub rule_id: RecurringRuleId,
    /// Owning user.
    pub user_id: UserId,
    /// Rule display name.
    pub name: String,
    /// Amount of the upcoming occurrence.
    pub amount: Decimal,
    /// When the occurrence is due.
    pub due_date: DateTime<Utc>,
}

/// A rule together with its generation history.
#[derive(Debug, Clone, Serialize)]
pub struct RuleHistory {
    /// The rule itself.
    pub rule: RecurringRule,
    /// Generated entries, most recent occurrence first.
    pub entries: Vec<LedgerEntry>,
    /// Number of entries returned.
    pub total_generated: usize,
}
