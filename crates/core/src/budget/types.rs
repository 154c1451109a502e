//! Budget data types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_shared::types::{BudgetId, UserId};

use crate::period::{BudgetKind, BudgetPeriod};

/// A spend ceiling for a category over one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owning user.
    pub user_id: UserId,
    /// Category the ceiling applies to.
    pub category: String,
    /// Ceiling amount. Zero is legal; status math zero-guards it.
    pub amount: Decimal,
    /// The period this budget covers.
    #[serde(flatten)]
    pub period: BudgetPeriod,
    /// Percentage of the ceiling at which a warning is raised.
    pub alert_threshold: Decimal,
    /// Inactive budgets are excluded from aggregation and uniqueness.
    pub is_active: bool,
    /// Free-text description.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a budget.
#[derive(Debug, Clone)]
pub struct CreateBudgetInput {
    /// Category the ceiling applies to.
    pub category: String,
    /// Ceiling amount.
    pub amount: Decimal,
    /// The period the budget covers.
    pub period: BudgetPeriod,
    /// Warning threshold percentage; defaults to 80.
    pub alert_threshold: Option<Decimal>,
    /// Optional description.
    pub description: Option<String>,
}

/// Partial update for a budget. The period is immutable; a different period
/// is a different budget record.
#[derive(Debug, Clone, Default)]
pub struct UpdateBudgetPatch {
    /// New ceiling amount.
    pub amount: Option<Decimal>,
    /// New warning threshold.
    pub alert_threshold: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Optional criteria for listing budgets.
#[derive(Debug, Clone, Default)]
pub struct BudgetFilter {
    /// Restrict to one period classification.
    pub kind: Option<BudgetKind>,
    /// Restrict to a month (monthly budgets).
    pub month: Option<u32>,
    /// Restrict to a week (weekly budgets).
    pub week: Option<u32>,
    /// Restrict to a year.
    pub year: Option<i32>,
}

impl BudgetFilter {
    /// Returns true if the period satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, period: &BudgetPeriod) -> bool {
        if self.kind.is_some_and(|k| k != period.kind()) {
            return false;
        }
        if self.year.is_some_and(|y| y != period.year()) {
            return false;
        }
        match *period {
            BudgetPeriod::Monthly { month, .. } => !self.month.is_some_and(|m| m != month),
            BudgetPeriod::Weekly { week, .. } => !self.week.is_some_and(|w| w != week),
        }
    }
}

/// Alert classification of a budget's spend level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Spend below the warning threshold.
    Normal,
    /// Spend at or past the warning threshold but within the ceiling.
    Warning,
    /// Spend past the ceiling.
    Exceeded,
}

/// Computed spend status for one budget.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetStatus {
    /// Total matching expense spend in the period.
    pub spent: Decimal,
    /// Ceiling minus spend; negative when exceeded.
    pub remaining: Decimal,
    /// Spend as a percentage of the ceiling, rounded to 2 decimals.
    /// Zero when the ceiling is zero.
    pub percentage_used: Decimal,
    /// True when spend exceeds the ceiling.
    pub is_over_budget: bool,
    /// True when the percentage has reached the alert threshold.
    pub is_near_limit: bool,
    /// Combined classification.
    pub alert_status: AlertStatus,
}

/// A budget annotated with its computed status.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetWithStatus {
    /// The budget record.
    #[serde(flatten)]
    pub budget: Budget,
    /// Its computed status.
    #[serde(flatten)]
    pub status: BudgetStatus,
}

/// Period criteria for the dashboard summary; unset fields default to the
/// current period.
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    /// Period classification; defaults to monthly.
    pub kind: Option<BudgetKind>,
    /// Target month; defaults to the current month.
    pub month: Option<u32>,
    /// Target week; defaults to the current ISO week.
    pub week: Option<u32>,
    /// Target year; defaults to the current year.
    pub year: Option<i32>,
}

/// The period a summary was computed for.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryPeriod {
    /// Period classification.
    pub kind: BudgetKind,
    /// Resolved target month.
    pub month: u32,
    /// Resolved target week.
    pub week: u32,
    /// Resolved target year.
    pub year: i32,
}

/// Aggregate totals across all budgets in a summary.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryTotals {
    /// Sum of ceilings.
    pub total_budget: Decimal,
    /// Sum of spend.
    pub total_spent: Decimal,
    /// Ceilings minus spend.
    pub total_remaining: Decimal,
    /// Spend as a percentage of total ceiling, zero-guarded.
    pub overall_percentage_used: Decimal,
    /// True when total spend exceeds the total ceiling.
    pub is_over_budget: bool,
    /// True when overall usage has reached 80 percent.
    pub is_near_limit: bool,
}

/// Per-category line of a summary.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryBreakdown {
    /// Category name.
    pub category: String,
    /// Ceiling for the category.
    pub budget_amount: Decimal,
    /// Spend in the period.
    pub spent: Decimal,
    /// Ceiling minus spend.
    pub remaining: Decimal,
    /// Spend percentage, zero-guarded.
    pub percentage_used: Decimal,
    /// True when over the ceiling.
    pub is_over_budget: bool,
    /// True when at or past the alert threshold.
    pub is_near_limit: bool,
    /// Combined classification.
    pub alert_status: AlertStatus,
}

/// Dashboard summary for one period.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetSummaryReport {
    /// The period the summary covers.
    pub period: SummaryPeriod,
    /// Aggregate totals.
    pub summary: SummaryTotals,
    /// Per-category lines.
    pub category_breakdown: Vec<CategoryBreakdown>,
    /// Breakdown lines whose status is not normal.
    pub alerts: Vec<CategoryBreakdown>,
}
