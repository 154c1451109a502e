//! Budget aggregation engine.
//!
//! Computes spend-to-date per budget by summing matching ledger entries over
//! the budget's period, classifies the result against the alert threshold,
//! and rolls budgets up into the dashboard summary.

use std::sync::Arc;

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tally_shared::clock::Clock;
use tally_shared::types::{BudgetId, UserId};

use super::error::BudgetError;
use super::store::BudgetStore;
use super::types::{
    AlertStatus, Budget, BudgetFilter, BudgetStatus, BudgetSummaryReport, BudgetWithStatus,
    CategoryBreakdown, CreateBudgetInput, SummaryFilter, SummaryPeriod, SummaryTotals,
    UpdateBudgetPatch,
};
use crate::ledger::LedgerStore;
use crate::period::{BudgetKind, iso_week_number};

/// Warning threshold applied to summary-level totals. Individual budgets
/// carry their own threshold; the aggregate has none to borrow.
const OVERALL_NEAR_LIMIT_THRESHOLD: Decimal = dec!(80);

/// Default per-budget alert threshold.
const DEFAULT_ALERT_THRESHOLD: Decimal = dec!(80);

/// Classifies spend against a ceiling and threshold.
///
/// A zero ceiling yields `percentage_used = 0` by convention so the result
/// never carries a division artifact; overspend against a zero ceiling still
/// classifies as exceeded via the amount comparison.
#[must_use]
pub fn compute_status(amount: Decimal, alert_threshold: Decimal, spent: Decimal) -> BudgetStatus {
    let remaining = amount - spent;
    let percentage_used = if amount.is_zero() {
        Decimal::ZERO
    } else {
        (spent / amount * Decimal::ONE_HUNDRED).round_dp(2)
    };
    let is_over_budget = spent > amount;
    let is_near_limit = percentage_used >= alert_threshold;

    let alert_status = if is_over_budget {
        AlertStatus::Exceeded
    } else if is_near_limit {
        AlertStatus::Warning
    } else {
        AlertStatus::Normal
    };

    BudgetStatus {
        spent,
        remaining,
        percentage_used,
        is_over_budget,
        is_near_limit,
        alert_status,
    }
}

/// Budget engine over injected stores and clock.
pub struct BudgetService<B, L, C> {
    budgets: Arc<B>,
    ledger: Arc<L>,
    clock: C,
}

impl<B, L, C> BudgetService<B, L, C>
where
    B: BudgetStore,
    L: LedgerStore,
    C: Clock,
{
    /// Creates a budget engine.
    pub fn new(budgets: Arc<B>, ledger: Arc<L>, clock: C) -> Self {
        Self {
            budgets,
            ledger,
            clock,
        }
    }

    /// Creates a budget after validating fields and period uniqueness.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateBudget` when an active budget already covers the
    /// same (category, period) for this user.
    pub async fn create_budget(
        &self,
        user_id: UserId,
        input: CreateBudgetInput,
    ) -> Result<Budget, BudgetError> {
        if input.category.is_empty() {
            return Err(BudgetError::MissingField("category"));
        }
        if input.amount < Decimal::ZERO {
            return Err(BudgetError::NegativeAmount);
        }
        let alert_threshold = input.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD);
        if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&alert_threshold) {
            return Err(BudgetError::InvalidThreshold);
        }
        input.period.validate()?;

        if self
            .budgets
            .find_active_for_period(user_id, &input.category, &input.period)
            .await?
            .is_some()
        {
            return Err(BudgetError::DuplicateBudget {
                category: input.category,
                kind: input.period.kind(),
            });
        }

        let now = self.clock.now();
        let budget = Budget {
            id: BudgetId::new(),
            user_id,
            category: input.category,
            amount: input.amount,
            period: input.period,
            alert_threshold,
            is_active: true,
            description: input.description.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        Ok(self.budgets.insert(budget).await?)
    }

    /// Returns a budget by id.
    pub async fn get(&self, user_id: UserId, id: BudgetId) -> Result<Budget, BudgetError> {
        self.budgets
            .find(user_id, id)
            .await?
            .ok_or(BudgetError::NotFound(id))
    }

    /// Applies a partial update to a budget.
    pub async fn update_budget(
        &self,
        user_id: UserId,
        id: BudgetId,
        patch: UpdateBudgetPatch,
    ) -> Result<Budget, BudgetError> {
        let mut budget = self
            .budgets
            .find(user_id, id)
            .await?
            .ok_or(BudgetError::NotFound(id))?;

        if let Some(amount) = patch.amount {
            if amount < Decimal::ZERO {
                return Err(BudgetError::NegativeAmount);
            }
            budget.amount = amount;
        }
        if let Some(threshold) = patch.alert_threshold {
            if !(Decimal::ZERO..=Decimal::ONE_HUNDRED).contains(&threshold) {
                return Err(BudgetError::InvalidThreshold);
            }
            budget.alert_threshold = threshold;
        }
        if let Some(description) = patch.description {
            budget.description = description;
        }
        if let Some(is_active) = patch.is_active {
            budget.is_active = is_active;
        }

        budget.updated_at = self.clock.now();
        Ok(self.budgets.update(budget).await?)
    }

    /// Removes a budget.
    pub async fn delete_budget(&self, user_id: UserId, id: BudgetId) -> Result<(), BudgetError> {
        if self.budgets.delete(user_id, id).await? {
            Ok(())
        } else {
            Err(BudgetError::NotFound(id))
        }
    }

    /// Computes the spend status of one budget.
    pub async fn status_for(&self, budget: Budget) -> Result<BudgetWithStatus, BudgetError> {
        let range = budget.period.bounds()?;
        let spent = self
            .ledger
            .sum_expenses(budget.user_id, &budget.category, &range)
            .await?;
        let status = compute_status(budget.amount, budget.alert_threshold, spent);
        Ok(BudgetWithStatus { budget, status })
    }

    /// Returns the user's active budgets with computed status, the bulk read
    /// path behind the budget list view.
    pub async fn list_with_status(
        &self,
        user_id: UserId,
        filter: &BudgetFilter,
    ) -> Result<Vec<BudgetWithStatus>, BudgetError> {
        let budgets = self.budgets.list_active(user_id, filter).await?;
        let mut out = Vec::with_capacity(budgets.len());
        for budget in budgets {
            out.push(self.status_for(budget).await?);
        }
        Ok(out)
    }

    /// Builds the dashboard summary for one period, defaulting unspecified
    /// period fields to "current".
    ///
    /// The current week defaults via ISO week numbering, which is not the
    /// scheme `week_range` uses to resolve weekly bounds; see the period
    /// module for why both exist.
    pub async fn summary(
        &self,
        user_id: UserId,
        filter: &SummaryFilter,
    ) -> Result<BudgetSummaryReport, BudgetError> {
        let now = self.clock.now();
        let kind = filter.kind.unwrap_or(BudgetKind::Monthly);
        let month = filter.month.unwrap_or(now.month());
        let year = filter.year.unwrap_or(now.year());
        let week = filter.week.unwrap_or_else(|| iso_week_number(now.date_naive()));

        let list_filter = match kind {
            BudgetKind::Monthly => BudgetFilter {
                kind: Some(kind),
                month: Some(month),
                year: Some(year),
                week: None,
            },
            BudgetKind::Weekly => BudgetFilter {
                kind: Some(kind),
                week: Some(week),
                year: Some(year),
                month: None,
            },
        };

        let statused = self.list_with_status(user_id, &list_filter).await?;

        let mut total_budget = Decimal::ZERO;
        let mut total_spent = Decimal::ZERO;
        let mut category_breakdown = Vec::with_capacity(statused.len());

        for item in statused {
            total_budget += item.budget.amount;
            total_spent += item.status.spent;
            category_breakdown.push(CategoryBreakdown {
                category: item.budget.category,
                budget_amount: item.budget.amount,
                spent: item.status.spent,
                remaining: item.status.remaining,
                percentage_used: item.status.percentage_used,
                is_over_budget: item.status.is_over_budget,
                is_near_limit: item.status.is_near_limit,
                alert_status: item.status.alert_status,
            });
        }

        let overall_percentage_used = if total_budget.is_zero() {
            Decimal::ZERO
        } else {
            (total_spent / total_budget * Decimal::ONE_HUNDRED).round_dp(2)
        };

        let alerts = category_breakdown
            .iter()
            .filter(|line| line.alert_status != AlertStatus::Normal)
            .cloned()
            .collect();

        Ok(BudgetSummaryReport {
            period: SummaryPeriod {
                kind,
                month,
                week,
                year,
            },
            summary: SummaryTotals {
                total_budget,
                total_spent,
                total_remaining: total_budget - total_spent,
                overall_percentage_used,
                is_over_budget: total_spent > total_budget,
                is_near_limit: overall_percentage_used >= OVERALL_NEAR_LIMIT_THRESHOLD,
            },
            category_breakdown,
            alerts,
        })
    }

    /// Derives the alert list across all of the user's active budgets, any
    /// period. Recomputed on every call; nothing is persisted, so dedup
    /// across polling cycles belongs to the caller.
    pub async fn alerts(
        &self,
        user_id: UserId,
    ) -> Result<Vec<crate::alert::BudgetAlert>, BudgetError> {
        let statused = self
            .list_with_status(user_id, &BudgetFilter::default())
            .await?;
        Ok(statused
            .iter()
            .filter_map(crate::alert::derive)
            .collect())
    }
}
