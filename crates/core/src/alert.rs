//! Alert derivation from budget status.
//!
//! Thin surface between the budget engine and notification/UI collaborators:
//! turns a statused budget into at most one alert object with a
//! human-readable message. Nothing here is persisted; alerts are recomputed
//! on every poll.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::budget::{AlertStatus, BudgetWithStatus};
use crate::period::BudgetKind;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Spend has passed the ceiling.
    Exceeded,
    /// Spend has reached the warning threshold.
    Warning,
}

/// One alert for one budget.
#[derive(Debug, Clone, Serialize)]
pub struct BudgetAlert {
    /// Severity.
    pub kind: AlertKind,
    /// Category of the budget.
    pub category: String,
    /// The budget's ceiling.
    pub budget_amount: Decimal,
    /// Spend in the period.
    pub spent: Decimal,
    /// Amount over the ceiling; exceeded alerts only.
    pub over_by: Option<Decimal>,
    /// Amount left under the ceiling; warning alerts only.
    pub remaining: Option<Decimal>,
    /// Spend percentage of the ceiling.
    pub percentage_used: Decimal,
    /// Human-readable message.
    pub message: String,
    /// Period classification of the budget.
    pub budget_kind: BudgetKind,
    /// Human-readable period label.
    pub period: String,
}

/// Derives an alert from a statused budget; `None` for normal status.
#[must_use]
pub fn derive(item: &BudgetWithStatus) -> Option<BudgetAlert> {
    let budget = &item.budget;
    let status = &item.status;

    match status.alert_status {
        AlertStatus::Normal => None,
        AlertStatus::Exceeded => {
            let over_by = (status.spent - budget.amount).round_dp(2);
            Some(BudgetAlert {
                kind: AlertKind::Exceeded,
                category: budget.category.clone(),
                budget_amount: budget.amount,
                spent: status.spent,
                over_by: Some(over_by),
                remaining: None,
                percentage_used: status.percentage_used,
                message: format!("Budget exceeded for {} by {over_by}", budget.category),
                budget_kind: budget.period.kind(),
                period: budget.period.label(),
            })
        }
        AlertStatus::Warning => Some(BudgetAlert {
            kind: AlertKind::Warning,
            category: budget.category.clone(),
            budget_amount: budget.amount,
            spent: status.spent,
            over_by: None,
            remaining: Some(status.remaining),
            percentage_used: status.percentage_used,
            message: format!(
                "Budget warning: {} is {}% used",
                budget.category,
                status.percentage_used.round_dp(1)
            ),
            budget_kind: budget.period.kind(),
            period: budget.period.label(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use tally_shared::types::{BudgetId, UserId};

    use super::*;
    use crate::budget::{Budget, compute_status};
    use crate::period::BudgetPeriod;

    fn statused(amount: Decimal, spent: Decimal) -> BudgetWithStatus {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let budget = Budget {
            id: BudgetId::new(),
            user_id: UserId::new(),
            category: "Food".to_string(),
            amount,
            period: BudgetPeriod::Monthly {
                month: 3,
                year: 2025,
            },
            alert_threshold: dec!(80),
            is_active: true,
            description: String::new(),
            created_at: now,
            updated_at: now,
        };
        let status = compute_status(budget.amount, budget.alert_threshold, spent);
        BudgetWithStatus { budget, status }
    }

    #[test]
    fn test_normal_budget_yields_no_alert() {
        assert!(derive(&statused(dec!(100), dec!(40))).is_none());
    }

    #[test]
    fn test_exceeded_alert_carries_overage() {
        let alert = derive(&statused(dec!(100), dec!(120))).unwrap();
        assert_eq!(alert.kind, AlertKind::Exceeded);
        assert_eq!(alert.over_by, Some(dec!(20)));
        assert_eq!(alert.remaining, None);
        assert_eq!(alert.message, "Budget exceeded for Food by 20");
        assert_eq!(alert.period, "3/2025");
    }

    #[test]
    fn test_warning_alert_carries_remaining() {
        let alert = derive(&statused(dec!(100), dec!(85))).unwrap();
        assert_eq!(alert.kind, AlertKind::Warning);
        assert_eq!(alert.over_by, None);
        assert_eq!(alert.remaining, Some(dec!(15)));
        assert_eq!(alert.message, "Budget warning: Food is 85.0% used");
    }

    #[test]
    fn test_weekly_period_label() {
        let mut item = statused(dec!(100), dec!(120));
        item.budget.period = BudgetPeriod::Weekly {
            week: 12,
            year: 2025,
        };
        let alert = derive(&item).unwrap();
        assert_eq!(alert.budget_kind, BudgetKind::Weekly);
        assert_eq!(alert.period, "Week 12, 2025");
    }
}
