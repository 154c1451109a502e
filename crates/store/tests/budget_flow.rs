//! Budget engine flows against the in-memory stores.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal_macros::dec;

use tally_core::budget::{
    BudgetError, BudgetFilter, BudgetService, CreateBudgetInput, SummaryFilter, UpdateBudgetPatch,
};
use tally_core::ledger::{LedgerStore, NewLedgerEntry};
use tally_core::period::{BudgetKind, BudgetPeriod};
use tally_shared::clock::ManualClock;
use tally_shared::error::AppError;
use tally_shared::types::UserId;
use tally_store::{MemoryBudgetStore, MemoryLedgerStore};

struct World {
    budgets: BudgetService<MemoryBudgetStore, MemoryLedgerStore, ManualClock>,
    ledger: Arc<MemoryLedgerStore>,
    user: UserId,
}

fn utc(y: i32, m: u32, d: u32, hh: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, hh, 0, 0).unwrap()
}

fn world(now: DateTime<Utc>) -> World {
    tally_shared::logging::init();

    let ledger = Arc::new(MemoryLedgerStore::new());
    let budgets = BudgetService::new(
        Arc::new(MemoryBudgetStore::new()),
        Arc::clone(&ledger),
        ManualClock::new(now),
    );
    World {
        budgets,
        ledger,
        user: UserId::new(),
    }
}

fn food_budget(amount: rust_decimal::Decimal, period: BudgetPeriod) -> CreateBudgetInput {
    CreateBudgetInput {
        category: "Food".to_string(),
        amount,
        period,
        alert_threshold: None,
        description: None,
    }
}

async fn spend(w: &World, category: &str, amount: rust_decimal::Decimal, on: DateTime<Utc>) {
    w.ledger
        .insert(NewLedgerEntry {
            user_id: w.user,
            name: format!("{category} purchase"),
            category: category.to_string(),
            amount,
            is_income: false,
            occurred_on: on,
            description: String::new(),
            is_generated: false,
            rule_id: None,
            occurrence: None,
        })
        .await
        .unwrap();
}

const MARCH: BudgetPeriod = BudgetPeriod::Monthly {
    month: 3,
    year: 2025,
};

#[tokio::test]
async fn test_duplicate_active_budget_conflicts_until_deactivated() {
    let w = world(utc(2025, 3, 1, 0));
    let first = w
        .budgets
        .create_budget(w.user, food_budget(dec!(300), MARCH))
        .await
        .unwrap();

    let err = w
        .budgets
        .create_budget(w.user, food_budget(dec!(400), MARCH))
        .await
        .unwrap_err();
    assert!(matches!(err, BudgetError::DuplicateBudget { .. }));
    assert_eq!(AppError::from(err).status_code(), 409);

    // Deactivate the first; the period frees up.
    w.budgets
        .update_budget(
            w.user,
            first.id,
            UpdateBudgetPatch {
                is_active: Some(false),
                ..UpdateBudgetPatch::default()
            },
        )
        .await
        .unwrap();

    assert!(
        w.budgets
            .create_budget(w.user, food_budget(dec!(400), MARCH))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_validation_rejections() {
    let w = world(utc(2025, 3, 1, 0));

    let mut nameless = food_budget(dec!(300), MARCH);
    nameless.category = String::new();
    assert!(matches!(
        w.budgets.create_budget(w.user, nameless).await.unwrap_err(),
        BudgetError::MissingField("category")
    ));

    assert!(matches!(
        w.budgets
            .create_budget(w.user, food_budget(dec!(-5), MARCH))
            .await
            .unwrap_err(),
        BudgetError::NegativeAmount
    ));

    let mut threshold = food_budget(dec!(300), MARCH);
    threshold.alert_threshold = Some(dec!(150));
    assert!(matches!(
        w.budgets.create_budget(w.user, threshold).await.unwrap_err(),
        BudgetError::InvalidThreshold
    ));

    let bad_month = food_budget(
        dec!(300),
        BudgetPeriod::Monthly {
            month: 13,
            year: 2025,
        },
    );
    assert!(matches!(
        w.budgets.create_budget(w.user, bad_month).await.unwrap_err(),
        BudgetError::Period(_)
    ));
}

#[tokio::test]
async fn test_spend_aggregation_excludes_deleted_and_out_of_period() {
    let w = world(utc(2025, 3, 14, 12));
    w.budgets
        .create_budget(w.user, food_budget(dec!(300), MARCH))
        .await
        .unwrap();

    spend(&w, "Food", dec!(100), utc(2025, 3, 5, 12)).await;
    spend(&w, "Food", dec!(50), utc(2025, 2, 27, 12)).await; // previous month
    spend(&w, "Transport", dec!(80), utc(2025, 3, 6, 12)).await; // other category

    // A deleted entry stops counting.
    spend(&w, "Food", dec!(70), utc(2025, 3, 7, 12)).await;
    let entries = w.ledger.dump().await;
    let doomed = entries.iter().find(|e| e.amount == dec!(70)).unwrap();
    assert!(w.ledger.soft_delete(w.user, doomed.id).await);

    let listed = w
        .budgets
        .list_with_status(w.user, &BudgetFilter::default())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].status.spent, dec!(100));
    assert_eq!(listed[0].status.remaining, dec!(200));
    assert_eq!(listed[0].status.percentage_used, dec!(33.33));
}

#[tokio::test]
async fn test_weekly_budget_uses_custom_week_bounds() {
    // 2024 week 1 is Mon Jan 1 through Sun Jan 7 (custom first-Monday scheme).
    let w = world(utc(2024, 1, 3, 0));
    w.budgets
        .create_budget(
            w.user,
            food_budget(
                dec!(100),
                BudgetPeriod::Weekly {
                    week: 1,
                    year: 2024,
                },
            ),
        )
        .await
        .unwrap();

    spend(&w, "Food", dec!(30), utc(2024, 1, 7, 23)).await; // last hours of the week
    spend(&w, "Food", dec!(40), utc(2024, 1, 8, 0)).await; // next week

    let listed = w
        .budgets
        .list_with_status(w.user, &BudgetFilter::default())
        .await
        .unwrap();
    assert_eq!(listed[0].status.spent, dec!(30));
}

#[tokio::test]
async fn test_summary_defaults_to_current_month() {
    let w = world(utc(2025, 3, 14, 9));
    w.budgets
        .create_budget(w.user, food_budget(dec!(300), MARCH))
        .await
        .unwrap();
    let mut rent = food_budget(dec!(850), MARCH);
    rent.category = "Rent".to_string();
    w.budgets.create_budget(w.user, rent).await.unwrap();

    // April budget must not leak into March's summary.
    w.budgets
        .create_budget(
            w.user,
            food_budget(
                dec!(999),
                BudgetPeriod::Monthly {
                    month: 4,
                    year: 2025,
                },
            ),
        )
        .await
        .unwrap();

    spend(&w, "Food", dec!(295), utc(2025, 3, 5, 12)).await;
    spend(&w, "Rent", dec!(850), utc(2025, 3, 1, 12)).await;

    let report = w
        .budgets
        .summary(w.user, &SummaryFilter::default())
        .await
        .unwrap();

    assert_eq!(report.period.kind, BudgetKind::Monthly);
    assert_eq!(report.period.month, 3);
    assert_eq!(report.period.year, 2025);

    assert_eq!(report.summary.total_budget, dec!(1150));
    assert_eq!(report.summary.total_spent, dec!(1145));
    assert_eq!(report.summary.total_remaining, dec!(5));
    assert_eq!(report.summary.overall_percentage_used, dec!(99.57));
    assert!(report.summary.is_near_limit);
    assert!(!report.summary.is_over_budget);

    assert_eq!(report.category_breakdown.len(), 2);
    // Food at 98.33% and Rent at 100% are both past their thresholds.
    assert_eq!(report.alerts.len(), 2);
}

#[tokio::test]
async fn test_summary_accepts_explicit_period() {
    let w = world(utc(2025, 6, 1, 0));
    w.budgets
        .create_budget(w.user, food_budget(dec!(300), MARCH))
        .await
        .unwrap();
    spend(&w, "Food", dec!(120), utc(2025, 3, 10, 12)).await;

    let report = w
        .budgets
        .summary(
            w.user,
            &SummaryFilter {
                month: Some(3),
                year: Some(2025),
                ..SummaryFilter::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(report.summary.total_spent, dec!(120));
    assert_eq!(report.summary.overall_percentage_used, dec!(40.00));
    assert!(report.alerts.is_empty());
}

#[tokio::test]
async fn test_summary_with_no_budgets_is_all_zero() {
    let w = world(utc(2025, 3, 1, 0));
    let report = w
        .budgets
        .summary(w.user, &SummaryFilter::default())
        .await
        .unwrap();

    assert_eq!(report.summary.total_budget, dec!(0));
    assert_eq!(report.summary.overall_percentage_used, dec!(0));
    assert!(report.category_breakdown.is_empty());
}

#[tokio::test]
async fn test_alert_surface_messages() {
    let w = world(utc(2025, 3, 14, 9));
    w.budgets
        .create_budget(w.user, food_budget(dec!(100), MARCH))
        .await
        .unwrap();
    let mut travel = food_budget(dec!(200), MARCH);
    travel.category = "Travel".to_string();
    w.budgets.create_budget(w.user, travel).await.unwrap();
    let mut quiet = food_budget(dec!(1000), MARCH);
    quiet.category = "Hobbies".to_string();
    w.budgets.create_budget(w.user, quiet).await.unwrap();

    spend(&w, "Food", dec!(120), utc(2025, 3, 5, 12)).await; // exceeded
    spend(&w, "Travel", dec!(170), utc(2025, 3, 6, 12)).await; // warning
    spend(&w, "Hobbies", dec!(10), utc(2025, 3, 7, 12)).await; // normal

    let alerts = w.budgets.alerts(w.user).await.unwrap();
    assert_eq!(alerts.len(), 2);

    let exceeded = alerts.iter().find(|a| a.category == "Food").unwrap();
    assert_eq!(exceeded.over_by, Some(dec!(20)));
    assert_eq!(exceeded.message, "Budget exceeded for Food by 20");
    assert_eq!(exceeded.period, "3/2025");

    let warning = alerts.iter().find(|a| a.category == "Travel").unwrap();
    assert_eq!(warning.remaining, Some(dec!(30)));
    assert_eq!(warning.message, "Budget warning: Travel is 85.0% used");
}

#[tokio::test]
async fn test_zero_ceiling_budget_never_emits_infinity() {
    let w = world(utc(2025, 3, 14, 9));
    w.budgets
        .create_budget(w.user, food_budget(dec!(0), MARCH))
        .await
        .unwrap();
    spend(&w, "Food", dec!(50), utc(2025, 3, 5, 12)).await;

    let listed = w
        .budgets
        .list_with_status(w.user, &BudgetFilter::default())
        .await
        .unwrap();
    assert_eq!(listed[0].status.percentage_used, dec!(0));
    assert!(listed[0].status.is_over_budget);

    let alerts = w.budgets.alerts(w.user).await.unwrap();
    assert_eq!(alerts[0].over_by, Some(dec!(50)));
}

#[tokio::test]
async fn test_get_update_delete_lifecycle() {
    let w = world(utc(2025, 3, 1, 0));
    let budget = w
        .budgets
        .create_budget(w.user, food_budget(dec!(300), MARCH))
        .await
        .unwrap();

    let fetched = w.budgets.get(w.user, budget.id).await.unwrap();
    assert_eq!(fetched.amount, dec!(300));
    assert_eq!(fetched.alert_threshold, dec!(80));

    let updated = w
        .budgets
        .update_budget(
            w.user,
            budget.id,
            UpdateBudgetPatch {
                amount: Some(dec!(350)),
                alert_threshold: Some(dec!(90)),
                description: Some("spring".to_string()),
                ..UpdateBudgetPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.amount, dec!(350));
    assert_eq!(updated.alert_threshold, dec!(90));

    w.budgets.delete_budget(w.user, budget.id).await.unwrap();
    let err = w.budgets.get(w.user, budget.id).await.unwrap_err();
    assert_eq!(AppError::from(err).status_code(), 404);
}

#[tokio::test]
async fn test_budgets_are_owner_scoped() {
    let w = world(utc(2025, 3, 1, 0));
    let budget = w
        .budgets
        .create_budget(w.user, food_budget(dec!(300), MARCH))
        .await
        .unwrap();

    let stranger = UserId::new();
    assert!(matches!(
        w.budgets.get(stranger, budget.id).await.unwrap_err(),
        BudgetError::NotFound(_)
    ));
}
