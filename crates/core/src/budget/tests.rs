//! Property-based tests for budget status classification.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::compute_status;
use super::types::AlertStatus;

proptest! {
    /// A zero ceiling never produces a division artifact: percentage is zero
    /// for any spend.
    #[test]
    fn test_zero_ceiling_percentage_is_zero(spent in 0i64..1_000_000_000) {
        let status = compute_status(Decimal::ZERO, dec!(80), Decimal::from(spent));
        prop_assert_eq!(status.percentage_used, Decimal::ZERO);
    }

    /// With a positive ceiling the percentage follows the rounded formula.
    #[test]
    fn test_percentage_formula(
        amount in 1i64..1_000_000_000,
        spent in 0i64..1_000_000_000,
    ) {
        let amount = Decimal::from(amount);
        let spent = Decimal::from(spent);

        let status = compute_status(amount, dec!(80), spent);

        let expected = (spent / amount * Decimal::ONE_HUNDRED).round_dp(2);
        prop_assert_eq!(status.percentage_used, expected);
    }

    /// Remaining is always ceiling minus spend, sign included.
    #[test]
    fn test_remaining_is_signed_difference(
        amount in 0i64..1_000_000_000,
        spent in 0i64..1_000_000_000,
    ) {
        let amount = Decimal::from(amount);
        let spent = Decimal::from(spent);

        let status = compute_status(amount, dec!(80), spent);
        prop_assert_eq!(status.remaining, amount - spent);
    }

    /// Exceeded exactly when spend is strictly over the ceiling; spending the
    /// ceiling to the last unit is a warning at most.
    #[test]
    fn test_exceeded_iff_strictly_over(
        amount in 0i64..1_000_000_000,
        spent in 0i64..1_000_000_000,
    ) {
        let amount = Decimal::from(amount);
        let spent = Decimal::from(spent);

        let status = compute_status(amount, dec!(80), spent);

        prop_assert_eq!(status.is_over_budget, spent > amount);
        if spent > amount {
            prop_assert_eq!(status.alert_status, AlertStatus::Exceeded);
        } else {
            prop_assert_ne!(status.alert_status, AlertStatus::Exceeded);
        }
    }

    /// Warning exactly when within the ceiling but at or past the threshold.
    #[test]
    fn test_warning_follows_threshold(
        amount in 1i64..1_000_000,
        spent in 0i64..1_000_000,
        threshold in 0i64..=100,
    ) {
        let amount = Decimal::from(amount);
        let spent = Decimal::from(spent);
        let threshold = Decimal::from(threshold);

        let status = compute_status(amount, threshold, spent);

        if !status.is_over_budget {
            let expected_warning = status.percentage_used >= threshold;
            prop_assert_eq!(status.alert_status == AlertStatus::Warning, expected_warning);
        }
    }
}
