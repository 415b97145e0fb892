use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::Assumptions;
use crate::household::{validate_ages, years_until};
use crate::time_value::fv_annuity;
use crate::types::{round_currency, Money, TaxBreakdown};
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionModelInput {
    /// Extra amount contributed each month.
    pub monthly_amount: Money,
    pub current_age: u32,
    pub retirement_age: u32,
}

impl ContributionModelInput {
    pub fn validate(&self) -> PlannerResult<()> {
        validate_ages(&[
            ("current_age", self.current_age),
            ("retirement_age", self.retirement_age),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionEstimate {
    /// Monthly contributions remaining before retirement.
    pub months: u32,
    pub future_value_of_contributions: Money,
    /// Monthly income the future value supports at the withdrawal rate.
    pub monthly_income_equivalent: Money,
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Value at retirement of an extra monthly contribution, and the monthly
/// income it would fund.
///
/// Uses the ordinary-annuity future value at `contribution_growth_rate / 12`
/// per month. Ages are clamped to [`MAX_AGE`](crate::household::MAX_AGE).
pub fn model_additional_contribution(
    input: &ContributionModelInput,
    assumptions: &Assumptions,
) -> ContributionEstimate {
    let months = years_until(input.current_age, input.retirement_age).unwrap_or(0) * 12;

    if input.monthly_amount.is_zero() {
        return ContributionEstimate {
            months,
            future_value_of_contributions: Decimal::ZERO,
            monthly_income_equivalent: Decimal::ZERO,
        };
    }

    let monthly_rate = assumptions.contribution_growth_rate / dec!(12);
    let future_value = fv_annuity(input.monthly_amount, monthly_rate, months);
    let monthly_income = round_currency(
        future_value.saturating_mul(assumptions.withdrawal_rate) / dec!(12),
    );

    ContributionEstimate {
        months,
        future_value_of_contributions: future_value,
        monthly_income_equivalent: monthly_income,
    }
}

/// Route an additional monthly contribution into the tax buckets.
///
/// The whole amount goes to the tax-exempt bucket; this is a fixed policy,
/// not an optimization.
pub fn allocate_contribution(current: &TaxBreakdown, additional_monthly: Money) -> TaxBreakdown {
    TaxBreakdown {
        tax_exempt: current.tax_exempt + additional_monthly,
        ..*current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::ToPrimitive;

    fn input(amount: Money) -> ContributionModelInput {
        ContributionModelInput {
            monthly_amount: amount,
            current_age: 55,
            retirement_age: 65,
        }
    }

    #[test]
    fn test_zero_amount_gives_zero() {
        let est = model_additional_contribution(&input(Decimal::ZERO), &Assumptions::default());
        assert_eq!(est.future_value_of_contributions, Decimal::ZERO);
        assert_eq!(est.monthly_income_equivalent, Decimal::ZERO);
    }

    #[test]
    fn test_no_months_left_gives_zero_value() {
        let mut i = input(dec!(325));
        i.current_age = 66;
        let est = model_additional_contribution(&i, &Assumptions::default());
        assert_eq!(est.months, 0);
        assert_eq!(est.future_value_of_contributions, Decimal::ZERO);
        assert_eq!(est.monthly_income_equivalent, Decimal::ZERO);
    }

    #[test]
    fn test_matches_closed_form() {
        let est = model_additional_contribution(&input(dec!(325)), &Assumptions::default());
        assert_eq!(est.months, 120);

        let r: f64 = 0.054 / 12.0;
        let expected = 325.0 * ((1.0 + r).powi(120) - 1.0) / r;
        let got = est.future_value_of_contributions.to_f64().unwrap();
        assert!((got - expected).abs() < 1e-6, "got={got} expected={expected}");

        let income = est.monthly_income_equivalent.to_f64().unwrap();
        assert_eq!(income, (expected * 0.04 / 12.0).round());
    }

    #[test]
    fn test_far_retirement_age_is_clamped() {
        let i = ContributionModelInput {
            monthly_amount: dec!(325),
            current_age: 40,
            retirement_age: 2000,
        };
        let est = model_additional_contribution(&i, &Assumptions::default());
        assert_eq!(est.months, (150 - 40) * 12);
        assert!(est.future_value_of_contributions > Decimal::ZERO);
        assert!(i.validate().is_err());
    }

    #[test]
    fn test_huge_retirement_age_does_not_overflow_months() {
        let i = ContributionModelInput {
            monthly_amount: dec!(325),
            current_age: 0,
            retirement_age: 400_000_000,
        };
        let est = model_additional_contribution(&i, &Assumptions::default());
        assert_eq!(est.months, 1800);
    }

    #[test]
    fn test_huge_amount_saturates() {
        let i = ContributionModelInput {
            monthly_amount: dec!(10000000000000000000000000000),
            current_age: 0,
            retirement_age: 150,
        };
        let est = model_additional_contribution(&i, &Assumptions::default());
        assert_eq!(est.future_value_of_contributions, Decimal::MAX);
        assert!(est.monthly_income_equivalent > Decimal::ZERO);
    }

    #[test]
    fn test_allocation_goes_to_tax_exempt() {
        let current = TaxBreakdown {
            tax_deferred: dec!(500),
            taxable: dec!(100),
            tax_exempt: dec!(250),
            hsa: dec!(50),
        };
        let next = allocate_contribution(&current, dec!(325));
        assert_eq!(next.tax_exempt, dec!(575));
        assert_eq!(next.tax_deferred, dec!(500));
        assert_eq!(next.taxable, dec!(100));
        assert_eq!(next.hsa, dec!(50));
        assert_eq!(next.total(), current.total() + dec!(325));
    }
}
