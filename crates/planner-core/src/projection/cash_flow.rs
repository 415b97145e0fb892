//! Illustrative post-retirement cash-flow series for the income chart.
//!
//! This is presentation data with a two-regime shape, not an actuarial
//! model. Variable income carries random jitter drawn from the injected
//! source; seed it to get reproducible output.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Assumptions;
use crate::household::{validate_ages, years_until};
use crate::types::{round_currency, Money};
use crate::PlannerResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub plan_to_age: u32,
}

impl CashFlowInput {
    pub fn validate(&self) -> PlannerResult<()> {
        validate_ages(&[
            ("current_age", self.current_age),
            ("retirement_age", self.retirement_age),
            ("plan_to_age", self.plan_to_age),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowPoint {
    pub year: i32,
    pub expenses: Money,
    pub fixed_income: Money,
    pub variable_income: Money,
}

/// Annual cash-flow rows from the retirement year through the plan-to year.
pub fn project_cash_flow<R: Rng>(
    input: &CashFlowInput,
    assumptions: &Assumptions,
    rng: &mut R,
) -> Vec<CashFlowPoint> {
    let shape = &assumptions.cash_flow;
    let Some(years_left) = years_until(input.current_age, input.plan_to_age) else {
        return Vec::new();
    };
    let years_to_retirement = years_until(input.current_age, input.retirement_age).unwrap_or(0);
    let retirement_year = assumptions
        .current_year
        .saturating_add_unsigned(years_to_retirement);
    let end_year = assumptions.current_year.saturating_add_unsigned(years_left);

    let amplitude = shape.expense_amplitude.to_f64().unwrap_or(0.0);
    let jitter = shape.variable_jitter.to_f64().unwrap_or(0.0).max(0.0);

    let mut rows = Vec::new();
    for year in retirement_year..=end_year {
        let since_retirement = Decimal::from(year - retirement_year);

        let base = if year < shape.inflection_year {
            shape.expenses_before
        } else {
            shape.expenses_after
        };
        let wave = Decimal::from_f64(amplitude * f64::from(year - retirement_year).sin())
            .unwrap_or(Decimal::ZERO);
        let expenses = base + shape.expense_drift * since_retirement + wave;

        let trend = if year < shape.inflection_year {
            shape.variable_base
        } else {
            shape.variable_base + shape.variable_growth * Decimal::from(year - shape.inflection_year)
        };
        let noise = if jitter > 0.0 {
            Decimal::from_f64(rng.gen_range(-jitter..=jitter)).unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        let variable_income = (trend + noise).max(Decimal::ZERO);

        rows.push(CashFlowPoint {
            year,
            expenses: round_currency(expenses),
            fixed_income: round_currency(shape.fixed_income),
            variable_income: round_currency(variable_income),
        });
    }
    rows
}

/// Same as [`project_cash_flow`] with a `StdRng` seeded from `seed`, or from
/// OS entropy when no seed is given.
pub fn project_cash_flow_seeded(
    input: &CashFlowInput,
    assumptions: &Assumptions,
    seed: Option<u64>,
) -> Vec<CashFlowPoint> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    project_cash_flow(input, assumptions, &mut rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const SEED: u64 = 42;

    fn input() -> CashFlowInput {
        CashFlowInput {
            current_age: 40,
            retirement_age: 67,
            plan_to_age: 95,
        }
    }

    fn quiet() -> Assumptions {
        let mut a = Assumptions::default();
        a.cash_flow.variable_jitter = Decimal::ZERO;
        a.cash_flow.expense_amplitude = Decimal::ZERO;
        a
    }

    #[test]
    fn test_rows_span_retirement_to_plan_end() {
        let a = Assumptions::default();
        let rows = project_cash_flow_seeded(&input(), &a, Some(SEED));
        assert_eq!(rows.first().unwrap().year, a.current_year + 27);
        assert_eq!(rows.last().unwrap().year, a.current_year + 55);
        assert_eq!(rows.len(), 29);
    }

    #[test]
    fn test_seeded_reproducibility() {
        let a = Assumptions::default();
        let r1 = project_cash_flow_seeded(&input(), &a, Some(SEED));
        let r2 = project_cash_flow_seeded(&input(), &a, Some(SEED));
        assert_eq!(r1, r2);
    }

    #[test]
    fn test_two_regimes_without_noise() {
        let a = quiet();
        let shape = &a.cash_flow;
        let rows = project_cash_flow_seeded(&input(), &a, None);

        for row in &rows {
            let t = Decimal::from(row.year - rows[0].year);
            assert_eq!(row.fixed_income, shape.fixed_income);
            if row.year < shape.inflection_year {
                assert_eq!(row.expenses, shape.expenses_before + shape.expense_drift * t);
                assert_eq!(row.variable_income, shape.variable_base);
            } else {
                assert_eq!(row.expenses, shape.expenses_after + shape.expense_drift * t);
                let k = Decimal::from(row.year - shape.inflection_year);
                assert_eq!(
                    row.variable_income,
                    shape.variable_base + shape.variable_growth * k
                );
            }
        }
    }

    #[test]
    fn test_noise_stays_within_bounds() {
        let a = Assumptions::default();
        let shape = &a.cash_flow;
        let rows = project_cash_flow_seeded(&input(), &a, Some(7));
        for row in &rows {
            let t = Decimal::from(row.year - rows[0].year);
            let base = if row.year < shape.inflection_year {
                shape.expenses_before
            } else {
                shape.expenses_after
            };
            let centre = base + shape.expense_drift * t;
            assert!((row.expenses - centre).abs() <= shape.expense_amplitude + dec!(1));
            assert!(row.variable_income >= Decimal::ZERO);
        }
    }

    #[test]
    fn test_retirement_after_plan_end_is_empty() {
        let i = CashFlowInput {
            current_age: 40,
            retirement_age: 99,
            plan_to_age: 95,
        };
        assert!(project_cash_flow_seeded(&i, &Assumptions::default(), Some(SEED)).is_empty());
    }

    #[test]
    fn test_huge_ages_are_clamped() {
        let i = CashFlowInput {
            current_age: 0,
            retirement_age: 400_000_000,
            plan_to_age: u32::MAX,
        };
        let a = Assumptions::default();
        let rows = project_cash_flow_seeded(&i, &a, Some(SEED));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, a.current_year + 150);
        assert!(i.validate().is_err());
    }
}
