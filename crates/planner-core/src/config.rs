//! Planning assumptions.
//!
//! Every field has a default, so a partial JSON or YAML file only needs to
//! name the values it overrides.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::types::{Money, Rate};
use crate::PlannerResult;

/// Calendar year all ages and projections are anchored to.
pub const CURRENT_YEAR: i32 = 2025;

/// Age used when a date of birth cannot be parsed.
pub const DEFAULT_AGE: u32 = 40;

/// Fixed annual growth rates for the three market-condition tracks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScenarioRates {
    pub average: Rate,
    pub below_average: Rate,
    pub significantly_below_average: Rate,
}

impl Default for ScenarioRates {
    fn default() -> Self {
        ScenarioRates {
            average: dec!(0.075),
            below_average: dec!(0.055),
            significantly_below_average: dec!(0.035),
        }
    }
}

/// Constants shaping the illustrative post-retirement cash-flow series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashFlowShape {
    /// Calendar year where expenses step up and variable income starts growing.
    pub inflection_year: i32,
    pub expenses_before: Money,
    pub expenses_after: Money,
    /// Linear expense drift per year since retirement.
    pub expense_drift: Money,
    /// Peak size of the expense oscillation.
    pub expense_amplitude: Money,
    pub fixed_income: Money,
    pub variable_base: Money,
    /// Per-year growth of variable income after the inflection year.
    pub variable_growth: Money,
    /// Maximum absolute random deviation applied to variable income.
    pub variable_jitter: Money,
}

impl Default for CashFlowShape {
    fn default() -> Self {
        CashFlowShape {
            inflection_year: 2060,
            expenses_before: dec!(72000),
            expenses_after: dec!(84000),
            expense_drift: dec!(600),
            expense_amplitude: dec!(1500),
            fixed_income: dec!(36000),
            variable_base: dec!(24000),
            variable_growth: dec!(1500),
            variable_jitter: dec!(2000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assumptions {
    pub current_year: i32,
    pub default_age: u32,
    pub growth_rates: ScenarioRates,
    /// Annual rate for the added-contribution model (a significantly below
    /// average assumption, separate from the projection tracks).
    pub contribution_growth_rate: Rate,
    pub withdrawal_rate: Rate,
    pub cash_flow: CashFlowShape,
}

impl Default for Assumptions {
    fn default() -> Self {
        Assumptions {
            current_year: CURRENT_YEAR,
            default_age: DEFAULT_AGE,
            growth_rates: ScenarioRates::default(),
            contribution_growth_rate: dec!(0.054),
            withdrawal_rate: dec!(0.04),
            cash_flow: CashFlowShape::default(),
        }
    }
}

impl Assumptions {
    /// Check a loaded configuration before it reaches the engine.
    pub fn validate(&self) -> PlannerResult<()> {
        if self.current_year <= 0 {
            return Err(invalid("current_year", "current_year must be > 0"));
        }

        let rates = &self.growth_rates;
        if rates.significantly_below_average <= Decimal::ZERO {
            return Err(invalid(
                "growth_rates.significantly_below_average",
                "growth rates must be > 0",
            ));
        }
        if rates.significantly_below_average >= rates.below_average
            || rates.below_average >= rates.average
        {
            return Err(invalid(
                "growth_rates",
                "rates must be distinct and ordered significantly_below_average < below_average < average",
            ));
        }

        for (field, rate) in [
            ("contribution_growth_rate", self.contribution_growth_rate),
            ("withdrawal_rate", self.withdrawal_rate),
        ] {
            if rate <= Decimal::ZERO || rate >= Decimal::ONE {
                return Err(invalid(field, "rate must be between 0 and 1 (exclusive)"));
            }
        }

        if self.cash_flow.variable_jitter < Decimal::ZERO {
            return Err(invalid(
                "cash_flow.variable_jitter",
                "jitter must be >= 0",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> PlannerError {
    PlannerError::InvalidInput {
        field: field.into(),
        reason: reason.into(),
    }
}
