use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{Assumptions, ScenarioRates};
use crate::household::{validate_ages, years_until};
use crate::time_value::grow;
use crate::types::{round_currency, Money, Rate};
use crate::PlannerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three fixed market-condition scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketCondition {
    Average,
    BelowAverage,
    SignificantlyBelowAverage,
}

impl MarketCondition {
    pub const ALL: [MarketCondition; 3] = [
        MarketCondition::Average,
        MarketCondition::BelowAverage,
        MarketCondition::SignificantlyBelowAverage,
    ];

    pub fn rate(self, rates: &ScenarioRates) -> Rate {
        match self {
            MarketCondition::Average => rates.average,
            MarketCondition::BelowAverage => rates.below_average,
            MarketCondition::SignificantlyBelowAverage => rates.significantly_below_average,
        }
    }
}

/// Inputs for the asset accumulation series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetProjectionInput {
    pub current_age: u32,
    pub retirement_age: u32,
    pub plan_to_age: u32,
    pub initial_balance: Money,
    pub annual_contribution: Money,
}

impl AssetProjectionInput {
    /// Reject ages the projection would have to clamp.
    pub fn validate(&self) -> PlannerResult<()> {
        validate_ages(&[
            ("current_age", self.current_age),
            ("retirement_age", self.retirement_age),
            ("plan_to_age", self.plan_to_age),
        ])
    }

    /// Contribution years left; zero once retired.
    pub fn years_to_retirement(&self) -> u32 {
        years_until(self.current_age, self.retirement_age).unwrap_or(0)
    }

    /// First calendar year without contributions.
    pub fn retirement_year(&self, current_year: i32) -> i32 {
        current_year.saturating_add_unsigned(self.years_to_retirement())
    }

    /// Last calendar year of the plan, or `None` when the plan ends before today.
    pub fn end_year(&self, current_year: i32) -> Option<i32> {
        years_until(self.current_age, self.plan_to_age)
            .map(|years| current_year.saturating_add_unsigned(years))
    }
}

/// Year-end balance of each track for one calendar year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionPoint {
    pub year: i32,
    pub average: Money,
    pub below_average: Money,
    pub significantly_below_average: Money,
}

impl ProjectionPoint {
    pub fn value(&self, condition: MarketCondition) -> Money {
        match condition {
            MarketCondition::Average => self.average,
            MarketCondition::BelowAverage => self.below_average,
            MarketCondition::SignificantlyBelowAverage => self.significantly_below_average,
        }
    }
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Project balances under the three growth tracks, one row per calendar year
/// from the current year through the plan-to year.
///
/// Before the retirement year the contribution is added and the sum grows;
/// from the retirement year on the balance only grows. Withdrawals are not
/// modeled, so balances keep rising through the whole horizon. Ages past
/// [`MAX_AGE`](crate::household::MAX_AGE) are clamped and balances saturate
/// at `Decimal::MAX`.
pub fn project_assets(input: &AssetProjectionInput, assumptions: &Assumptions) -> Vec<ProjectionPoint> {
    let start_year = assumptions.current_year;
    let Some(end_year) = input.end_year(start_year) else {
        return Vec::new();
    };
    let retirement_year = input.retirement_year(start_year);
    let rates = &assumptions.growth_rates;

    let mut balances = [input.initial_balance; 3];
    let mut series = Vec::with_capacity(usize::try_from(end_year - start_year + 1).unwrap_or(0));

    for year in start_year..=end_year {
        let contribution = if year < retirement_year {
            input.annual_contribution
        } else {
            Decimal::ZERO
        };

        for (balance, condition) in balances.iter_mut().zip(MarketCondition::ALL) {
            *balance = grow(*balance, contribution, condition.rate(rates));
        }

        series.push(ProjectionPoint {
            year,
            average: round_currency(balances[0]),
            below_average: round_currency(balances[1]),
            significantly_below_average: round_currency(balances[2]),
        });
    }

    series
}
