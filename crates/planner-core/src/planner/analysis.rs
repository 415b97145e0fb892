use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::document::PlanDocument;
use crate::accounts::{aggregate, contribution_breakdown, AccountSummary};
use crate::config::Assumptions;
use crate::expenses::{summarize, ExpenseSummary};
use crate::household::MAX_AGE;
use crate::income::{summarize_income, IncomeSummary};
use crate::projection::{
    project_assets, project_cash_flow_seeded, AssetProjectionInput, CashFlowInput, CashFlowPoint,
    MarketCondition, ProjectionPoint,
};
use crate::strategy::{compare_strategy, InvestmentStrategy, StrategyComparison};
use crate::types::{round_currency, with_metadata, ComputationOutput, Money, TaxBreakdown};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Summary-card numbers for one market condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioReadiness {
    pub condition: MarketCondition,
    pub balance_at_retirement: Money,
    /// Balance at retirement drawn at the withdrawal rate, per month.
    pub monthly_income_from_assets: Money,
    /// Asset income plus recurring income sources.
    pub monthly_income_total: Money,
    /// Positive is a surplus over monthly expenses, negative a shortfall.
    pub monthly_gap: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAnalysis {
    pub current_age: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_age: Option<u32>,
    pub retirement_year: i32,
    pub years_to_retirement: u32,
    pub expenses: ExpenseSummary,
    pub accounts: AccountSummary,
    pub income: IncomeSummary,
    pub projection: Vec<ProjectionPoint>,
    pub cash_flow: Vec<CashFlowPoint>,
    pub readiness: Vec<ScenarioReadiness>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyComparison>,
    pub contribution_breakdown: TaxBreakdown,
}

// ---------------------------------------------------------------------------
// Inputs derived from the document
// ---------------------------------------------------------------------------

/// Asset projection inputs for the document: primary age, goal-account totals.
pub fn asset_projection_input(doc: &PlanDocument, assumptions: &Assumptions) -> AssetProjectionInput {
    let accounts = aggregate(&doc.accounts, &doc.household);
    AssetProjectionInput {
        current_age: doc.household.ages(assumptions).primary,
        retirement_age: doc.profile.retirement_age,
        plan_to_age: doc.profile.plan_to_age,
        initial_balance: accounts.total_balance,
        annual_contribution: accounts.total_contributions,
    }
}

/// Balance for the retirement year, clamped to the ends of the series.
fn balance_at_retirement(
    series: &[ProjectionPoint],
    retirement_year: i32,
    condition: MarketCondition,
    fallback: Money,
) -> Money {
    let (Some(first), Some(last)) = (series.first(), series.last()) else {
        return fallback;
    };
    let point = series
        .iter()
        .find(|p| p.year == retirement_year)
        .unwrap_or(if retirement_year < first.year { first } else { last });
    point.value(condition)
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Run every engine over the document.
///
/// `seed` drives the cash-flow jitter; `None` draws from OS entropy.
pub fn analyze(doc: &PlanDocument, assumptions: &Assumptions, seed: Option<u64>) -> PlanAnalysis {
    let projection = project_assets(&asset_projection_input(doc, assumptions), assumptions);
    analyze_with_projection(doc, assumptions, seed, projection)
}

/// [`analyze`] with an asset projection already computed for the document.
pub(crate) fn analyze_with_projection(
    doc: &PlanDocument,
    assumptions: &Assumptions,
    seed: Option<u64>,
    projection: Vec<ProjectionPoint>,
) -> PlanAnalysis {
    let ages = doc.household.ages(assumptions);
    let expenses = summarize(&doc.expenses);
    let accounts = aggregate(&doc.accounts, &doc.household);
    let income = summarize_income(&doc.income);

    let input = asset_projection_input(doc, assumptions);
    let retirement_year = input.retirement_year(assumptions.current_year);

    // The chart's fixed income line follows the entered sources when there are any.
    let mut cash_flow_assumptions = assumptions.clone();
    if income.recurring_monthly > Decimal::ZERO {
        cash_flow_assumptions.cash_flow.fixed_income = income.recurring_monthly * dec!(12);
    }
    let cash_flow = project_cash_flow_seeded(
        &CashFlowInput {
            current_age: input.current_age,
            retirement_age: input.retirement_age,
            plan_to_age: input.plan_to_age,
        },
        &cash_flow_assumptions,
        seed,
    );

    let readiness = MarketCondition::ALL
        .into_iter()
        .map(|condition| {
            let balance =
                balance_at_retirement(&projection, retirement_year, condition, input.initial_balance);
            let from_assets =
                round_currency(balance.saturating_mul(assumptions.withdrawal_rate) / dec!(12));
            let total = from_assets.saturating_add(income.recurring_monthly);
            ScenarioReadiness {
                condition,
                balance_at_retirement: balance,
                monthly_income_from_assets: from_assets,
                monthly_income_total: total,
                monthly_gap: total.saturating_sub(expenses.total),
            }
        })
        .collect();

    let strategy = doc
        .modeled_strategy
        .as_deref()
        .map(|name| compare_strategy(name, &accounts.blended_mix));

    PlanAnalysis {
        current_age: ages.primary,
        partner_age: ages.partner,
        retirement_year,
        years_to_retirement: input.years_to_retirement(),
        contribution_breakdown: contribution_breakdown(&doc.accounts, &doc.household),
        expenses,
        accounts,
        income,
        projection,
        cash_flow,
        readiness,
        strategy,
    }
}

fn plan_warnings(doc: &PlanDocument, analysis: &PlanAnalysis) -> Vec<String> {
    let mut warnings = Vec::new();
    let profile = &doc.profile;

    if let Err(e) = profile.validate() {
        warnings.push(format!("{e}; projections stop at age {MAX_AGE}"));
    }
    if profile.retirement_age < analysis.current_age {
        warnings.push(format!(
            "Retirement age {} is below current age {}; no contributions are projected",
            profile.retirement_age, analysis.current_age
        ));
    }
    if profile.plan_to_age <= profile.retirement_age {
        warnings.push(format!(
            "Plan-to age {} is not after retirement age {}",
            profile.plan_to_age, profile.retirement_age
        ));
    }
    if analysis.accounts.excluded_partner_count > 0 {
        warnings.push(format!(
            "{} partner-owned account(s) excluded because the plan is not joint",
            analysis.accounts.excluded_partner_count
        ));
    }
    if analysis.accounts.missing_breakdown_count > 0 {
        warnings.push(format!(
            "{} retirement account(s) have no asset breakdown; blended mix does not sum to 100%",
            analysis.accounts.missing_breakdown_count
        ));
    }
    if let Some(name) = doc.modeled_strategy.as_deref() {
        if InvestmentStrategy::from_name(name).is_none() {
            warnings.push(format!("Unknown strategy '{name}'; target allocation is empty"));
        }
    }
    warnings
}

/// [`analyze`] wrapped in the standard output envelope.
pub fn analyze_with_metadata(
    doc: &PlanDocument,
    assumptions: &Assumptions,
    seed: Option<u64>,
) -> ComputationOutput<PlanAnalysis> {
    let start = Instant::now();
    let analysis = analyze(doc, assumptions, seed);
    let warnings = plan_warnings(doc, &analysis);

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Fixed-rate scenario projection (contributions until retirement, growth only afterwards, no withdrawals)",
        &serde_json::json!({
            "current_year": assumptions.current_year,
            "growth_rates": assumptions.growth_rates,
            "withdrawal_rate": assumptions.withdrawal_rate.to_string(),
            "contribution_growth_rate": assumptions.contribution_growth_rate.to_string(),
            "cash_flow_seed": seed,
        }),
        warnings,
        elapsed,
        analysis,
    )
}
