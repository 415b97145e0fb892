//! Stateless engine commands. Each takes its input from flags, `--input`, or
//! piped JSON and prints the engine result.

use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use planner_core::accounts::{aggregate, contribution_breakdown, Account};
use planner_core::config::Assumptions;
use planner_core::contribution::{
    allocate_contribution, model_additional_contribution, ContributionModelInput,
};
use planner_core::expenses::{summarize, ExpensePlan};
use planner_core::household::Household;
use planner_core::projection::{
    project_assets, project_cash_flow_seeded, AssetProjectionInput, CashFlowInput,
};
use planner_core::strategy::{compare_strategy, InvestmentStrategy};
use planner_core::types::{AssetMix, TaxBreakdown};

use super::read_input;

/// Arguments for the asset projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Current age in whole years
    #[arg(long)]
    pub current_age: Option<u32>,

    /// Age at which contributions stop
    #[arg(long, default_value = "67")]
    pub retirement_age: u32,

    /// Last age covered by the plan
    #[arg(long, default_value = "95")]
    pub plan_to_age: u32,

    /// Starting balance of the retirement accounts
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual contribution until retirement
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the post-retirement cash-flow series
#[derive(Args)]
pub struct CashFlowArgs {
    /// Current age in whole years
    #[arg(long)]
    pub current_age: Option<u32>,

    /// Retirement age; the series starts in that year
    #[arg(long, default_value = "67")]
    pub retirement_age: u32,

    /// Last age covered by the plan
    #[arg(long, default_value = "95")]
    pub plan_to_age: u32,

    /// Seed for the variable-income jitter (omit for a random series)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for additional-contribution modeling
#[derive(Args)]
pub struct ContributionArgs {
    /// Extra amount contributed every month
    #[arg(long)]
    pub monthly: Option<Decimal>,

    /// Current age in whole years
    #[arg(long)]
    pub current_age: Option<u32>,

    /// Age at which contributions stop
    #[arg(long, default_value = "67")]
    pub retirement_age: u32,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the expense summary
#[derive(Args)]
pub struct ExpensesArgs {
    /// Path to JSON expense plan
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for account aggregation
#[derive(Args)]
pub struct AccountsArgs {
    /// Path to JSON file with `accounts` and `household`
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for strategy comparison
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct StrategyArgs {
    /// Strategy name, e.g. "Balanced" (omit to list all strategies)
    #[arg(long)]
    pub name: Option<String>,

    /// Current domestic stock percentage
    #[arg(long, default_value = "0")]
    pub domestic: Decimal,

    /// Current foreign stock percentage
    #[arg(long, default_value = "0")]
    pub foreign: Decimal,

    /// Current bond percentage
    #[arg(long, default_value = "0")]
    pub bonds: Decimal,

    /// Current short-term percentage
    #[arg(long, default_value = "0")]
    pub short_term: Decimal,

    /// Current other percentage
    #[arg(long, default_value = "0")]
    pub other: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsInput {
    accounts: Vec<Account>,
    #[serde(default)]
    household: Household,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionInput {
    #[serde(flatten)]
    model: ContributionModelInput,
    #[serde(default)]
    current_breakdown: Option<TaxBreakdown>,
}

pub fn run_project(
    args: ProjectArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input: AssetProjectionInput = match read_input(args.input.as_deref())? {
        Some(input) => input,
        None => AssetProjectionInput {
            current_age: args.current_age.unwrap_or(assumptions.default_age),
            retirement_age: args.retirement_age,
            plan_to_age: args.plan_to_age,
            initial_balance: args
                .balance
                .ok_or("--balance is required (or provide --input)")?,
            annual_contribution: args.contribution,
        },
    };
    input.validate()?;
    Ok(serde_json::to_value(project_assets(&input, assumptions))?)
}

pub fn run_cash_flow(
    args: CashFlowArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input: CashFlowInput = match read_input(args.input.as_deref())? {
        Some(input) => input,
        None => CashFlowInput {
            current_age: args.current_age.unwrap_or(assumptions.default_age),
            retirement_age: args.retirement_age,
            plan_to_age: args.plan_to_age,
        },
    };
    input.validate()?;
    let rows = project_cash_flow_seeded(&input, assumptions, args.seed);
    Ok(serde_json::to_value(rows)?)
}

pub fn run_contribution(
    args: ContributionArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let input: ContributionInput = match read_input(args.input.as_deref())? {
        Some(input) => input,
        None => ContributionInput {
            model: ContributionModelInput {
                monthly_amount: args
                    .monthly
                    .ok_or("--monthly is required (or provide --input)")?,
                current_age: args.current_age.unwrap_or(assumptions.default_age),
                retirement_age: args.retirement_age,
            },
            current_breakdown: None,
        },
    };

    input.model.validate()?;
    let estimate = model_additional_contribution(&input.model, assumptions);
    let mut value = serde_json::to_value(&estimate)?;
    if let (Some(current), Value::Object(map)) = (input.current_breakdown, &mut value) {
        let allocated = allocate_contribution(&current, input.model.monthly_amount);
        map.insert("allocation".into(), serde_json::to_value(allocated)?);
    }
    Ok(value)
}

pub fn run_expenses(args: ExpensesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan: ExpensePlan = read_input(args.input.as_deref())?
        .ok_or("--input <plan.json> or stdin required for the expense summary")?;
    Ok(serde_json::to_value(summarize(&plan))?)
}

pub fn run_accounts(args: AccountsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input: AccountsInput = read_input(args.input.as_deref())?
        .ok_or("--input <accounts.json> or stdin required for account aggregation")?;
    let summary = aggregate(&input.accounts, &input.household);
    let breakdown = contribution_breakdown(&input.accounts, &input.household);
    let mut value = serde_json::to_value(summary)?;
    if let Value::Object(map) = &mut value {
        map.insert("contributionBreakdown".into(), serde_json::to_value(breakdown)?);
    }
    Ok(value)
}

pub fn run_strategy(args: StrategyArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let Some(name) = args.name else {
        let table: Vec<Value> = InvestmentStrategy::ALL
            .into_iter()
            .map(|s| {
                let mix = s.allocation();
                serde_json::json!({
                    "strategy": s.name(),
                    "domestic": mix.domestic,
                    "foreign": mix.foreign,
                    "bonds": mix.bonds,
                    "shortTerm": mix.short_term,
                    "other": mix.other,
                })
            })
            .collect();
        return Ok(Value::Array(table));
    };

    let current = AssetMix::new(
        args.domestic,
        args.foreign,
        args.bonds,
        args.short_term,
        args.other,
    );
    let comparison = compare_strategy(&name, &current);
    if comparison.strategy.is_none() {
        tracing::warn!(strategy = %name, "unknown strategy, target is the zero mix");
    }
    Ok(serde_json::to_value(comparison)?)
}
