use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use planner_core::accounts::{Account, AccountEdit, NewOutsideAccount};
use planner_core::config::Assumptions;
use planner_core::household::Household;
use planner_core::planner::{MemoryStore, PlanDocument, Planner, STORAGE_KEY};
use planner_core::types::{AssetMix, TaxBreakdown};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Assumptions from optional JSON, validated; defaults when absent.
fn assumptions(json: Option<String>) -> NapiResult<Assumptions> {
    let Some(json) = json else {
        return Ok(Assumptions::default());
    };
    let parsed: Assumptions = serde_json::from_str(&json).map_err(to_napi_error)?;
    parsed.validate().map_err(to_napi_error)?;
    Ok(parsed)
}

/// JavaScript numbers cannot carry a full u64, so seeds arrive as i64.
fn seed(value: Option<i64>) -> Option<u64> {
    value.map(|s| s as u64)
}

fn planner_for(document_json: &str, assumptions_json: Option<String>) -> NapiResult<Planner<MemoryStore>> {
    // Reject malformed input here; `Planner::load` would quietly fall back to the seed.
    PlanDocument::from_json(document_json).map_err(to_napi_error)?;
    let store = MemoryStore::with_entry(STORAGE_KEY, document_json);
    Ok(Planner::load(store, assumptions(assumptions_json)?))
}

// ---------------------------------------------------------------------------
// Household and expenses
// ---------------------------------------------------------------------------

#[napi]
pub fn current_age(date_of_birth: String, assumptions_json: Option<String>) -> NapiResult<u32> {
    let a = assumptions(assumptions_json)?;
    Ok(planner_core::household::current_age(
        &date_of_birth,
        a.current_year,
        a.default_age,
    ))
}

#[napi]
pub fn summarize_expenses(plan_json: String) -> NapiResult<String> {
    let plan: planner_core::expenses::ExpensePlan =
        serde_json::from_str(&plan_json).map_err(to_napi_error)?;
    let output = planner_core::expenses::summarize(&plan);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn summarize_income(sources_json: String) -> NapiResult<String> {
    let sources: planner_core::income::IncomeSources =
        serde_json::from_str(&sources_json).map_err(to_napi_error)?;
    let output = planner_core::income::summarize_income(&sources);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountsInput {
    accounts: Vec<Account>,
    #[serde(default)]
    household: Household,
}

#[napi]
pub fn aggregate_accounts(input_json: String) -> NapiResult<String> {
    let input: AccountsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planner_core::accounts::aggregate(&input.accounts, &input.household);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn contribution_breakdown(input_json: String) -> NapiResult<String> {
    let input: AccountsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = planner_core::accounts::contribution_breakdown(&input.accounts, &input.household);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

#[napi]
pub fn project_assets(input_json: String, assumptions_json: Option<String>) -> NapiResult<String> {
    let input: planner_core::projection::AssetProjectionInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.validate().map_err(to_napi_error)?;
    let output = planner_core::projection::project_assets(&input, &assumptions(assumptions_json)?);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn project_cash_flow(
    input_json: String,
    seed_value: Option<i64>,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let input: planner_core::projection::CashFlowInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.validate().map_err(to_napi_error)?;
    let output = planner_core::projection::project_cash_flow_seeded(
        &input,
        &assumptions(assumptions_json)?,
        seed(seed_value),
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Contribution modeling
// ---------------------------------------------------------------------------

#[napi]
pub fn model_additional_contribution(
    input_json: String,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let input: planner_core::contribution::ContributionModelInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.validate().map_err(to_napi_error)?;
    let output = planner_core::contribution::model_additional_contribution(
        &input,
        &assumptions(assumptions_json)?,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// `additional_monthly` is a decimal string so no precision is lost in transit.
#[napi]
pub fn allocate_contribution(breakdown_json: String, additional_monthly: String) -> NapiResult<String> {
    let current: TaxBreakdown = serde_json::from_str(&breakdown_json).map_err(to_napi_error)?;
    let additional: Decimal = additional_monthly.trim().parse().map_err(to_napi_error)?;
    let output = planner_core::contribution::allocate_contribution(&current, additional);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Strategy
// ---------------------------------------------------------------------------

#[napi]
pub fn target_allocation(strategy_name: String) -> NapiResult<String> {
    let output = planner_core::strategy::target_allocation(&strategy_name);
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_to_current(target_json: String, current_json: String) -> NapiResult<String> {
    let target: AssetMix = serde_json::from_str(&target_json).map_err(to_napi_error)?;
    let current: AssetMix = serde_json::from_str(&current_json).map_err(to_napi_error)?;
    let output = planner_core::strategy::compare_to_current(&target, &current);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Plan document
// ---------------------------------------------------------------------------

#[napi]
pub fn seed_document() -> NapiResult<String> {
    PlanDocument::seed().to_json().map_err(to_napi_error)
}

/// Parse a stored document, falling back to the seed document when it is
/// missing or unreadable.
#[napi]
pub fn load_document(stored_json: Option<String>) -> NapiResult<String> {
    let store = match stored_json {
        Some(json) => MemoryStore::with_entry(STORAGE_KEY, &json),
        None => MemoryStore::new(),
    };
    let planner = Planner::load(store, Assumptions::default());
    planner.document().to_json().map_err(to_napi_error)
}

#[napi]
pub fn analyze_plan(
    document_json: String,
    seed_value: Option<i64>,
    assumptions_json: Option<String>,
) -> NapiResult<String> {
    let document = PlanDocument::from_json(&document_json).map_err(to_napi_error)?;
    let output = planner_core::planner::analyze_with_metadata(
        &document,
        &assumptions(assumptions_json)?,
        seed(seed_value),
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Draft for an account as JSON, or `None` when the id is unknown.
#[napi]
pub fn begin_account_edit(document_json: String, account_id: u32) -> NapiResult<Option<String>> {
    let document = PlanDocument::from_json(&document_json).map_err(to_napi_error)?;
    document
        .account(account_id)
        .map(|a| serde_json::to_string(&AccountEdit::begin(a)).map_err(to_napi_error))
        .transpose()
}

/// Merge a draft into the document and return the updated document.
#[napi]
pub fn commit_account_edit(document_json: String, edit_json: String) -> NapiResult<String> {
    let edit: AccountEdit = serde_json::from_str(&edit_json).map_err(to_napi_error)?;
    let mut planner = planner_for(&document_json, None)?;
    planner.commit_account_edit(&edit).map_err(to_napi_error)?;
    planner.document().to_json().map_err(to_napi_error)
}

/// Add an outside account; returns `{ "accountId": .., "document": .. }`.
#[napi]
pub fn add_outside_account(document_json: String, account_json: String) -> NapiResult<String> {
    let account: NewOutsideAccount = serde_json::from_str(&account_json).map_err(to_napi_error)?;
    let mut planner = planner_for(&document_json, None)?;
    let id = planner.add_outside_account(account).map_err(to_napi_error)?;
    let output = serde_json::json!({
        "accountId": id,
        "document": planner.document(),
    });
    serde_json::to_string(&output).map_err(to_napi_error)
}
