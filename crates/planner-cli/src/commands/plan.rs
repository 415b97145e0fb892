//! Commands over the persisted plan document in a `--store` directory.

use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use planner_core::accounts::{AccountEdit, Goal, NewOutsideAccount};
use planner_core::config::Assumptions;
use planner_core::planner::{analyze_with_metadata, FileStore, Planner, STORAGE_KEY};

use super::read_input;

const DEFAULT_STORE_DIR: &str = ".rpw";

/// Location of the plan store
#[derive(Args)]
pub struct StoreArgs {
    /// Directory holding the plan document
    #[arg(long, default_value = DEFAULT_STORE_DIR)]
    pub store: String,
}

/// Arguments for creating a fresh plan
#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Replace an existing plan with the seed document
    #[arg(long)]
    pub force: bool,
}

/// Arguments for printing the stored plan
#[derive(Args)]
pub struct ShowArgs {
    #[command(flatten)]
    pub store: StoreArgs,
}

/// Arguments for analysing the stored plan
#[derive(Args)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Seed for the cash-flow jitter (omit for a random series)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Retirement,
    Unassigned,
}

impl From<GoalArg> for Goal {
    fn from(g: GoalArg) -> Goal {
        match g {
            GoalArg::Retirement => Goal::Retirement,
            GoalArg::Unassigned => Goal::Unassigned,
        }
    }
}

/// Arguments for adding an outside account
#[derive(Args)]
pub struct AddAccountArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Account name
    #[arg(long)]
    pub name: Option<String>,

    /// Masked account number
    #[arg(long, default_value = "")]
    pub number: String,

    /// Account type label, e.g. "Roth IRA"
    #[arg(long = "type", default_value = "")]
    pub account_type: String,

    /// Owner name (the partner's name marks a partner account)
    #[arg(long, default_value = "")]
    pub owner: String,

    /// Current balance
    #[arg(long, default_value = "0")]
    pub balance: Decimal,

    /// Annual contribution
    #[arg(long, default_value = "0")]
    pub contribution: Decimal,

    /// Goal the account is assigned to
    #[arg(long, value_enum, default_value = "unassigned")]
    pub goal: GoalArg,

    /// Path to JSON account (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for editing an account. Built-in accounts accept only
/// `--goal` and `--contribution`.
#[derive(Args)]
pub struct EditAccountArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Id of the account to edit
    #[arg(long)]
    pub id: u32,

    #[arg(long, value_enum)]
    pub goal: Option<GoalArg>,

    /// Annual contribution as text, e.g. "$6,500"
    #[arg(long)]
    pub contribution: Option<String>,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long = "type")]
    pub account_type: Option<String>,

    #[arg(long)]
    pub owner: Option<String>,

    /// Balance as text
    #[arg(long)]
    pub balance: Option<String>,
}

fn open(store: &StoreArgs, assumptions: &Assumptions) -> Planner<FileStore> {
    Planner::load(FileStore::new(&store.store), assumptions.clone())
}

pub fn run_init(args: InitArgs, assumptions: &Assumptions) -> Result<Value, Box<dyn std::error::Error>> {
    let store = FileStore::new(&args.store.store);
    let path = store.path_for(STORAGE_KEY);
    if path.exists() && !args.force {
        return Err(format!(
            "plan already exists at '{}' (use --force to replace it)",
            path.display()
        )
        .into());
    }

    let mut planner = Planner::load(store, assumptions.clone());
    planner.reset()?;
    tracing::info!(path = %path.display(), "plan initialised");
    Ok(serde_json::json!({
        "path": path.display().to_string(),
        "accounts": planner.document().accounts.len(),
    }))
}

pub fn run_show(args: ShowArgs, assumptions: &Assumptions) -> Result<Value, Box<dyn std::error::Error>> {
    let planner = open(&args.store, assumptions);
    Ok(serde_json::to_value(planner.document())?)
}

pub fn run_analyze(
    args: AnalyzeArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let planner = open(&args.store, assumptions);
    let output = analyze_with_metadata(planner.document(), planner.assumptions(), args.seed);
    Ok(serde_json::to_value(output)?)
}

pub fn run_add_account(
    args: AddAccountArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let account: NewOutsideAccount = match read_input(args.input.as_deref())? {
        Some(account) => account,
        None => NewOutsideAccount {
            name: args.name.ok_or("--name is required (or provide --input)")?,
            number: args.number,
            account_type: args.account_type,
            owner: args.owner,
            balance: args.balance,
            annual_contribution: args.contribution,
            goal: args.goal.into(),
            breakdown: None,
            tax_treatment: None,
        },
    };

    let mut planner = open(&args.store, assumptions);
    let id = planner.add_outside_account(account)?;
    let added = planner
        .document()
        .account(id)
        .ok_or("account missing after insert")?;
    Ok(serde_json::to_value(added)?)
}

pub fn run_edit_account(
    args: EditAccountArgs,
    assumptions: &Assumptions,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut planner = open(&args.store, assumptions);
    let mut edit = planner
        .begin_account_edit(args.id)
        .ok_or_else(|| format!("no account with id {}", args.id))?;

    match &mut edit {
        AccountEdit::BuiltIn(draft) => {
            let outside_only = [
                ("--name", args.name.is_some()),
                ("--number", args.number.is_some()),
                ("--type", args.account_type.is_some()),
                ("--owner", args.owner.is_some()),
                ("--balance", args.balance.is_some()),
            ];
            if let Some((flag, _)) = outside_only.iter().find(|(_, set)| *set) {
                return Err(format!(
                    "{flag} can only be changed on outside accounts; account {} is built-in",
                    args.id
                )
                .into());
            }
            if let Some(goal) = args.goal {
                draft.goal = goal.into();
            }
            if let Some(contribution) = args.contribution {
                draft.contribution = contribution;
            }
        }
        AccountEdit::Outside(draft) => {
            if let Some(goal) = args.goal {
                draft.goal = goal.into();
            }
            if let Some(contribution) = args.contribution {
                draft.contribution = contribution;
            }
            if let Some(name) = args.name {
                draft.name = name;
            }
            if let Some(number) = args.number {
                draft.number = number;
            }
            if let Some(account_type) = args.account_type {
                draft.account_type = account_type;
            }
            if let Some(owner) = args.owner {
                draft.owner = owner;
            }
            if let Some(balance) = args.balance {
                draft.balance = balance;
            }
        }
    }

    planner.commit_account_edit(&edit)?;
    let edited = planner
        .document()
        .account(args.id)
        .ok_or("account missing after edit")?;
    Ok(serde_json::to_value(edited)?)
}
