mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::engine::{
    AccountsArgs, CashFlowArgs, ContributionArgs, ExpensesArgs, ProjectArgs, StrategyArgs,
};
use commands::plan::{AddAccountArgs, AnalyzeArgs, EditAccountArgs, InitArgs, ShowArgs};
use planner_core::config::Assumptions;

/// Retirement plan projections and analysis
#[derive(Parser)]
#[command(
    name = "rpw",
    version,
    about = "Retirement plan projections and analysis",
    long_about = "A CLI over the retirement planning engine. Keeps one plan document \
                  in a local store and runs the scenario projection, cash-flow, \
                  contribution modeling, account aggregation and strategy comparison \
                  engines against it or against standalone JSON input."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Planning assumptions file (JSON or YAML)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a plan from the seed document
    Init(InitArgs),
    /// Print the stored plan document
    Show(ShowArgs),
    /// Run every engine over the stored plan
    Analyze(AnalyzeArgs),
    /// Add a manually entered (outside) account to the stored plan
    AddAccount(AddAccountArgs),
    /// Edit an account in the stored plan
    EditAccount(EditAccountArgs),
    /// Project balances under the three market conditions
    Project(ProjectArgs),
    /// Illustrative post-retirement cash-flow series
    CashFlow(CashFlowArgs),
    /// Value of an additional monthly contribution at retirement
    Contribution(ContributionArgs),
    /// Summarize an expense plan
    Expenses(ExpensesArgs),
    /// Aggregate accounts into totals and a blended asset mix
    Accounts(AccountsArgs),
    /// Compare a named strategy to a current asset mix
    Strategy(StrategyArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Log to stderr so stdout stays machine-readable. `RUST_LOG` overrides the
/// default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_assumptions(path: Option<&str>) -> Result<Assumptions, Box<dyn std::error::Error>> {
    match path {
        Some(path) => input::file::read_assumptions(path),
        None => Ok(Assumptions::default()),
    }
}

fn run(cli: Cli) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let assumptions = load_assumptions(cli.config.as_deref())?;

    match cli.command {
        Commands::Init(args) => commands::plan::run_init(args, &assumptions),
        Commands::Show(args) => commands::plan::run_show(args, &assumptions),
        Commands::Analyze(args) => commands::plan::run_analyze(args, &assumptions),
        Commands::AddAccount(args) => commands::plan::run_add_account(args, &assumptions),
        Commands::EditAccount(args) => commands::plan::run_edit_account(args, &assumptions),
        Commands::Project(args) => commands::engine::run_project(args, &assumptions),
        Commands::CashFlow(args) => commands::engine::run_cash_flow(args, &assumptions),
        Commands::Contribution(args) => commands::engine::run_contribution(args, &assumptions),
        Commands::Expenses(args) => commands::engine::run_expenses(args),
        Commands::Accounts(args) => commands::engine::run_accounts(args),
        Commands::Strategy(args) => commands::engine::run_strategy(args),
        Commands::Version => Ok(serde_json::json!({
            "name": "rpw",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let format = cli.output.clone();
    match run(cli) {
        Ok(value) => {
            output::format_output(&format, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
