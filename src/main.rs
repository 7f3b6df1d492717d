use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fincalc::AppCommand;
use fincalc::cli::budget::BudgetAction;
use fincalc::cli::calculators::{AffordArgs, Calculation, EmiArgs, GoalArgs, LumpsumArgs, SipArgs};
use fincalc::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Emi(args) => AppCommand::Calculate(Calculation::Emi(args)),
            Commands::Sip(args) => AppCommand::Calculate(Calculation::Sip(args)),
            Commands::Lumpsum(args) => AppCommand::Calculate(Calculation::Lumpsum(args)),
            Commands::Goal(args) => AppCommand::Calculate(Calculation::Goal(args)),
            Commands::Afford(args) => AppCommand::Calculate(Calculation::Afford(args)),
            Commands::Budget { action } => {
                AppCommand::Budget(action.unwrap_or(BudgetAction::Show))
            }
            Commands::Currencies { filter } => AppCommand::Currencies(filter),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Monthly installment for a loan
    Emi(EmiArgs),
    /// Future value of a monthly SIP
    Sip(SipArgs),
    /// Future value of a one-time investment
    Lumpsum(LumpsumArgs),
    /// Monthly SIP needed to reach a target amount
    Goal(GoalArgs),
    /// Largest loan a monthly installment can pay off
    Afford(AffordArgs),
    /// Manage the two-currency income and expense budget
    Budget {
        #[command(subcommand)]
        action: Option<BudgetAction>,
    },
    /// List supported currencies, optionally filtered by code or name
    Currencies { filter: Option<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fincalc::cli::setup::setup(),
        Some(cmd) => fincalc::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
