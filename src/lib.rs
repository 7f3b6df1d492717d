pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::budget::BudgetAction;
use crate::cli::calculators::Calculation;
use crate::core::config::AppConfig;
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Calculate(Calculation),
    Budget(BudgetAction),
    Currencies(Option<String>),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fincalc starting...");

    match command {
        AppCommand::Calculate(calculation) => cli::calculators::run(&calculation),
        AppCommand::Currencies(filter) => cli::currencies::run(filter.as_deref()),
        AppCommand::Budget(action) => {
            let config = match config_path {
                Some(path) => AppConfig::load_from_path(path)?,
                None => AppConfig::load()?,
            };
            debug!("Loaded config: {config:#?}");
            cli::budget::run(action, &config).await
        }
    }
}
