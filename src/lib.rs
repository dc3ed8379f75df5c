pub mod cli;
pub mod core;
pub mod providers;

use crate::core::ValuationStrategy;
use crate::core::config::AppConfig;
use crate::core::refresh::Tracker;
use crate::providers::SinaQuoteProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    /// One refresh, valued against each holding's cost basis.
    Summary,
    /// One refresh, marked against the previous close.
    Quick,
    /// Refresh on the configured interval.
    Watch {
        strategy: ValuationStrategy,
        cycles: Option<usize>,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fundtrack starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = SinaQuoteProvider::new(config.sina_base_url())?;
    let mut tracker = Tracker::new(config, provider);

    match command {
        AppCommand::Summary => cli::summary::run(&mut tracker).await,
        AppCommand::Quick => cli::quick::run(&mut tracker).await,
        AppCommand::Watch { strategy, cycles } => {
            cli::watch::run(&mut tracker, strategy, cycles).await
        }
    }
}
