use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fundtrack::core::ValuationStrategy;
use fundtrack::core::log::init_logging;

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Value every fund against its cost basis once
    Summary,
    /// Mark the quick portfolios against the previous close once
    Quick,
    /// Refresh on the configured interval
    Watch {
        /// Valuation to display: cost-basis or previous-close
        #[arg(short, long, default_value_t = ValuationStrategy::CostBasis)]
        strategy: ValuationStrategy,

        /// Stop after this many refresh cycles
        #[arg(short = 'n', long)]
        cycles: Option<usize>,
    },
}

impl From<Commands> for fundtrack::AppCommand {
    fn from(cmd: Commands) -> fundtrack::AppCommand {
        match cmd {
            Commands::Summary => fundtrack::AppCommand::Summary,
            Commands::Quick => fundtrack::AppCommand::Quick,
            Commands::Watch { strategy, cycles } => {
                fundtrack::AppCommand::Watch { strategy, cycles }
            }
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => fundtrack::cli::setup::setup_at_path(path),
            None => fundtrack::cli::setup::setup(),
        },
        Some(cmd) => fundtrack::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
