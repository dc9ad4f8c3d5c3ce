use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use nbp_rates::cli::query::Query;
use nbp_rates::core::log::init_logging;

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
    /// Run the HTTP service
    Serve,
    /// Average mid rate of a currency on a given date
    Exchange {
        /// Currency code, e.g. USD
        currency: String,
        /// Publication date as YYYY-MM-DD
        date: String,
    },
    /// Lowest and highest mid rate over the last N quotations
    Averages {
        currency: String,
        /// Number of quotations, 1 to 255
        quotations: String,
    },
    /// Largest ask/bid difference over the last N quotations
    Spread {
        currency: String,
        /// Number of quotations, 1 to 255
        quotations: String,
    },
}

impl From<Commands> for nbp_rates::AppCommand {
    fn from(cmd: Commands) -> nbp_rates::AppCommand {
        match cmd {
            Commands::Serve => nbp_rates::AppCommand::Serve,
            Commands::Exchange { currency, date } => {
                nbp_rates::AppCommand::Query(Query::Exchange { currency, date })
            }
            Commands::Averages {
                currency,
                quotations,
            } => nbp_rates::AppCommand::Query(Query::Averages {
                currency,
                quotations,
            }),
            Commands::Spread {
                currency,
                quotations,
            } => nbp_rates::AppCommand::Query(Query::Spread {
                currency,
                quotations,
            }),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, matches!(cli.command, Some(Commands::Serve)));

    let result = match cli.command {
        Some(Commands::Setup) => nbp_rates::cli::setup::setup(),
        Some(cmd) => nbp_rates::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
