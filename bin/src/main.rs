//! dailybars CLI - Daily stock price ETL into SQLite.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use dailybars_lib::{RunTime, Settings, parse_run_time};

mod commands;
mod display;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "dailybars")]
#[command(about = "Fetch daily stock prices, validate them and store them in SQLite", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the pipeline once (the default)
    Run,

    /// Run the pipeline every day at a fixed local time until interrupted
    Schedule {
        /// Time of day to run (24-hour HH:MM)
        #[arg(short, long, value_parser = parse_run_time, default_value = "09:00")]
        time: RunTime,

        /// Also run once immediately before waiting
        #[arg(long)]
        now: bool,
    },

    /// Show what the database holds
    Stats {
        /// Also show the latest rows stored for this symbol
        symbol: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging::init(cli.verbose, cli.quiet);

    let settings = Settings::from_env().context("Configuration error")?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(&settings).await,
        Commands::Schedule { time, now } => commands::schedule::schedule(&settings, time, now).await,
        Commands::Stats { symbol } => commands::stats::show_stats(&settings, symbol.as_deref()),
    }
}
