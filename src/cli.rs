use clap::{Parser, Subcommand};

use crate::commands;

#[derive(Parser)]
#[command(name = "stockwatcher")]
#[command(about = "Bollinger-band signal scanner with Telegram alerts", long_about = None)]
pub struct Cli {
    /// Defaults to `scan` when no subcommand is given, so a bare
    /// invocation from a scheduler just works.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one scan pass over the universe
    Scan {
        /// Bypass the per-day dedup store and send the summary regardless
        #[arg(long)]
        force: bool,

        /// Days of daily history to request per symbol
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Per-sector result cap in the ranked report
        #[arg(long)]
        top_n: Option<usize>,
    },
    /// Show today's persisted alert state
    Status,
}

pub fn run() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Scan {
        force: false,
        lookback_days: None,
        top_n: None,
    }) {
        Commands::Scan {
            force,
            lookback_days,
            top_n,
        } => {
            commands::scan::run(force, lookback_days, top_n);
        }
        Commands::Status => {
            commands::status::run();
        }
    }
}
