//! # eq-cli
//!
//! Command-line interface for Eternal Quest.
//!
//! - `eq goal create/list/record` - manage goals and record progress
//! - `eq score` - show the accumulated score
//! - `eq export/import` - copy the saved state to or from another file
//!   (`eq export --json` writes a read-only JSON snapshot)
//!
//! State lives in `.eq/` under the project root (see `eq_goal::QuestConfig`).

mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use eq_goal::QuestConfig;
use tracing_subscriber::{fmt, EnvFilter};

/// Eternal Quest: set goals, record progress, earn points.
#[derive(Parser)]
#[command(name = "eq", version, about)]
struct Cli {
    /// Project root directory (defaults to current directory).
    #[arg(long, default_value = ".")]
    project_root: PathBuf,

    /// Verbosity level (-v, -vv, -vvv). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create, list, and record against goals.
    Goal {
        #[command(subcommand)]
        command: commands::goal::GoalCommands,
    },
    /// Show the current score.
    Score,
    /// Write the saved goals and score to another file.
    Export {
        /// Destination file.
        file: PathBuf,
        /// Write a JSON snapshot instead of the goal file format.
        /// JSON snapshots are for reports and cannot be imported.
        #[arg(long)]
        json: bool,
    },
    /// Replace the saved goals and score with the contents of a file.
    Import {
        /// Source file in the goal file format.
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let project_root = cli.project_root.canonicalize().unwrap_or(cli.project_root);
    let config = QuestConfig::for_project(&project_root)?;
    let quest = commands::Quest::open(&config)?;

    match &cli.command {
        Commands::Goal { command } => commands::goal::execute(command, &quest),
        Commands::Score => commands::state::show_score(&quest),
        Commands::Export { file, json } => commands::state::export(&quest, file, *json),
        Commands::Import { file } => commands::state::import(&quest, file),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
