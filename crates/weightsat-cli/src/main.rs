//! weightsat CLI - Command-line interface for the weighted SAT solvers.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "weightsat")]
#[command(author, version, about = "Maximum-weight satisfying assignments for weighted CNF", long_about = None)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a maximum-weight satisfying assignment
    Solve(commands::solve::SolveArgs),
    /// Check a model against a formula
    Verify(commands::verify::VerifyArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Solve(args) => commands::solve::run(args),
        Commands::Verify(args) => commands::verify::run(args),
    }
}
