//! TRILEMMA CLI - Command-line interface
//!
//! Commands:
//! - tournament: Run one round-robin pass over a roster
//! - experiment: Repeat the pass and write consolidated score tables
//! - strategies: List the available strategy tags

mod experiment_cmd;
mod tournament_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use trilemma_core::StrategyKind;

#[derive(Parser)]
#[command(name = "trilemma")]
#[command(about = "Three-player iterated prisoner's dilemma tournaments")]
struct Cli {
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single tournament pass
    Tournament(tournament_cmd::TournamentArgs),
    /// Run repeated tournament passes and save score tables
    Experiment(experiment_cmd::ExperimentArgs),
    /// List available strategies
    Strategies,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Tournament(args) => tournament_cmd::run(args, cli.seed),
        Commands::Experiment(args) => experiment_cmd::run(args, cli.seed),
        Commands::Strategies => {
            print_strategies();
            Ok(())
        }
    }
}

fn print_strategies() {
    for kind in StrategyKind::ALL {
        let marker = if kind.is_stochastic() { "*" } else { " " };
        println!("{:<32} {} {}", kind.name(), marker, kind.description());
    }
    println!("\n* uses randomness");
}
