//! genetac CLI - Train, play against and inspect genome-driven tic-tac-toe bots

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "genetac")]
#[command(version, about = "Genetic tic-tac-toe bots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a population of bots
    Train(Box<genetac::cli::commands::train::TrainArgs>),

    /// Play against a bot
    Play(genetac::cli::commands::play::PlayArgs),

    /// Evaluate a saved bot against minimax
    Evaluate(genetac::cli::commands::evaluate::EvaluateArgs),

    /// Show the canonical form of a board and its stored genome
    Inspect(genetac::cli::commands::inspect::InspectArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Train(args) => genetac::cli::commands::train::execute(*args),
        Commands::Play(args) => genetac::cli::commands::play::execute(args),
        Commands::Evaluate(args) => genetac::cli::commands::evaluate::execute(args),
        Commands::Inspect(args) => genetac::cli::commands::inspect::execute(args),
    }
}
