//! Evaluate command - Measure a saved bot against minimax

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Serialize;

use crate::{
    cli::output::{print_kv, print_section, print_tally},
    config::BotConfig,
    genome::{GeneticBot, LoadOutcome},
    tictactoe::Player,
    training::{NullObserver, Tally, bot_vs_minimax},
};

#[derive(Parser, Debug)]
#[command(about = "Evaluate a saved bot against minimax")]
pub struct EvaluateArgs {
    /// Genome file to evaluate
    pub genomes: PathBuf,

    /// Games to play on each side
    #[arg(long, short = 'g', default_value_t = 10)]
    pub games: usize,

    /// Random seed for the bot
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the results as JSON to this path
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Results of an evaluation run
#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationReport {
    pub as_x: Tally,
    pub as_o: Tally,
}

impl EvaluationReport {
    pub fn total(&self) -> Tally {
        Tally {
            wins: self.as_x.wins + self.as_o.wins,
            draws: self.as_x.draws + self.as_o.draws,
            losses: self.as_x.losses + self.as_o.losses,
        }
    }
}

/// Play `games` games on each side against minimax.
///
/// The bot keeps learning in memory between games, but nothing is written
/// to disk.
pub fn evaluate(bot: &mut GeneticBot, games: usize) -> crate::Result<EvaluationReport> {
    let mut report = EvaluationReport::default();
    for (bot_is_x, tally) in [(true, &mut report.as_x), (false, &mut report.as_o)] {
        for _ in 0..games {
            tally.record(bot_vs_minimax(bot, bot_is_x, &mut NullObserver)?);
        }
    }
    Ok(report)
}

pub fn execute(args: EvaluateArgs) -> Result<()> {
    let mut config = BotConfig::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    let mut bot = GeneticBot::new(Player::X, &config);

    let outcome = bot
        .load_genomes(&args.genomes)
        .with_context(|| format!("Failed to load {}", args.genomes.display()))?;
    let LoadOutcome::Loaded(load) = outcome else {
        bail!("Genome file {} could not be opened", args.genomes.display());
    };

    print_section(&format!("Evaluating {}", args.genomes.display()));
    print_kv("Genomes", &load.entries.to_string());
    if !load.skipped.is_empty() {
        print_kv("Skipped lines", &load.skipped.len().to_string());
    }

    let report = evaluate(&mut bot, args.games)?;
    print_tally("As X", &report.as_x);
    print_tally("As O", &report.as_o);
    print_tally("Total", &report.total());

    if let Some(path) = &args.export {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer_pretty(file, &report)?;
        println!("\nResults written to {}", path.display());
    }

    Ok(())
}
