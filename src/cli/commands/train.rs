//! Train command - Evolve a population of learning bots

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use crate::{
    cli::output::{print_kv, print_section, print_tally},
    config::PopulationConfig,
    genome::{LoadOutcome, RewardRates},
    training::{BoardPrinter, Population, ProgressObserver, TrainingMode, TrainingSummary},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Every individual plays minimax as X and as O each round
    Minimax,
    /// Individuals play each other in random pairs
    SelfPlay,
}

impl From<ModeArg> for TrainingMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Minimax => TrainingMode::Minimax,
            ModeArg::SelfPlay => TrainingMode::SelfPlay,
        }
    }
}

#[derive(Parser, Debug)]
#[command(about = "Train a population of bots", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Opponent the population trains against
    #[arg(long, short = 'm', value_enum, default_value_t = ModeArg::Minimax)]
    pub mode: ModeArg,

    /// JSON population config; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of individuals
    #[arg(long, short = 'n')]
    pub individuals: Option<usize>,

    /// Number of training rounds
    #[arg(long, short = 'r')]
    pub rounds: Option<usize>,

    /// Breed a new generation every this many rounds
    #[arg(long)]
    pub crossover_rounds: Option<usize>,

    /// Lowest mutation probability
    #[arg(long)]
    pub min_mutation: Option<f64>,

    /// Highest mutation probability
    #[arg(long)]
    pub max_mutation: Option<f64>,

    /// Score given to each playable cell of a new board
    #[arg(long)]
    pub initial_score: Option<i64>,

    /// Reward rates, e.g. "win=0.2,draw=0.1,loss=-0.05"
    #[arg(long)]
    pub rewards: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding X<i>.txt and BEST.txt; loaded before and saved after training
    #[arg(long, short = 'd')]
    pub genomes: Option<PathBuf>,

    /// Write a JSON training summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Print every board and move
    #[arg(long, short = 'p')]
    pub print: bool,

    /// Hide the progress bar
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl TrainArgs {
    /// Build the population config: file values first, then flags
    pub fn population_config(&self) -> Result<PopulationConfig> {
        let mut config = match &self.config {
            Some(path) => PopulationConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => PopulationConfig::default(),
        };

        if let Some(individuals) = self.individuals {
            config.individuals = individuals;
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        if let Some(crossover_rounds) = self.crossover_rounds {
            config.crossover_rounds = crossover_rounds;
        }
        if let Some(min) = self.min_mutation {
            config.min_mutation = min;
        }
        if let Some(max) = self.max_mutation {
            config.max_mutation = max;
        }
        if let Some(initial_score) = self.initial_score {
            config.bot.initial_score = initial_score;
        }
        if let Some(rewards) = &self.rewards {
            config.bot.rewards = RewardRates::parse(rewards)?;
        }
        if let Some(seed) = self.seed {
            config.bot.seed = Some(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.population_config()?;
    let mode = TrainingMode::from(args.mode);

    let mut population = Population::new(config)?;
    if !args.quiet && !args.print {
        population = population.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.print {
        population = population.with_observer(Box::new(BoardPrinter));
    }

    if let Some(dir) = &args.genomes {
        load_population(&mut population, dir)?;
    }

    print_section(&format!("Training {} individuals ({mode})", config.individuals));
    print_kv("Rounds", &config.rounds.to_string());
    print_kv("Crossover every", &format!("{} rounds", config.crossover_rounds));
    print_kv(
        "Mutation",
        &format!("{} - {}", config.min_mutation, config.max_mutation),
    );

    let summary = population.train(mode).context("Training failed")?;
    print_summary(&summary);

    if let Some(dir) = &args.genomes {
        population
            .save(dir)
            .with_context(|| format!("Failed to save genomes to {}", dir.display()))?;
        println!("\nGenomes saved to {}", dir.display());
    }

    if let Some(path) = &args.summary {
        summary
            .save_json(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }

    Ok(())
}

fn load_population(population: &mut Population, dir: &Path) -> Result<()> {
    let outcomes = population
        .load(dir)
        .with_context(|| format!("Failed to load genomes from {}", dir.display()))?;
    let loaded: usize = outcomes
        .iter()
        .filter_map(LoadOutcome::report)
        .map(|report| report.entries)
        .sum();
    let files = outcomes.iter().filter(|o| o.is_loaded()).count();
    println!(
        "Loaded {loaded} genomes from {files} of {} files in {}",
        outcomes.len(),
        dir.display()
    );
    Ok(())
}

fn print_summary(summary: &TrainingSummary) {
    print_section("Results");
    for individual in &summary.individuals {
        print_tally(&format!("BOT {}", individual.index), &individual.tally);
    }
    match summary.best_fitness {
        Some(fitness) => print_kv("Best fitness", &fitness.to_string()),
        None => print_kv("Best fitness", "no generation bred yet"),
    }
    print_kv("Best genomes", &summary.best_genomes.to_string());
    print_kv("Stagnation", &summary.stagnation.to_string());
    print_kv("Mutation rate", &format!("{:.3}", summary.mutation_rate));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let args = TrainArgs::parse_from([
            "train",
            "--mode",
            "self-play",
            "--individuals",
            "4",
            "--rewards",
            "loss=-0.1",
            "--seed",
            "5",
        ]);
        let config = args.population_config().unwrap();
        assert_eq!(args.mode, ModeArg::SelfPlay);
        assert_eq!(config.individuals, 4);
        assert_eq!(config.rounds, 6);
        assert_eq!(config.bot.rewards.loss, -0.1);
        assert_eq!(config.bot.seed, Some(5));
    }

    #[test]
    fn invalid_flags_are_rejected() {
        let args = TrainArgs::parse_from(["train", "--min-mutation", "0.9", "--max-mutation", "0.1"]);
        assert!(args.population_config().is_err());
    }
}
