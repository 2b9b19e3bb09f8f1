//! Evolutionary population trainer
//!
//! A small population of learning bots plays games, each individual's fitness
//! moves by +1/-1 per win/loss, and every few rounds a new generation is bred
//! from the best individual seen so far. Breeding averages genomes and adds
//! Gaussian noise whose frequency grows while the best individual stagnates.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

use super::{
    matches::{bot_vs_bot, bot_vs_minimax},
    observer::{Observer, ObserverSet, Tally},
};
use crate::{
    Error, Result,
    config::PopulationConfig,
    genome::{GeneticBot, Genome, GenomeStore, LoadOutcome, MAX_SCORE},
    tictactoe::{GameResult, Grid, Player},
};

/// Stagnant crossovers after which the mutation rate reaches its maximum
const STAGNATION_HORIZON: f64 = 10.0;

/// Who the population trains against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrainingMode {
    /// Individuals are paired at random and play each other
    SelfPlay,
    /// Every individual plays minimax once as X and once as O per round
    Minimax,
}

impl std::fmt::Display for TrainingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingMode::SelfPlay => f.write_str("self-play"),
            TrainingMode::Minimax => f.write_str("minimax"),
        }
    }
}

/// A bot together with its running fitness
#[derive(Debug, Clone)]
pub struct Individual {
    pub bot: GeneticBot,
    pub fitness: i64,
    pub tally: Tally,
}

impl Individual {
    fn new(bot: GeneticBot) -> Self {
        Self {
            bot,
            fitness: 0,
            tally: Tally::default(),
        }
    }

    fn record(&mut self, result: GameResult) {
        self.fitness += result.score();
        self.tally.record(result);
    }
}

/// Per-individual line of a [`TrainingSummary`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualSummary {
    pub index: usize,
    pub fitness: i64,
    pub genomes: usize,
    #[serde(flatten)]
    pub tally: Tally,
}

/// Result of a training run, written as JSON by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub mode: TrainingMode,
    pub rounds: usize,
    pub individuals: Vec<IndividualSummary>,
    /// `None` until the first generation has been bred
    pub best_fitness: Option<i64>,
    pub best_genomes: usize,
    pub stagnation: usize,
    pub mutation_rate: f64,
}

impl TrainingSummary {
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = fs::File::create(path).map_err(|source| Error::Io {
            operation: format!("create summary file {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Path of individual `index`'s genome file inside `dir`
pub fn individual_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("X{index}.txt"))
}

/// Path of the best individual's genome file inside `dir`
pub fn best_path(dir: &Path) -> PathBuf {
    dir.join("BEST.txt")
}

/// Add Gaussian noise to the playable scores of `genome`.
///
/// Each index that is empty in `grid` is perturbed with probability `rate` by
/// `round(noise)` and kept within `1..=MAX_SCORE`. Occupied indices keep their
/// score.
pub fn mutate<R>(genome: &Genome, grid: &Grid, rate: f64, noise: &Normal<f64>, rng: &mut R) -> Genome
where
    R: Rng + ?Sized,
{
    let mut mutated = *genome;
    for index in grid.empty_indices() {
        if rng.random_bool(rate) {
            let delta = rng.sample(noise).round() as i64;
            let score = genome.score(index).saturating_add(delta);
            mutated.set_score(index, score.clamp(1, MAX_SCORE));
        }
    }
    mutated
}

/// Merge `partner` into a copy of `base`: shared grids are averaged index by
/// index (integer division), grids only `partner` knows are copied. Every
/// grid taken from `partner` is then passed through `mutate_entry`.
pub fn crossover_stores(
    base: &GenomeStore,
    partner: &GenomeStore,
    mut mutate_entry: impl FnMut(&Grid, Genome) -> Genome,
) -> GenomeStore {
    let mut child = base.clone();
    for (grid, theirs) in partner.iter() {
        let merged = match child.get(grid) {
            Some(ours) => {
                let mut scores = [0; 9];
                for (index, slot) in scores.iter_mut().enumerate() {
                    let sum = i128::from(ours.score(index)) + i128::from(theirs.score(index));
                    *slot = (sum / 2) as i64;
                }
                Genome::from_scores(scores)
            }
            None => *theirs,
        };
        child.insert(*grid, mutate_entry(grid, merged));
    }
    child
}

/// Evolving population of learning bots
pub struct Population {
    config: PopulationConfig,
    individuals: Vec<Individual>,
    best: Individual,
    /// Set once a crossover has chosen a best individual
    has_best: bool,
    stagnation: usize,
    mutation_rate: f64,
    rng: StdRng,
    observers: ObserverSet,
}

impl std::fmt::Debug for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Population")
            .field("config", &self.config)
            .field("individuals", &self.individuals.len())
            .field("best_fitness", &self.best_fitness())
            .field("stagnation", &self.stagnation)
            .field("mutation_rate", &self.mutation_rate)
            .finish()
    }
}

impl Population {
    /// Create a population of fresh bots.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `config` does not validate.
    pub fn new(config: PopulationConfig) -> Result<Self> {
        config.validate()?;

        let base_seed = config.bot.seed.unwrap_or_else(rand::random::<u64>);
        let individuals: Vec<Individual> = (0..config.individuals)
            .map(|i| {
                let bot_config = config.bot.with_seed(base_seed.wrapping_add(i as u64 + 1));
                Individual::new(GeneticBot::new(Player::X, &bot_config))
            })
            .collect();
        let best = individuals[0].clone();

        Ok(Self {
            config,
            individuals,
            best,
            has_best: false,
            stagnation: 0,
            mutation_rate: config.min_mutation,
            rng: StdRng::seed_from_u64(base_seed),
            observers: ObserverSet::new(),
        })
    }

    /// Add an observer notified of every game and round
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &PopulationConfig {
        &self.config
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn individuals_mut(&mut self) -> &mut [Individual] {
        &mut self.individuals
    }

    pub fn best(&self) -> &Individual {
        &self.best
    }

    pub fn best_fitness(&self) -> Option<i64> {
        self.has_best.then_some(self.best.fitness)
    }

    pub fn stagnation(&self) -> usize {
        self.stagnation
    }

    pub fn mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    /// Recompute the mutation probability from the stagnation counter
    pub fn update_mutation_rate(&mut self) {
        let factor = (self.stagnation as f64 / STAGNATION_HORIZON).min(1.0);
        self.mutation_rate =
            self.config.min_mutation + (self.config.max_mutation - self.config.min_mutation) * factor;
    }

    /// Breed the next generation from the best individual.
    ///
    /// The current individuals are ranked by fitness. If the leader beats the
    /// best fitness so far it becomes the new best and stagnation resets,
    /// otherwise stagnation grows. The next generation is the best individual
    /// followed by one child per remaining ranked individual.
    pub fn crossover(&mut self) -> Result<()> {
        self.individuals.sort_by(|a, b| b.fitness.cmp(&a.fitness));

        let leader = &self.individuals[0];
        if !self.has_best || leader.fitness > self.best.fitness {
            self.best = leader.clone();
            self.best.bot.clear_history();
            self.has_best = true;
            self.stagnation = 0;
        } else {
            self.stagnation += 1;
        }
        self.update_mutation_rate();

        let noise = Normal::new(0.0, self.config.mutation_step()).map_err(|e| {
            Error::InvalidConfiguration {
                message: format!("mutation step: {e}"),
            }
        })?;
        let rate = self.mutation_rate;

        let mut next = Vec::with_capacity(self.individuals.len());
        next.push(self.best.clone());
        for partner in &self.individuals[1..] {
            let rng = &mut self.rng;
            let store = crossover_stores(self.best.bot.store(), partner.bot.store(), |grid, genome| {
                mutate(&genome, grid, rate, &noise, &mut *rng)
            });

            let mut bot = self.best.bot.clone();
            *bot.store_mut() = store;
            bot.reseed(Some(self.rng.random::<u64>()));

            let fitness = ((i128::from(self.best.fitness) + i128::from(partner.fitness)) / 2) as i64;
            next.push(Individual {
                bot,
                fitness,
                tally: Tally::default(),
            });
        }
        self.individuals = next;

        self.observers
            .on_crossover(self.best.fitness, self.stagnation, self.mutation_rate)
    }

    /// Run the configured number of rounds in `mode`
    pub fn train(&mut self, mode: TrainingMode) -> Result<TrainingSummary> {
        match mode {
            TrainingMode::SelfPlay => self.train_self_play(),
            TrainingMode::Minimax => self.train_vs_minimax(),
        }
    }

    /// Random pairings; the first of each pair plays X.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an odd population size.
    pub fn train_self_play(&mut self) -> Result<TrainingSummary> {
        if !self.individuals.len().is_multiple_of(2) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "self-play needs an even number of individuals, got {}",
                    self.individuals.len()
                ),
            });
        }

        let rounds = self.config.rounds;
        self.observers.on_training_start(rounds)?;
        for round in 0..rounds {
            self.individuals.shuffle(&mut self.rng);
            for pair in self.individuals.chunks_exact_mut(2) {
                if let [x, o] = pair {
                    let result = bot_vs_bot(&mut x.bot, &mut o.bot, &mut self.observers)?;
                    x.record(result);
                    o.record(result.reversed());
                }
            }
            self.end_round(round)?;

            if round % self.config.crossover_rounds == 0 {
                self.crossover()?;
            }
        }
        self.observers.on_training_end()?;
        Ok(self.summary(TrainingMode::SelfPlay))
    }

    /// Every individual plays minimax as X and then as O each round
    pub fn train_vs_minimax(&mut self) -> Result<TrainingSummary> {
        let rounds = self.config.rounds;
        self.observers.on_training_start(rounds)?;
        for round in 0..rounds {
            for individual in &mut self.individuals {
                for bot_is_x in [true, false] {
                    let result = bot_vs_minimax(&mut individual.bot, bot_is_x, &mut self.observers)?;
                    individual.record(result);
                }
            }
            self.end_round(round)?;

            if round % self.config.crossover_rounds == 0 && round != 0 {
                self.crossover()?;
            }
        }
        self.observers.on_training_end()?;
        Ok(self.summary(TrainingMode::Minimax))
    }

    fn end_round(&mut self, round: usize) -> Result<()> {
        let tallies: Vec<Tally> = self.individuals.iter().map(|i| i.tally).collect();
        self.observers.on_round_end(round, &tallies)
    }

    pub fn summary(&self, mode: TrainingMode) -> TrainingSummary {
        TrainingSummary {
            mode,
            rounds: self.config.rounds,
            individuals: self
                .individuals
                .iter()
                .enumerate()
                .map(|(index, individual)| IndividualSummary {
                    index,
                    fitness: individual.fitness,
                    genomes: individual.bot.store().len(),
                    tally: individual.tally,
                })
                .collect(),
            best_fitness: self.best_fitness(),
            best_genomes: self.best.bot.store().len(),
            stagnation: self.stagnation,
            mutation_rate: self.mutation_rate,
        }
    }

    /// Write `X<i>.txt` for every individual and `BEST.txt` into `dir`
    pub fn save(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|source| Error::Io {
            operation: format!("create genome directory {}", dir.display()),
            source,
        })?;
        for (index, individual) in self.individuals.iter().enumerate() {
            individual.bot.save_genomes(individual_path(dir, index))?;
        }
        self.best.bot.save_genomes(best_path(dir))
    }

    /// Load every individual's genome file and `BEST.txt` from `dir`.
    ///
    /// Missing files leave the corresponding bot untouched. Returns one
    /// outcome per individual followed by the outcome for `BEST.txt`.
    pub fn load(&mut self, dir: &Path) -> Result<Vec<LoadOutcome>> {
        let mut outcomes = Vec::with_capacity(self.individuals.len() + 1);
        for (index, individual) in self.individuals.iter_mut().enumerate() {
            outcomes.push(individual.bot.load_genomes(individual_path(dir, index))?);
        }
        outcomes.push(self.best.bot.load_genomes(best_path(dir))?);
        Ok(outcomes)
    }
}
