//! Configuration types for bots and population training.
//!
//! Every struct has sensible defaults and builder-style setters, and can be
//! read from a JSON file. Command-line flags are applied on top of whatever a
//! file provides.

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    genome::{DEFAULT_INITIAL_SCORE, RewardRates},
};

/// Configuration for a single learning bot.
///
/// # Examples
///
/// ```
/// use genetac::config::BotConfig;
///
/// let config = BotConfig::default().with_seed(42).with_initial_score(50);
/// assert_eq!(config.initial_score, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Score given to each playable cell of a newly seen board
    pub initial_score: i64,
    /// Reward fraction applied per game result
    pub rewards: RewardRates,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl BotConfig {
    pub fn with_initial_score(mut self, initial_score: i64) -> Self {
        self.initial_score = initial_score;
        self
    }

    pub fn with_rewards(mut self, rewards: RewardRates) -> Self {
        self.rewards = rewards;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.initial_score < 1 {
            return Err(invalid(format!(
                "initial_score must be at least 1, got {}",
                self.initial_score
            )));
        }
        let RewardRates { win, draw, loss } = self.rewards;
        if ![win, draw, loss].iter().all(|r| r.is_finite()) {
            return Err(invalid("reward rates must be finite numbers".to_string()));
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            initial_score: DEFAULT_INITIAL_SCORE,
            rewards: RewardRates::default(),
            seed: None,
        }
    }
}

/// Configuration for the evolutionary population trainer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Number of individuals
    pub individuals: usize,
    /// Number of training rounds
    pub rounds: usize,
    /// A new generation is bred every this many rounds
    pub crossover_rounds: usize,
    /// Mutation probability while the best individual keeps improving
    pub min_mutation: f64,
    /// Mutation probability after long stagnation
    pub max_mutation: f64,
    /// Settings shared by every bot in the population
    pub bot: BotConfig,
}

impl PopulationConfig {
    /// Standard deviation of the Gaussian noise added by a mutation
    pub fn mutation_step(&self) -> f64 {
        (self.max_mutation - self.min_mutation) * 2.0
    }

    pub fn with_individuals(mut self, individuals: usize) -> Self {
        self.individuals = individuals;
        self
    }

    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    pub fn with_crossover_rounds(mut self, crossover_rounds: usize) -> Self {
        self.crossover_rounds = crossover_rounds;
        self
    }

    pub fn with_mutation(mut self, min: f64, max: f64) -> Self {
        self.min_mutation = min;
        self.max_mutation = max;
        self
    }

    pub fn with_bot(mut self, bot: BotConfig) -> Self {
        self.bot = bot;
        self
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        if self.individuals < 2 {
            return Err(invalid(format!(
                "a population needs at least 2 individuals, got {}",
                self.individuals
            )));
        }
        if self.crossover_rounds == 0 {
            return Err(invalid("crossover_rounds must be at least 1".to_string()));
        }
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.min_mutation)
            || !in_unit(self.max_mutation)
            || self.min_mutation > self.max_mutation
        {
            return Err(invalid(format!(
                "mutation bounds must satisfy 0 <= min <= max <= 1, got min={} max={}",
                self.min_mutation, self.max_mutation
            )));
        }
        self.bot.validate()
    }

    /// Read a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open config file {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create config file {}", path.display()),
            source,
        })?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            individuals: 2,
            rounds: 6,
            crossover_rounds: 5,
            min_mutation: 0.05,
            max_mutation: 0.3,
            bot: BotConfig::default(),
        }
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfiguration { message }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PopulationConfig::default();
        config.validate().unwrap();
        assert!((config.mutation_step() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(PopulationConfig::default().with_individuals(1).validate().is_err());
        assert!(PopulationConfig::default().with_crossover_rounds(0).validate().is_err());
        assert!(PopulationConfig::default().with_mutation(0.5, 0.1).validate().is_err());
        assert!(PopulationConfig::default().with_mutation(0.0, 1.5).validate().is_err());
        let bot = BotConfig::default().with_initial_score(0);
        assert!(PopulationConfig::default().with_bot(bot).validate().is_err());
    }

    #[test]
    fn json_roundtrip_and_partial_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("population.json");
        let config = PopulationConfig::default()
            .with_individuals(4)
            .with_rounds(20)
            .with_bot(BotConfig::default().with_seed(9));
        config.save(&path).unwrap();
        assert_eq!(PopulationConfig::from_file(&path).unwrap(), config);

        std::fs::write(&path, r#"{ "rounds": 3, "bot": { "initial_score": 10 } }"#).unwrap();
        let partial = PopulationConfig::from_file(&path).unwrap();
        assert_eq!(partial.rounds, 3);
        assert_eq!(partial.individuals, 2);
        assert_eq!(partial.bot.initial_score, 10);
        assert_eq!(partial.bot.rewards, RewardRates::default());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = PopulationConfig::from_file(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
