//! Genome-based learning: per-board score vectors, the reward rule, the text
//! file format and the bot that plays from them.

pub mod bot;
pub mod learning;
pub mod persistence;
pub mod store;

pub use bot::{GeneticBot, HistoryEntry, NO_RECORDS};
pub use learning::{RewardRates, reinforce};
pub use persistence::{LoadOutcome, LoadReport, SkippedLine};
pub use store::{DEFAULT_INITIAL_SCORE, Genome, GenomeStore, MAX_SCORE};
