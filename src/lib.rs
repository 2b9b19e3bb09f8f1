//! Genetic tic-tac-toe bots
//!
//! This crate provides:
//! - A tic-tac-toe board with symmetry canonicalization under the 8 rotations
//!   and reflections of the square
//! - Genome stores holding one score per cell for every canonical board seen
//! - A learning bot that picks moves by roulette-wheel selection and rewards
//!   every decision of a game by its result
//! - A plain-text genome file format
//! - A minimax opponent, match loops and an evolutionary population trainer

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod genome;
pub mod minimax;
pub mod tictactoe;
pub mod training;

pub use agent::Agent;
pub use config::{BotConfig, PopulationConfig};
pub use error::{Error, Result};
pub use genome::{GeneticBot, Genome, GenomeStore, LoadOutcome, RewardRates};
pub use minimax::MinimaxPlayer;
pub use tictactoe::{Board, Cell, GameResult, Grid, Move, Player};
pub use training::{Population, TrainingMode};
