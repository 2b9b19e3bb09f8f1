//! Tic-Tac-Toe game implementation

pub mod board;
pub mod game;
pub mod lines;
pub mod symmetry;

pub use board::{Board, Cell, Grid, Move, Player};
pub use game::{GameOutcome, GameRecord, GameResult};
pub use lines::{LineAnalyzer, WINNING_LINES};
pub use symmetry::{Canonical, Symmetry, canonicalize, uncanonicalize};
