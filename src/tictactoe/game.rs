//! Game outcomes and per-player results

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::{Move, Player};

/// Outcome of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    Win(Player),
    Draw,
}

impl GameOutcome {
    /// The outcome seen from `player`'s side of the board
    pub fn result_for(self, player: Player) -> GameResult {
        match self {
            GameOutcome::Win(winner) if winner == player => GameResult::Win,
            GameOutcome::Win(_) => GameResult::Loss,
            GameOutcome::Draw => GameResult::Draw,
        }
    }
}

/// Result of a finished game from one participant's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Score used for fitness bookkeeping: +1, 0 or -1
    pub fn score(self) -> i64 {
        match self {
            GameResult::Win => 1,
            GameResult::Draw => 0,
            GameResult::Loss => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            GameResult::Win => GameResult::Loss,
            GameResult::Loss => GameResult::Win,
            GameResult::Draw => GameResult::Draw,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GameResult::Win => "win",
            GameResult::Loss => "loss",
            GameResult::Draw => "draw",
        };
        f.write_str(s)
    }
}

/// Record of a finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub moves: Vec<(Player, Move)>,
    pub outcome: GameOutcome,
}

impl GameRecord {
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}
