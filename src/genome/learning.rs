//! Reward propagation rule
//!
//! After a game every (canonical grid, canonical move) the bot visited is
//! credited with `total * rate`, where `total` is the current score mass of
//! that grid's genome and `rate` depends on the game result. Moves are not
//! discounted by their position in the game.

use serde::{Deserialize, Serialize};

use super::store::{Genome, MAX_SCORE};
use crate::tictactoe::GameResult;

/// Signed reward fractions per game result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardRates {
    pub win: f64,
    pub draw: f64,
    pub loss: f64,
}

impl Default for RewardRates {
    fn default() -> Self {
        RewardRates {
            win: 0.2,
            draw: 0.1,
            loss: -0.05,
        }
    }
}

impl RewardRates {
    pub fn rate_for(&self, result: GameResult) -> f64 {
        match result {
            GameResult::Win => self.win,
            GameResult::Draw => self.draw,
            GameResult::Loss => self.loss,
        }
    }

    /// Parse `win=0.2,draw=0.1,loss=-0.05`; omitted keys keep their defaults
    pub fn parse(text: &str) -> crate::Result<Self> {
        let mut rates = RewardRates::default();
        for part in text.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) =
                part.split_once('=')
                    .ok_or_else(|| crate::Error::InvalidConfiguration {
                        message: format!("reward entry '{part}' is not key=value"),
                    })?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| crate::Error::InvalidConfiguration {
                    message: format!("reward value '{value}' is not a number"),
                })?;
            match key.trim() {
                "win" => rates.win = value,
                "draw" => rates.draw = value,
                "loss" => rates.loss = value,
                other => {
                    return Err(crate::Error::InvalidConfiguration {
                        message: format!("unknown reward key '{other}' (expected win, draw or loss)"),
                    });
                }
            }
        }
        Ok(rates)
    }
}

/// Credit the move at `index` in `genome` with `rate` times the genome total.
///
/// Returns the updated copy, or `None` when the score at `index` is 0: such a
/// cell was occupied when the genome was created and must stay 0. A positive
/// score never drops below 1 and never rises above [`MAX_SCORE`].
pub fn reinforce(genome: &Genome, index: usize, rate: f64) -> Option<Genome> {
    let old = genome.score(index);
    if old == 0 {
        return None;
    }

    let total = genome.total();
    // `as` saturates on out-of-range floats
    let mut new = ((old as f64 + total as f64 * rate).round() as i64).min(MAX_SCORE);
    if old > 0 && new <= 0 {
        new = 1;
    }

    let mut updated = *genome;
    updated.set_score(index, new);
    Some(updated)
}
