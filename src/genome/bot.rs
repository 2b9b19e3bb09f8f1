//! Learning bot that plays by roulette-wheel selection over genome scores.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    learning::{RewardRates, reinforce},
    persistence::{self, LoadOutcome},
    store::GenomeStore,
};
use crate::{
    Error,
    config::BotConfig,
    tictactoe::{Board, GameResult, Grid, Move, Player, canonicalize},
};

/// Message returned by [`GeneticBot::print_genome`] for unseen boards
pub const NO_RECORDS: &str = "This board state has no records";

/// One decision taken during the current game, in raw orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub grid: Grid,
    pub mv: Move,
}

/// Genome-driven tic-tac-toe player
#[derive(Clone)]
pub struct GeneticBot {
    symbol: Player,
    store: GenomeStore,
    history: Vec<HistoryEntry>,
    rewards: RewardRates,
    rng: StdRng,
}

impl std::fmt::Debug for GeneticBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneticBot")
            .field("symbol", &self.symbol)
            .field("genomes", &self.store.len())
            .field("history", &self.history.len())
            .field("rewards", &self.rewards)
            .finish()
    }
}

impl GeneticBot {
    /// Create a bot with an empty genome store.
    ///
    /// # Example
    /// ```
    /// use genetac::{config::BotConfig, genome::GeneticBot, tictactoe::{Board, Player}};
    ///
    /// let mut bot = GeneticBot::new(Player::X, &BotConfig::default().with_seed(7));
    /// let mv = bot.choose_move(&Board::new()).unwrap();
    /// assert!(mv.in_bounds());
    /// ```
    pub fn new(symbol: Player, config: &BotConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random::<u64>()),
        };
        Self {
            symbol,
            store: GenomeStore::with_initial_score(config.initial_score),
            history: Vec::new(),
            rewards: config.rewards,
            rng,
        }
    }

    /// Set or reset the bot's RNG seed
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.rng = match seed {
            Some(value) => StdRng::seed_from_u64(value),
            None => StdRng::seed_from_u64(rand::random::<u64>()),
        };
    }

    pub fn symbol(&self) -> Player {
        self.symbol
    }

    pub fn set_symbol(&mut self, symbol: Player) {
        self.symbol = symbol;
    }

    pub fn rewards(&self) -> RewardRates {
        self.rewards
    }

    pub fn store(&self) -> &GenomeStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut GenomeStore {
        &mut self.store
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Pick a move for `board` and record it in the history.
    ///
    /// Returns `None` only when the board has no empty cell.
    pub fn choose_move(&mut self, board: &Board) -> Option<Move> {
        let raw = board.grid();
        if raw.empty_count() == 0 {
            return None;
        }

        let canonical = canonicalize(&raw, Move::new(0, 0));
        let genome = *self.store.get_or_create(&canonical.grid);

        let mut sum = genome.total();
        if sum <= 0 {
            sum = 1;
        }
        let pick = self.rng.random_range(0..sum);

        let mut running: i64 = 0;
        let mut chosen = None;
        for (index, score) in genome.scores().iter().enumerate() {
            running = running.saturating_add(*score);
            if running > pick {
                chosen = Some(index);
                break;
            }
        }

        let index = chosen
            .filter(|&index| canonical.grid.is_empty_at(index))
            .or_else(|| canonical.grid.empty_indices().first().copied())?;

        let mv = canonical.to_raw_move(Move::from_index(index));
        self.history.push(HistoryEntry { grid: raw, mv });
        Some(mv)
    }

    /// Record a move chosen by someone else as if this bot had made it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMove`] if `mv` is off the board; nothing is
    /// recorded then.
    pub fn register_move(&mut self, grid: &Grid, mv: Move) -> crate::Result<()> {
        if !mv.in_bounds() {
            return Err(Error::InvalidMove {
                row: mv.row,
                col: mv.col,
            });
        }
        self.history.push(HistoryEntry { grid: *grid, mv });
        Ok(())
    }

    /// Credit every recorded decision with the reward for `result`.
    ///
    /// The history is left in place. Returns the number of scores changed.
    pub fn update_genomes(&mut self, result: GameResult) -> usize {
        let rate = self.rewards.rate_for(result);
        let mut updated = 0;

        for entry in self.history.iter().filter(|entry| entry.mv.in_bounds()) {
            let canonical = canonicalize(&entry.grid, entry.mv);
            let genome = *self.store.get_or_create(&canonical.grid);
            if let Some(next) = reinforce(&genome, canonical.mv.index(), rate) {
                self.store.insert(canonical.grid, next);
                updated += 1;
            }
        }

        updated
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Stored scores for `board` in the board's own orientation
    pub fn print_genome(&self, board: &Board, mv: Move) -> String {
        let canonical = canonicalize(&board.grid(), mv);
        match self.store.get(&canonical.grid) {
            Some(genome) => genome.to_raw(canonical.symmetry).to_string(),
            None => NO_RECORDS.to_string(),
        }
    }

    pub fn save_genomes<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        persistence::save(&self.store, path)
    }

    /// Replace the genome store with the contents of `path`.
    ///
    /// See [`persistence::load`] for the handling of missing files.
    pub fn load_genomes<P: AsRef<Path>>(&mut self, path: P) -> crate::Result<LoadOutcome> {
        persistence::load(&mut self.store, path)
    }
}
