//! Observers for matches and population training
//!
//! Observers receive game and round events without the training loop knowing
//! what they do with them. All hooks default to doing nothing.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    tictactoe::{Board, GameOutcome, GameRecord, GameResult, Move, Player},
};

/// One move as seen by observers
#[derive(Debug, Clone, Copy)]
pub struct MoveEvent<'a> {
    pub player: Player,
    /// `"bot"` or `"minimax"`
    pub agent: &'a str,
    pub mv: Move,
    /// The board after the move was applied
    pub board: &'a Board,
    /// Genome scores behind a learning bot's choice, in board orientation
    pub genome: Option<&'a str>,
}

/// Training event hooks
pub trait Observer {
    fn on_training_start(&mut self, _total_rounds: usize) -> Result<()> {
        Ok(())
    }

    fn on_game_start(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_move(&mut self, _event: &MoveEvent<'_>) -> Result<()> {
        Ok(())
    }

    fn on_game_end(&mut self, _record: &GameRecord) -> Result<()> {
        Ok(())
    }

    /// Called after every round with the per-individual tallies so far
    fn on_round_end(&mut self, _round: usize, _tallies: &[Tally]) -> Result<()> {
        Ok(())
    }

    fn on_crossover(&mut self, _best_fitness: i64, _stagnation: usize, _mutation_rate: f64) -> Result<()> {
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Observer that ignores every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl Observer for NullObserver {}

/// Fan events out to several observers in insertion order
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn Observer>>,
}

impl ObserverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl Observer for ObserverSet {
    fn on_training_start(&mut self, total_rounds: usize) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_start(total_rounds)?;
        }
        Ok(())
    }

    fn on_game_start(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_game_start()?;
        }
        Ok(())
    }

    fn on_move(&mut self, event: &MoveEvent<'_>) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_move(event)?;
        }
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_game_end(record)?;
        }
        Ok(())
    }

    fn on_round_end(&mut self, round: usize, tallies: &[Tally]) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_round_end(round, tallies)?;
        }
        Ok(())
    }

    fn on_crossover(&mut self, best_fitness: i64, stagnation: usize, mutation_rate: f64) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_crossover(best_fitness, stagnation, mutation_rate)?;
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_training_end()?;
        }
        Ok(())
    }
}

/// Win/draw/loss counts for one participant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl Tally {
    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Loss => self.losses += 1,
        }
    }

    pub fn games(&self) -> usize {
        self.wins + self.draws + self.losses
    }
}

impl std::fmt::Display for Tally {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "WINS: {} DRAWS: {} LOSSES: {}", self.wins, self.draws, self.losses)
    }
}

/// Progress bar over training rounds
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    outcomes: OutcomeCounter,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            outcomes: OutcomeCounter::new(),
        }
    }

    fn message(&self) -> String {
        format!(
            "X:{} O:{} D:{}",
            self.outcomes.x_wins, self.outcomes.o_wins, self.outcomes.draws
        )
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_rounds: usize) -> Result<()> {
        let pb = ProgressBar::new(total_rounds as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} rounds ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        self.outcomes.on_game_end(record)?;
        if let Some(pb) = &self.progress_bar {
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_round_end(&mut self, round: usize, _tallies: &[Tally]) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(round as u64 + 1);
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Counts outcomes by winning side and tracks game length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCounter {
    pub games: usize,
    pub x_wins: usize,
    pub o_wins: usize,
    pub draws: usize,
    pub total_moves: usize,
}

impl OutcomeCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn avg_game_length(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.total_moves as f64 / self.games as f64
        }
    }
}

impl Observer for OutcomeCounter {
    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        self.games += 1;
        self.total_moves += record.len();
        match record.outcome {
            GameOutcome::Win(Player::X) => self.x_wins += 1,
            GameOutcome::Win(Player::O) => self.o_wins += 1,
            GameOutcome::Draw => self.draws += 1,
        }
        Ok(())
    }
}

/// Prints every move, the board and the end of each game to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct BoardPrinter;

impl Observer for BoardPrinter {
    fn on_game_start(&mut self) -> Result<()> {
        println!("{}", Board::new());
        Ok(())
    }

    fn on_move(&mut self, event: &MoveEvent<'_>) -> Result<()> {
        println!("Player {} ({}) plays: {}", event.player, event.agent, event.mv);
        if let Some(genome) = event.genome {
            println!("Possible moves: {genome}");
        }
        println!("{}", event.board);
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> Result<()> {
        match record.outcome {
            GameOutcome::Win(player) => println!("Player {player} won!"),
            GameOutcome::Draw => println!("It's a draw!"),
        }
        Ok(())
    }

    fn on_round_end(&mut self, round: usize, tallies: &[Tally]) -> Result<()> {
        println!("Round {}", round + 1);
        for (i, tally) in tallies.iter().enumerate() {
            println!("  BOT {i}: {tally}");
        }
        Ok(())
    }

    fn on_crossover(&mut self, best_fitness: i64, stagnation: usize, mutation_rate: f64) -> Result<()> {
        println!(
            "New generation: best fitness {best_fitness}, stagnation {stagnation}, mutation rate {mutation_rate:.3}"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_records_results() {
        let mut tally = Tally::default();
        tally.record(GameResult::Win);
        tally.record(GameResult::Draw);
        tally.record(GameResult::Draw);
        assert_eq!(tally.games(), 3);
        assert_eq!(tally.to_string(), "WINS: 1 DRAWS: 2 LOSSES: 0");
    }

    #[test]
    fn outcome_counter_tracks_sides() {
        let mut counter = OutcomeCounter::new();
        let record = GameRecord {
            moves: vec![(Player::X, Move::new(0, 0)), (Player::O, Move::new(1, 1))],
            outcome: GameOutcome::Win(Player::O),
        };
        counter.on_game_end(&record).unwrap();
        counter.on_game_end(&GameRecord {
            moves: record.moves.clone(),
            outcome: GameOutcome::Draw,
        })
        .unwrap();
        assert_eq!(counter.o_wins, 1);
        assert_eq!(counter.draws, 1);
        assert_eq!(counter.avg_game_length(), 2.0);
    }

    #[test]
    fn observer_set_fans_out() {
        let mut set = ObserverSet::new();
        set.push(Box::new(NullObserver));
        set.push(Box::new(OutcomeCounter::new()));
        assert_eq!(set.len(), 2);
        set.on_training_start(1).unwrap();
        set.on_training_end().unwrap();
    }
}
