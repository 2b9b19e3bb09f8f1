//! Match loops, observers and the population trainer

pub mod matches;
pub mod observer;
pub mod population;

pub use matches::{bot_vs_bot, bot_vs_minimax, play_game};
pub use observer::{
    BoardPrinter, MoveEvent, NullObserver, Observer, ObserverSet, OutcomeCounter,
    ProgressObserver, Tally,
};
pub use population::{
    Individual, IndividualSummary, Population, TrainingMode, TrainingSummary, best_path,
    crossover_stores, individual_path, mutate,
};
