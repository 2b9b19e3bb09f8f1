//! Common test utilities for the genetac test suite.

#![allow(dead_code)]

use genetac::{
    config::BotConfig,
    genome::GeneticBot,
    tictactoe::{Cell, Grid, Player},
};

/// Every assignment of {Empty, O, X} to the 9 cells, legal or not (3^9 grids)
pub fn all_grids() -> impl Iterator<Item = Grid> {
    (0..3usize.pow(9)).map(|mut code| {
        let mut cells = [Cell::Empty; 9];
        for cell in &mut cells {
            *cell = match code % 3 {
                0 => Cell::Empty,
                1 => Cell::O,
                _ => Cell::X,
            };
            code /= 3;
        }
        Grid::from_cells(cells)
    })
}

/// A learning bot with default settings and a fixed seed
pub fn seeded_bot(symbol: Player, seed: u64) -> GeneticBot {
    GeneticBot::new(symbol, &BotConfig::default().with_seed(seed))
}
