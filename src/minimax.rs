//! Exhaustive depth-aware minimax opponent.
//!
//! A win for the searching player scores `10 - depth`, a loss `-10 + depth`
//! and a draw 0, so quicker wins and slower losses are preferred. Candidate
//! cells are tried in index order and only a strictly better value replaces
//! the current choice, which makes the player fully deterministic.

use std::collections::HashMap;

use crate::tictactoe::{Board, Grid, LineAnalyzer, Move, Player};

const WIN_SCORE: i32 = 10;

/// Perfect-play opponent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxPlayer {
    symbol: Player,
}

impl MinimaxPlayer {
    pub fn new(symbol: Player) -> Self {
        Self { symbol }
    }

    pub fn symbol(&self) -> Player {
        self.symbol
    }

    pub fn set_symbol(&mut self, symbol: Player) {
        self.symbol = symbol;
    }

    /// Best move for this player's symbol, or `None` on a full board
    pub fn choose_move(&self, board: &Board) -> Option<Move> {
        find_best_move(board, self.symbol)
    }
}

/// Best move for `me` on `board`, or `None` when no cell is empty
pub fn find_best_move(board: &Board, me: Player) -> Option<Move> {
    let grid = board.grid();
    let mut memo = HashMap::new();
    let mut best: Option<(i32, usize)> = None;

    for index in grid.empty_indices() {
        let mut next = grid;
        next.set(index, me.to_cell());
        let value = search(&next, 0, false, me, &mut memo);
        if best.is_none_or(|(best_value, _)| value > best_value) {
            best = Some((value, index));
        }
    }

    best.map(|(_, index)| Move::from_index(index))
}

/// Value of `grid` for `me`, with `maximizing` set when it is `me` to move.
///
/// Within one search the depth and the side to move are functions of the
/// grid, so the memo is keyed by grid alone.
fn search(
    grid: &Grid,
    depth: i32,
    maximizing: bool,
    me: Player,
    memo: &mut HashMap<Grid, i32>,
) -> i32 {
    if let Some(&value) = memo.get(grid) {
        return value;
    }

    let value = if LineAnalyzer::has_won(grid.cells(), me) {
        WIN_SCORE - depth
    } else if LineAnalyzer::has_won(grid.cells(), me.opponent()) {
        -WIN_SCORE + depth
    } else if grid.empty_count() == 0 {
        0
    } else {
        let mover = if maximizing { me } else { me.opponent() };
        let children = grid.empty_indices().into_iter().map(|index| {
            let mut next = *grid;
            next.set(index, mover.to_cell());
            search(&next, depth + 1, !maximizing, me, memo)
        });
        if maximizing {
            children.max().unwrap_or(0)
        } else {
            children.min().unwrap_or(0)
        }
    };

    memo.insert(*grid, value);
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_an_immediate_win() {
        let board = Board::from_string("XX.OO....").unwrap();
        assert_eq!(find_best_move(&board, Player::X), Some(Move::new(0, 2)));
        assert_eq!(find_best_move(&board, Player::O), Some(Move::new(1, 2)));
    }

    #[test]
    fn blocks_an_immediate_threat() {
        let board = Board::from_string("XX..O....").unwrap();
        assert_eq!(find_best_move(&board, Player::O), Some(Move::new(0, 2)));
    }

    #[test]
    fn full_board_has_no_move() {
        let board = Board::from_string("XOXXOOOXX").unwrap();
        assert_eq!(find_best_move(&board, Player::X), None);
    }

    #[test]
    fn opening_move_is_deterministic() {
        let board = Board::new();
        let first = find_best_move(&board, Player::X);
        assert_eq!(first, find_best_move(&board, Player::X));
        // Every opening draws under perfect play, so the first cell is kept
        assert_eq!(first, Some(Move::new(0, 0)));
    }
}
