//! Canonicalization invariants checked over every 3x3 grid

mod common;

use std::collections::HashSet;

use common::all_grids;
use genetac::tictactoe::{Grid, Move, Symmetry, canonicalize, uncanonicalize};

#[test]
fn canonical_form_is_idempotent() {
    for grid in all_grids() {
        let canonical = canonicalize(&grid, Move::new(0, 0));
        let again = canonicalize(&canonical.grid, Move::new(0, 0));
        assert_eq!(again.grid, canonical.grid, "grid {}", grid.to_key());
        assert_eq!(again.symmetry, Symmetry::identity());
    }
}

#[test]
fn canonical_form_is_the_minimum_of_the_orbit() {
    for grid in all_grids() {
        let canonical = canonicalize(&grid, Move::new(0, 0));
        for symmetry in Symmetry::all() {
            let image = symmetry.apply_grid(&grid);
            assert!(canonical.grid <= image);
            // Every member of the orbit shares the key
            assert_eq!(canonicalize(&image, Move::new(0, 0)).grid, canonical.grid);
        }
    }
}

#[test]
fn uncanonicalize_restores_grid_and_move() {
    for grid in all_grids().step_by(7) {
        for index in 0..9 {
            let mv = Move::from_index(index);
            let canonical = canonicalize(&grid, mv);
            let (raw, raw_move) = uncanonicalize(&canonical.grid, canonical.mv, canonical.symmetry);
            assert_eq!(raw, grid);
            assert_eq!(raw_move, mv);
        }
    }
}

#[test]
fn every_symmetry_inverts() {
    let grid = Grid::from_string("XO.X..O.X").unwrap();
    for symmetry in Symmetry::all() {
        assert_eq!(symmetry.invert_grid(&symmetry.apply_grid(&grid)), grid);
        for index in 0..9 {
            assert_eq!(symmetry.invert_index(symmetry.apply_index(index)), index);
        }
    }
}

#[test]
fn moves_follow_their_cell() {
    for grid in all_grids().step_by(11) {
        for index in 0..9 {
            let canonical = canonicalize(&grid, Move::from_index(index));
            assert_eq!(canonical.grid.get(canonical.mv.index()), grid.get(index));
        }
    }
}

#[test]
fn empty_board_openings_reduce_to_three_classes() {
    let empty = Grid::empty();
    let mut classes = HashSet::new();
    for index in 0..9 {
        let mut board = genetac::Board::from_grid(empty);
        board
            .make_move(genetac::Player::X, Move::from_index(index))
            .unwrap();
        classes.insert(board.grid().canonical());
    }
    // Corner, edge and centre
    assert_eq!(classes.len(), 3);
}

#[test]
fn orbit_count_matches_burnside() {
    let keys: HashSet<Grid> = all_grids().map(|g| g.canonical()).collect();
    // Number of 3-colourings of the 3x3 grid up to the dihedral group of order 8
    assert_eq!(keys.len(), 2862);
}
