//! Test suite for the tic-tac-toe rules
//! Validates board invariants over many played games

mod common;

use common::seeded_bot;
use genetac::{
    minimax::find_best_move,
    tictactoe::{Board, GameOutcome, Move, Player},
};

mod board_invariants {
    use super::*;

    #[test]
    fn used_cells_and_winner_agree_over_random_games() {
        let mut x = seeded_bot(Player::X, 1);
        let mut o = seeded_bot(Player::O, 2);

        for _ in 0..200 {
            let mut board = Board::new();
            let mut current = Player::X;
            loop {
                let bot = if current == Player::X { &mut x } else { &mut o };
                let mv = bot.choose_move(&board).unwrap();
                board.make_move(current, mv).unwrap();
                assert_eq!(board.used_cells(), board.grid().occupied_count());

                if board.check_win(mv) {
                    assert_eq!(board.winner(), Some(current));
                    assert!(board.is_terminal());
                    break;
                }
                assert_eq!(board.winner(), None);
                if board.is_full() {
                    assert!(!board.is_move_left());
                    break;
                }
                current = current.opponent();
            }
        }
    }

    #[test]
    fn occupied_and_out_of_bounds_moves_are_rejected() {
        let mut board = Board::new();
        board.make_move(Player::X, Move::new(1, 1)).unwrap();
        let before = board.clone();

        assert!(board.make_move(Player::O, Move::new(1, 1)).is_err());
        assert!(board.make_move(Player::O, Move::new(3, 0)).is_err());
        assert_eq!(board, before);
        assert_eq!(board.get_cell(3, 3), None);
    }
}

mod perfect_play {
    use super::*;

    fn play_out(mut board: Board, mut current: Player) -> GameOutcome {
        loop {
            let mv = find_best_move(&board, current).unwrap();
            board.make_move(current, mv).unwrap();
            if board.check_win(mv) {
                return GameOutcome::Win(current);
            }
            if board.is_full() {
                return GameOutcome::Draw;
            }
            current = current.opponent();
        }
    }

    #[test]
    fn every_opening_draws_under_perfect_replies() {
        for index in 0..9 {
            let mut board = Board::new();
            board.make_move(Player::X, Move::from_index(index)).unwrap();
            assert_eq!(play_out(board, Player::O), GameOutcome::Draw, "opening {index}");
        }
    }

    #[test]
    fn minimax_punishes_a_bad_reply() {
        // X takes a corner, O answers on the adjacent edge: X can force a win
        let board = Board::from_string("XO.......").unwrap();
        assert_eq!(play_out(board, Player::X), GameOutcome::Win(Player::X));
    }
}
