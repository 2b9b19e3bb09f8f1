//! Players that can take a seat in a match

use std::fmt;

use crate::{
    Error, Result,
    genome::GeneticBot,
    minimax::MinimaxPlayer,
    tictactoe::{Board, GameResult, Move, Player},
};

/// Where a human seat gets its moves from
pub trait HumanInput {
    /// Ask for a move on `board`. `Ok(None)` means the player left the game.
    fn read_move(&mut self, board: &Board, symbol: Player) -> Result<Option<Move>>;
}

/// A seat at the board.
///
/// Learning bots are borrowed so that a match updates the caller's bot in
/// place; the minimax player is stateless and held by value.
pub enum Agent<'a> {
    Learning(&'a mut GeneticBot),
    Minimax(MinimaxPlayer),
    Human {
        symbol: Player,
        input: &'a mut dyn HumanInput,
    },
}

impl fmt::Debug for Agent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agent::Learning(bot) => f.debug_tuple("Learning").field(bot).finish(),
            Agent::Minimax(player) => f.debug_tuple("Minimax").field(player).finish(),
            Agent::Human { symbol, .. } => f.debug_struct("Human").field("symbol", symbol).finish(),
        }
    }
}

impl<'a> Agent<'a> {
    pub fn learning(bot: &'a mut GeneticBot) -> Self {
        Agent::Learning(bot)
    }

    pub fn minimax(symbol: Player) -> Self {
        Agent::Minimax(MinimaxPlayer::new(symbol))
    }

    pub fn human(input: &'a mut dyn HumanInput) -> Self {
        Agent::Human {
            symbol: Player::X,
            input,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Agent::Learning(_) => "bot",
            Agent::Minimax(_) => "minimax",
            Agent::Human { .. } => "human",
        }
    }

    /// Assign the symbol this agent plays with
    pub fn take_seat(&mut self, symbol: Player) {
        match self {
            Agent::Learning(bot) => bot.set_symbol(symbol),
            Agent::Minimax(player) => player.set_symbol(symbol),
            Agent::Human { symbol: seat, .. } => *seat = symbol,
        }
    }

    /// Next move on `board`.
    ///
    /// # Errors
    ///
    /// [`Error::NoValidMoves`] when a bot finds nothing to play and
    /// [`Error::GameAbandoned`] when a human seat stops answering.
    pub fn choose_move(&mut self, board: &Board) -> Result<Move> {
        match self {
            Agent::Learning(bot) => bot.choose_move(board).ok_or(Error::NoValidMoves),
            Agent::Minimax(player) => player.choose_move(board).ok_or(Error::NoValidMoves),
            Agent::Human { symbol, input } => {
                input
                    .read_move(board, *symbol)?
                    .ok_or_else(|| Error::GameAbandoned {
                        player: symbol.to_string(),
                    })
            }
        }
    }

    /// Genome scores behind the move about to be made on `board`, for display
    pub fn describe(&self, board: &Board, mv: Move) -> Option<String> {
        match self {
            Agent::Learning(bot) => Some(bot.print_genome(board, mv)),
            Agent::Minimax(_) | Agent::Human { .. } => None,
        }
    }

    /// Forget moves from any previous game
    pub fn begin_game(&mut self) {
        if let Agent::Learning(bot) = self {
            bot.clear_history();
        }
    }

    /// Learn from the finished game
    pub fn finish_game(&mut self, result: GameResult) {
        if let Agent::Learning(bot) = self {
            bot.update_genomes(result);
        }
    }
}
