//! Single-game match loops

use crate::{
    Result,
    agent::Agent,
    genome::GeneticBot,
    minimax::MinimaxPlayer,
    tictactoe::{Board, GameOutcome, GameRecord, GameResult, Player},
};

use super::observer::{MoveEvent, Observer};

/// Play one game between `x` and `o`, X moving first.
///
/// Learning agents have their history cleared before the first move and are
/// updated with their own result once the game ends.
///
/// # Errors
///
/// Returns [`Error::NoValidMoves`] if a bot produces no move while cells
/// are still empty, [`Error::GameAbandoned`] if a human seat stops
/// answering, or any error raised by an observer. Nobody learns from a game
/// that ends in an error.
///
/// [`Error::NoValidMoves`]: crate::Error::NoValidMoves
/// [`Error::GameAbandoned`]: crate::Error::GameAbandoned
pub fn play_game<'a>(
    x: &mut Agent<'a>,
    o: &mut Agent<'a>,
    observer: &mut dyn Observer,
) -> Result<GameRecord> {
    let mut board = Board::new();
    x.take_seat(Player::X);
    o.take_seat(Player::O);
    x.begin_game();
    o.begin_game();
    observer.on_game_start()?;

    let mut moves = Vec::with_capacity(9);
    let mut current = Player::X;
    let outcome = loop {
        let agent = match current {
            Player::X => &mut *x,
            Player::O => &mut *o,
        };
        let mv = agent.choose_move(&board)?;
        let genome = agent.describe(&board, mv);
        board.make_move(current, mv)?;
        moves.push((current, mv));

        observer.on_move(&MoveEvent {
            player: current,
            agent: agent.name(),
            mv,
            board: &board,
            genome: genome.as_deref(),
        })?;

        if board.check_win(mv) {
            break GameOutcome::Win(current);
        }
        if board.is_full() {
            break GameOutcome::Draw;
        }
        current = current.opponent();
    };

    x.finish_game(outcome.result_for(Player::X));
    o.finish_game(outcome.result_for(Player::O));

    let record = GameRecord { moves, outcome };
    observer.on_game_end(&record)?;
    Ok(record)
}

/// Play `bot` against perfect play; returns the bot's result
pub fn bot_vs_minimax(
    bot: &mut GeneticBot,
    bot_is_x: bool,
    observer: &mut dyn Observer,
) -> Result<GameResult> {
    let bot_symbol = if bot_is_x { Player::X } else { Player::O };
    let mut learner = Agent::learning(bot);
    let mut minimax = Agent::Minimax(MinimaxPlayer::new(bot_symbol.opponent()));

    let record = if bot_is_x {
        play_game(&mut learner, &mut minimax, observer)?
    } else {
        play_game(&mut minimax, &mut learner, observer)?
    };
    Ok(record.outcome.result_for(bot_symbol))
}

/// Play two bots against each other; returns the result for X
pub fn bot_vs_bot(
    x_bot: &mut GeneticBot,
    o_bot: &mut GeneticBot,
    observer: &mut dyn Observer,
) -> Result<GameResult> {
    let mut x = Agent::learning(x_bot);
    let mut o = Agent::learning(o_bot);
    let record = play_game(&mut x, &mut o, observer)?;
    Ok(record.outcome.result_for(Player::X))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Error,
        agent::HumanInput,
        config::BotConfig,
        tictactoe::{Grid, Move},
        training::observer::{NullObserver, OutcomeCounter},
    };

    /// Plays the first listed move that is still open
    struct Scripted(Vec<Move>);

    impl HumanInput for Scripted {
        fn read_move(&mut self, board: &Board, _symbol: Player) -> Result<Option<Move>> {
            Ok(self
                .0
                .iter()
                .copied()
                .find(|mv| board.valid_move(mv.row, mv.col)))
        }
    }

    #[test]
    fn human_seat_plays_a_full_game() {
        let mut script = Scripted((0..9).map(Move::from_index).collect());
        let mut human = Agent::human(&mut script);
        let mut minimax = Agent::minimax(Player::O);
        let record = play_game(&mut human, &mut minimax, &mut NullObserver).unwrap();
        assert_eq!(record.moves[0], (Player::X, Move::new(0, 0)));
        assert_ne!(record.outcome, GameOutcome::Win(Player::X));
    }

    #[test]
    fn silent_human_abandons_and_nobody_learns() {
        let mut bot = GeneticBot::new(Player::X, &BotConfig::default().with_seed(3));
        let mut script = Scripted(Vec::new());
        let err = {
            let mut learner = Agent::learning(&mut bot);
            let mut human = Agent::human(&mut script);
            play_game(&mut learner, &mut human, &mut NullObserver).unwrap_err()
        };
        assert!(matches!(err, Error::GameAbandoned { .. }));
        assert_eq!(bot.store().get(&Grid::empty()).unwrap().total(), 900);
    }

    #[test]
    fn minimax_against_itself_draws() {
        let mut x = Agent::minimax(Player::X);
        let mut o = Agent::minimax(Player::O);
        let record = play_game(&mut x, &mut o, &mut NullObserver).unwrap();
        assert_eq!(record.outcome, GameOutcome::Draw);
        assert_eq!(record.len(), 9);
    }

    #[test]
    fn bot_never_beats_minimax() {
        let mut bot = GeneticBot::new(Player::X, &BotConfig::default().with_seed(17));
        let mut counter = OutcomeCounter::new();
        for i in 0..20 {
            let result = bot_vs_minimax(&mut bot, i % 2 == 0, &mut counter).unwrap();
            assert_ne!(result, GameResult::Win);
        }
        assert_eq!(counter.games, 20);
        assert!(!bot.store().is_empty());
    }

    #[test]
    fn bot_vs_bot_updates_both_bots() {
        let config = BotConfig::default();
        let mut x = GeneticBot::new(Player::X, &config.with_seed(1));
        let mut o = GeneticBot::new(Player::O, &config.with_seed(2));
        let result = bot_vs_bot(&mut x, &mut o, &mut NullObserver).unwrap();

        assert_eq!(x.symbol(), Player::X);
        assert_eq!(o.symbol(), Player::O);
        assert!(x.store().contains(&Grid::empty()));
        assert!(!o.store().is_empty());
        if result == GameResult::Win {
            let opening = x.store().get(&Grid::empty()).unwrap();
            assert!(opening.total() > 900);
        }
    }
}
