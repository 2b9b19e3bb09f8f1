//! Play command - A human plays against a learning bot on the terminal

use std::{
    cell::RefCell,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    agent::{Agent, HumanInput},
    config::BotConfig,
    genome::{GeneticBot, LoadOutcome},
    tictactoe::{Board, GameOutcome, GameRecord, GameResult, Move, Player},
    training::{MoveEvent, Observer, play_game},
};

#[derive(Parser, Debug)]
#[command(about = "Play against a bot")]
pub struct PlayArgs {
    /// Genome file the bot plays from
    #[arg(default_value = "BEST.txt")]
    pub genomes: PathBuf,

    /// Which token you play (`x` moves first)
    #[arg(long, default_value = "x")]
    pub human: String,

    /// Number of games to play
    #[arg(long, short = 'g', default_value_t = 1)]
    pub games: usize,

    /// Save the bot's genomes after every game
    #[arg(long, short = 's')]
    pub save: bool,

    /// Random seed for the bot
    #[arg(long)]
    pub seed: Option<u64>,
}

pub(crate) fn parse_player_token(value: &str) -> Result<Player> {
    match value.trim().to_ascii_lowercase().as_str() {
        "x" | "first" => Ok(Player::X),
        "o" | "second" => Ok(Player::O),
        other => Err(anyhow!("Invalid player '{other}' (expected 'x' or 'o')")),
    }
}

/// Parse "row col" (spaces or a comma between the two numbers)
pub(crate) fn parse_move(line: &str) -> Option<Move> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    let mv = Move::new(row, col);
    mv.in_bounds().then_some(mv)
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let human = parse_player_token(&args.human)?;
    let mut config = BotConfig::default();
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let mut bot = GeneticBot::new(human.opponent(), &config);
    match bot
        .load_genomes(&args.genomes)
        .with_context(|| format!("Failed to load {}", args.genomes.display()))?
    {
        LoadOutcome::Loaded(report) => println!(
            "Loaded {} genomes from {}",
            report.entries,
            args.genomes.display()
        ),
        LoadOutcome::Missing => println!("No genomes found; the bot starts from scratch"),
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    for _ in 0..args.games {
        let Some(result) = play_human_game(&mut bot, human, &mut input, &mut output)? else {
            println!("Input closed, stopping");
            break;
        };
        println!("Bot result: {result}");
        if args.save {
            bot.save_genomes(&args.genomes)
                .with_context(|| format!("Failed to save {}", args.genomes.display()))?;
        }
    }
    Ok(())
}

/// Human seat that prompts on `out` and reads "row col" lines from `input`
struct TerminalSeat<'a, R, W> {
    input: &'a mut R,
    out: &'a RefCell<W>,
}

impl<R: BufRead, W: Write> HumanInput for TerminalSeat<'_, R, W> {
    fn read_move(&mut self, board: &Board, symbol: Player) -> crate::Result<Option<Move>> {
        let mut out = self.out.borrow_mut();
        loop {
            write!(out, "Player {symbol}, make a move (row and column): ")?;
            out.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            match parse_move(&line) {
                Some(mv) if board.valid_move(mv.row, mv.col) => return Ok(Some(mv)),
                _ => writeln!(out, "Invalid move.")?,
            }
        }
    }
}

/// Draws the board after every move and announces the result
struct TerminalView<'a, W> {
    out: &'a RefCell<W>,
    human: Player,
}

impl<W: Write> Observer for TerminalView<'_, W> {
    fn on_game_start(&mut self) -> crate::Result<()> {
        writeln!(self.out.borrow_mut(), "{}", Board::new())?;
        Ok(())
    }

    fn on_move(&mut self, event: &MoveEvent<'_>) -> crate::Result<()> {
        let mut out = self.out.borrow_mut();
        if event.player != self.human {
            if let Some(genome) = event.genome {
                writeln!(out, "Possible moves: {genome}")?;
            }
            writeln!(out, "Bot ({}) plays: {}", event.player, event.mv)?;
        }
        writeln!(out, "{}", event.board)?;
        Ok(())
    }

    fn on_game_end(&mut self, record: &GameRecord) -> crate::Result<()> {
        let mut out = self.out.borrow_mut();
        match record.outcome {
            GameOutcome::Win(winner) if winner == self.human => writeln!(out, "You won!")?,
            GameOutcome::Win(_) => writeln!(out, "Bot won!")?,
            GameOutcome::Draw => writeln!(out, "It's a draw!")?,
        }
        Ok(())
    }
}

/// Play one game with the human's moves read from `input`.
///
/// The bot learns from the game. Returns the bot's result, or `None` when
/// `input` runs out before the game ends (the bot then learns nothing).
pub fn play_human_game<R: BufRead, W: Write>(
    bot: &mut GeneticBot,
    human: Player,
    input: &mut R,
    out: &mut W,
) -> Result<Option<GameResult>> {
    let out = RefCell::new(out);
    let mut seat = TerminalSeat { input, out: &out };
    let mut view = TerminalView { out: &out, human };

    let mut player = Agent::human(&mut seat);
    let mut learner = Agent::learning(bot);
    let played = match human {
        Player::X => play_game(&mut player, &mut learner, &mut view),
        Player::O => play_game(&mut learner, &mut player, &mut view),
    };

    match played {
        Ok(record) => Ok(Some(record.outcome.result_for(human.opponent()))),
        Err(crate::Error::GameAbandoned { .. }) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn parses_moves() {
        assert_eq!(parse_move("1 2"), Some(Move::new(1, 2)));
        assert_eq!(parse_move(" 0,0\n"), Some(Move::new(0, 0)));
        assert_eq!(parse_move("3 0"), None);
        assert_eq!(parse_move("1"), None);
        assert_eq!(parse_move("1 1 1"), None);
        assert_eq!(parse_move("a b"), None);
    }

    #[test]
    fn closed_input_stops_the_game() {
        let mut bot = GeneticBot::new(Player::O, &BotConfig::default().with_seed(1));
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let result = play_human_game(&mut bot, Player::X, &mut input, &mut out).unwrap();
        assert_eq!(result, None);
        assert!(bot.store().is_empty());
    }

    #[test]
    fn scripted_game_finishes_and_teaches_the_bot() {
        let mut bot = GeneticBot::new(Player::O, &BotConfig::default().with_seed(9));
        // Offer every cell in order; occupied ones are rejected and retried
        let script: String = (0..9)
            .cycle()
            .take(200)
            .map(|i| format!("{} {}\n", i / 3, i % 3))
            .collect();
        let mut input = Cursor::new(script.into_bytes());
        let mut out = Vec::new();

        let result = play_human_game(&mut bot, Player::X, &mut input, &mut out)
            .unwrap()
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Bot (O) plays"));
        assert!(!bot.store().is_empty());
        assert!(!bot.history().is_empty());
        let expected_delta = if result == GameResult::Loss { -1 } else { 1 };
        let opening = bot
            .store()
            .get(&Board::from_string("X........").unwrap().grid().canonical())
            .unwrap();
        assert_eq!((opening.total() - 800).signum(), expected_delta);
    }
}
