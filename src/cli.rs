//! Line-oriented text front end.
//!
//! One command per line; columns are numbered 1..=7 here and converted to
//! 0-based indices before reaching the engine.

use std::io::{self, BufRead, Write};
use std::str::SplitWhitespace;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::card::Card;
use crate::deal::DealSource;
use crate::display::render_game;
use crate::drag::DropTarget;
use crate::error::{CardParseError, DealError, MoveError};
use crate::game::Game;
use crate::moves::MoveReport;

pub const HELP: &str = "\
commands:
  draw              draw from stock (recycles waste when stock is empty)
  flip <col>        turn the top card of a column face-up
  found <card>      move a card to its foundation
  move <card> <col> move a card (and the run above it) to a column
  click <card>      move a card wherever it fits best
  auto              send all safe cards to the foundations
  undo              take back the last action
  new [seed]        deal a new game
  show              print the board
  state             print the board as JSON
  help              this text
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Draw,
    Flip(usize),
    Found(Card),
    Move(Card, usize),
    Click(Card),
    Auto,
    Undo,
    New(Option<u64>),
    Show,
    State,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command {0:?} (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs {1}")]
    MissingArg(&'static str, &'static str),
    #[error("column must be 1..=7, got {0:?}")]
    BadColumn(String),
    #[error("bad seed {0:?}")]
    BadSeed(String),
    #[error(transparent)]
    Card(#[from] CardParseError),
    #[error(transparent)]
    Move(#[from] MoveError),
    #[error(transparent)]
    Deal(#[from] DealError),
}

fn parse_col(s: &str) -> Result<usize, CommandError> {
    match s.parse::<usize>() {
        Ok(n) if (1..=7).contains(&n) => Ok(n - 1),
        _ => Err(CommandError::BadColumn(s.to_string())),
    }
}

fn next_arg<'a>(
    words: &mut SplitWhitespace<'a>,
    name: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    words.next().ok_or(CommandError::MissingArg(name, what))
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let mut arg = |name, what| next_arg(&mut words, name, what);

        let cmd = match verb.to_ascii_lowercase().as_str() {
            "draw" | "d" => Command::Draw,
            "flip" | "f" => Command::Flip(parse_col(arg("flip", "a column")?)?),
            "found" => Command::Found(arg("found", "a card")?.parse()?),
            "move" | "m" => {
                let card: Card = arg("move", "a card and a column")?.parse()?;
                let col = parse_col(arg("move", "a card and a column")?)?;
                Command::Move(card, col)
            }
            "click" | "c" => Command::Click(arg("click", "a card")?.parse()?),
            "auto" | "a" => Command::Auto,
            "undo" | "u" => Command::Undo,
            "new" => match arg("new", "").ok() {
                None => Command::New(None),
                Some(s) => Command::New(Some(
                    s.parse().map_err(|_| CommandError::BadSeed(s.to_string()))?,
                )),
            },
            "show" | "s" => Command::Show,
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "q" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(cmd))
    }
}

/// Run one command. Returns the text to print, or `None` to quit.
pub fn execute(game: &mut Game, cmd: Command) -> Result<Option<String>, CommandError> {
    let report = match cmd {
        Command::Draw => game.draw()?,
        Command::Flip(col) => game.flip_tableau_top(col)?,
        Command::Found(card) => game.move_to_foundation(card)?,
        Command::Move(card, col) => {
            let session = game.begin_drag(card)?;
            game.drop_drag(session, DropTarget::Tableau(col))?
        }
        Command::Click(card) => game.auto_move(card)?,
        Command::Auto => game.auto_finish()?,
        Command::Undo => game.undo()?,
        Command::New(seed) => {
            let source = seed.map_or(DealSource::Random, DealSource::Seeded);
            game.new_game(&source)?;
            return Ok(Some(render_game(&game.view())));
        }
        Command::Show => return Ok(Some(render_game(&game.view()))),
        Command::State => {
            let json = serde_json::to_string_pretty(&game.view())
                .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
            return Ok(Some(json));
        }
        Command::Help => return Ok(Some(HELP.to_string())),
        Command::Quit => return Ok(None),
    };
    Ok(Some(summarize(&report, game)))
}

fn summarize(report: &MoveReport, game: &Game) -> String {
    let mut s = report.description.clone();
    if !report.flipped.is_empty() {
        let ids: Vec<String> = report.flipped.iter().map(Card::to_string).collect();
        s.push_str(&format!(" (revealed {})", ids.join(", ")));
    }
    s.push('\n');
    s.push_str(&render_game(&game.view()));
    if report.won {
        s.push_str("\nYou won!");
    }
    s
}

/// Log filter for the binary: `-v` forces `debug`, otherwise `RUST_LOG`
/// applies, falling back to `warn`.
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Read commands from `input` until EOF or `quit`.
pub fn run<R: BufRead, W: Write>(game: &mut Game, input: R, mut out: W) -> io::Result<()> {
    writeln!(out, "{}", render_game(&game.view()))?;
    for line in input.lines() {
        let line = line?;
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {e}")?;
                continue;
            }
        };
        match execute(game, cmd) {
            Ok(Some(text)) => writeln!(out, "{text}")?,
            Ok(None) => break,
            Err(e) => writeln!(out, "error: {e}")?,
        }
    }
    out.flush()
}
