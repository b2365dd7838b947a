//! Terminal command parsing

use chess_core::notation::parse_coordinate_move;
use chess_core::Square;

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Coordinate move: `e2e4`, `e2 e4`, `e2-e4`
    Move { from: Square, to: Square },
    /// Anything else that is not a keyword, tried as SAN
    Notation(String),
    /// One click of the two-click board input
    Select(Square),
    Moves,
    /// Number of half-moves to show; 0 is the initial position
    Goto(usize),
    Live,
    Board,
    Go,
    Status,
    Metrics,
    Json,
    New,
    Help,
    Quit,
}

impl Command {
    /// Cursor index for `goto`: `-1` is the initial position.
    pub fn goto_index(plies: usize) -> i64 {
        plies as i64 - 1
    }
}

pub const HELP: &str = "\
Moves:     e2e4, e2 e4, e2-e4 or SAN (Nf3, O-O, exd5)
select sq  pick up or drop a piece, two selects make a move
go         let the engine move for the side to move
moves      show the move list
goto n     show the position after n half-moves (0 = start)
live       back to the latest position
board      redraw the board
status     game status
metrics    performance summary
json       session snapshot as JSON
new        start a new game
help       this text
quit       leave";

/// `Ok(None)` for a blank line.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some((from, to)) = parse_coordinate_move(line) {
        return Ok(Some(Command::Move { from, to }));
    }

    let mut words = line.split_whitespace();
    let keyword = words.next().unwrap_or_default().to_ascii_lowercase();
    let argument = words.next();

    let command = match keyword.as_str() {
        "select" | "s" => {
            let text = argument.ok_or(CommandError::MissingArgument("select"))?;
            let square = text
                .to_ascii_lowercase()
                .parse::<Square>()
                .map_err(|_| CommandError::BadSquare(text.to_string()))?;
            Command::Select(square)
        }
        "goto" | "g" => {
            let text = argument.ok_or(CommandError::MissingArgument("goto"))?;
            let plies = text
                .parse::<usize>()
                .map_err(|_| CommandError::BadIndex(text.to_string()))?;
            Command::Goto(plies)
        }
        "moves" | "m" => Command::Moves,
        "live" => Command::Live,
        "board" | "b" => Command::Board,
        "go" => Command::Go,
        "status" => Command::Status,
        "metrics" => Command::Metrics,
        "json" => Command::Json,
        "new" => Command::New,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Notation(line.to_string()),
    };

    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_coordinate_moves() {
        let expected = Command::Move {
            from: Square::E2,
            to: Square::E4,
        };
        assert_eq!(parse("e2e4"), expected);
        assert_eq!(parse("e2 e4"), expected);
        assert_eq!(parse(" E2-E4 "), expected);
    }

    #[test]
    fn test_keywords() {
        assert_eq!(parse("select g1"), Command::Select(Square::G1));
        assert_eq!(parse("goto 0"), Command::Goto(0));
        assert_eq!(parse("GO"), Command::Go);
        assert_eq!(parse("quit"), Command::Quit);
        assert_eq!(parse("json"), Command::Json);
    }

    #[test]
    fn test_other_text_is_notation() {
        assert_eq!(parse("Nf3"), Command::Notation("Nf3".to_string()));
        assert_eq!(parse("O-O"), Command::Notation("O-O".to_string()));
    }

    #[test]
    fn test_blank_and_bad_arguments() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("select"),
            Err(CommandError::MissingArgument("select"))
        );
        assert_eq!(
            parse_command("select z9"),
            Err(CommandError::BadSquare("z9".to_string()))
        );
        assert_eq!(
            parse_command("goto -1"),
            Err(CommandError::BadIndex("-1".to_string()))
        );
    }

    #[test]
    fn test_goto_index() {
        assert_eq!(Command::goto_index(0), -1);
        assert_eq!(Command::goto_index(3), 2);
    }
}
