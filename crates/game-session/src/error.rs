//! Session error types

use std::path::PathBuf;

use chess_core::Square;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No piece of the side to move on {0}")]
    NoPieceOnSource(Square),

    #[error("Illegal move {from}-{to}")]
    IllegalMove { from: Square, to: Square },

    #[error("Illegal or unrecognised move '{0}'")]
    IllegalNotation(String),

    #[error("The game is over")]
    GameOver,

    #[error("Replay index {index} out of range (-1..={last})")]
    ReplayIndexOutOfRange { index: i64, last: i64 },

    #[error("Reviewing an earlier move; return to the latest position to play")]
    ReviewingHistory,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Move log does not replay at move {0}")]
    ReplayDiverged(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },

    #[error("Missing value for {0}")]
    MissingValue(&'static str),
}

#[derive(Error, Debug)]
pub enum SoundError {
    #[error("Sound file not found: {0}")]
    Missing(PathBuf),

    #[error("Sound I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("Not a square: '{0}'")]
    BadSquare(String),

    #[error("Not a move number: '{0}'")]
    BadIndex(String),
}
