//! Engine error types

use chess_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Difficulty must be between 1 and 5, got {0}")]
    InvalidDifficulty(u8),

    #[error(transparent)]
    InvalidPosition(#[from] CoreError),

    #[error("Analysis task did not finish: {0}")]
    Interrupted(String),
}
