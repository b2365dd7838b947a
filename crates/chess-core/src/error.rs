use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid position '{position}': {reason}")]
    InvalidPosition { position: String, reason: String },
}
