//! Stand-in opponent.
//!
//! There is no search here. The engine samples a legal move uniformly, tags it
//! with a placeholder evaluation and waits a difficulty-scaled "thinking time"
//! before answering.

pub mod config;
pub mod engine;
pub mod error;

pub use config::{Difficulty, EngineConfig};
pub use engine::{EngineAnalysis, MockEngine};
pub use error::EngineError;
