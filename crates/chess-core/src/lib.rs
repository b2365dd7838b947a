//! Chess primitives shared by the session and the mock engine.
//!
//! Legality, check and mate detection are owned by `shakmaty`; this crate only
//! wraps it behind the [`rules::Rules`] trait and defines the value types that
//! flow between the session, the engine and the views.

pub mod error;
pub mod game_data;
pub mod notation;
pub mod rules;

pub use error::CoreError;
pub use game_data::{DrawReason, GameResult, GameStatus, MoveRecord, PositionString};
pub use rules::{MoveFacts, Rules, RulesStatus, StandardRules};
pub use shakmaty::{Color, File, Rank, Square};
