//! Game session core and the view models drawn from it.
//!
//! `GameSession` owns the move log and replay cursor. `GameController` wires
//! it to the mock engine, the sound collaborator and board input. The
//! `chess-parlor` binary is a terminal front end over the controller.

pub mod command;
pub mod controller;
pub mod error;
pub mod input;
pub mod metrics;
pub mod session;
pub mod settings;
pub mod sound;
pub mod view;

pub use command::{parse_command, Command};
pub use controller::{AnalysisTicket, ClickResult, EngineReply, GameController, PlayerTurn};
pub use error::{CommandError, ConfigError, SessionError, SoundError};
pub use input::{BoardInput, Selection};
pub use metrics::{performance_metrics, PerformanceMetrics};
pub use session::{wall_clock, Clock, GamePhase, GameSession};
pub use settings::{GameSettings, PlayerSide};
pub use sound::{SoundBoard, SoundEffect, SoundSink};
