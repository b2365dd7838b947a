//! Game settings from environment variables and command-line flags

use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chess_core::Color;
use mock_engine::Difficulty;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Which colours the human plays. `Both` is a hot-seat game; the engine only
/// moves when asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerSide {
    #[default]
    White,
    Black,
    Both,
}

impl PlayerSide {
    /// Colour the engine plays on its own, if any.
    pub fn engine_color(self) -> Option<Color> {
        match self {
            PlayerSide::White => Some(Color::Black),
            PlayerSide::Black => Some(Color::White),
            PlayerSide::Both => None,
        }
    }

    /// Whether the human moves pieces of `color`.
    pub fn controls(self, color: Color) -> bool {
        match self {
            PlayerSide::White => color == Color::White,
            PlayerSide::Black => color == Color::Black,
            PlayerSide::Both => true,
        }
    }
}

impl FromStr for PlayerSide {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(PlayerSide::White),
            "black" | "b" => Ok(PlayerSide::Black),
            "both" => Ok(PlayerSide::Both),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PlayerSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PlayerSide::White => "white",
            PlayerSide::Black => "black",
            PlayerSide::Both => "both",
        })
    }
}

/// Snapshot handed to the controller when a game starts. Not changed while
/// the game runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSettings {
    pub side: PlayerSide,
    pub difficulty: Difficulty,
    /// Shown to the player only; there is no clock.
    pub time_control_minutes: u32,
    pub sound_enabled: bool,
    pub sound_dir: PathBuf,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            side: PlayerSide::White,
            difficulty: Difficulty::default(),
            time_control_minutes: 10,
            sound_enabled: true,
            sound_dir: PathBuf::from("sounds"),
        }
    }
}

impl GameSettings {
    /// Load settings from environment variables. Unset variables keep their
    /// defaults; a set but unparseable variable is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        if let Some(value) = lookup("CHESS_PLAYER_SIDE") {
            settings.side = parse_side("CHESS_PLAYER_SIDE", &value)?;
        }
        if let Some(value) = lookup("CHESS_DIFFICULTY") {
            settings.difficulty = parse_difficulty("CHESS_DIFFICULTY", &value)?;
        }
        if let Some(value) = lookup("CHESS_TIME_CONTROL") {
            settings.time_control_minutes = parse_minutes("CHESS_TIME_CONTROL", &value)?;
        }
        if let Some(value) = lookup("CHESS_SOUND") {
            settings.sound_enabled = parse_flag("CHESS_SOUND", &value)?;
        }
        if let Some(value) = lookup("CHESS_SOUND_DIR") {
            settings.sound_dir = PathBuf::from(value);
        }

        Ok(settings)
    }

    /// Apply `--side`, `--difficulty`, `--time` and `--no-sound` from the
    /// command line. Unknown arguments are ignored.
    pub fn apply_args(&mut self, args: &[String]) -> Result<(), ConfigError> {
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--side" => {
                    let value = args.get(i + 1).ok_or(ConfigError::MissingValue("--side"))?;
                    self.side = parse_side("--side", value)?;
                    i += 1;
                }
                "--difficulty" => {
                    let value = args
                        .get(i + 1)
                        .ok_or(ConfigError::MissingValue("--difficulty"))?;
                    self.difficulty = parse_difficulty("--difficulty", value)?;
                    i += 1;
                }
                "--time" => {
                    let value = args.get(i + 1).ok_or(ConfigError::MissingValue("--time"))?;
                    self.time_control_minutes = parse_minutes("--time", value)?;
                    i += 1;
                }
                "--no-sound" => self.sound_enabled = false,
                _ => {}
            }
            i += 1;
        }
        Ok(())
    }
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
    }
}

fn parse_side(key: &'static str, value: &str) -> Result<PlayerSide, ConfigError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_difficulty(key: &'static str, value: &str) -> Result<Difficulty, ConfigError> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(|level| Difficulty::new(level).ok())
        .ok_or_else(|| invalid(key, value))
}

fn parse_minutes(key: &'static str, value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(minutes) if minutes > 0 => Ok(minutes),
        _ => Err(invalid(key, value)),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(true),
        "0" | "false" | "off" | "no" => Ok(false),
        _ => Err(invalid(key, value)),
    }
}
