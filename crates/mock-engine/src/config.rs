//! Engine configuration from environment variables

use std::env;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EngineError;

/// Opponent strength, 1 (weakest) to 5. Only changes thinking time and the
/// depth figure shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Result<Self, EngineError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(EngineError::InvalidDifficulty(level))
        }
    }

    pub fn level(self) -> u8 {
        self.0
    }

    /// Reported search depth. Display only, nothing is searched.
    pub fn depth(self) -> u32 {
        2 * self.0 as u32 + 8
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = EngineError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Difficulty> for u8 {
    fn from(difficulty: Difficulty) -> u8 {
        difficulty.0
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Fixed part of the thinking time
    pub base_delay_ms: u64,

    /// Extra thinking time per difficulty level
    pub per_level_delay_ms: u64,

    /// RNG seed; unset means seeded from OS entropy
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            per_level_delay_ms: 500,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn load() -> Self {
        let defaults = Self::default();

        let base_delay_ms = env::var("ENGINE_BASE_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.base_delay_ms);

        let per_level_delay_ms = env::var("ENGINE_PER_LEVEL_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.per_level_delay_ms);

        let seed = env::var("ENGINE_SEED").ok().and_then(|v| v.parse().ok());
        if let Some(seed) = seed {
            info!(seed, "Engine RNG seeded from ENGINE_SEED");
        }

        Self {
            base_delay_ms,
            per_level_delay_ms,
            seed,
        }
    }

    /// Simulated thinking time, linear in difficulty.
    pub fn think_time(&self, difficulty: Difficulty) -> Duration {
        Duration::from_millis(
            self.base_delay_ms + self.per_level_delay_ms * difficulty.level() as u64,
        )
    }
}
