//! Mock engine: random legal move after a simulated delay (async)

use std::sync::{Arc, Mutex};

use chess_core::{PositionString, Rules};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tokio::time::sleep;
use tracing::debug;

use crate::config::{Difficulty, EngineConfig};
use crate::error::EngineError;

/// Evaluation bonus for a capturing move (pawns)
const CAPTURE_BIAS: f64 = 0.3;

/// Evaluation bonus for a checking move (pawns)
const CHECK_BIAS: f64 = 0.5;

/// Pieces on the board at the start of a game
const FULL_BOARD: f64 = 32.0;

/// Result of one analysis request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineAnalysis {
    /// Chosen move in SAN
    #[serde(rename = "move")]
    pub mv: String,
    /// Placeholder score in pawns, not a real evaluation
    pub evaluation: f64,
    /// Display-only depth derived from difficulty
    pub depth: u32,
}

/// Cheap to clone; clones share one RNG.
#[derive(Clone)]
pub struct MockEngine {
    config: EngineConfig,
    rng: Arc<Mutex<StdRng>>,
}

impl MockEngine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Choose a reply for `position` after the configured thinking time.
    ///
    /// Returns `Ok(None)` straight away when the side to move has no legal
    /// moves. Dropping the future abandons the request.
    pub async fn request_move<R: Rules>(
        &self,
        position: PositionString,
        difficulty: Difficulty,
    ) -> Result<Option<EngineAnalysis>, EngineError> {
        let analysis = {
            let rules = R::from_position(&position)?;
            self.pick_move(&rules, difficulty)
        };

        let Some(analysis) = analysis else {
            debug!(position = %position, "No legal moves to analyse");
            return Ok(None);
        };

        let think_time = self.config.think_time(difficulty);
        debug!(
            difficulty = difficulty.level(),
            think_ms = think_time.as_millis() as u64,
            "Engine thinking"
        );
        sleep(think_time).await;

        debug!(mv = %analysis.mv, evaluation = analysis.evaluation, "Engine answered");
        Ok(Some(analysis))
    }

    /// Uniformly sample one legal move and score it with the placeholder
    /// heuristic. No delay.
    pub fn pick_move<R: Rules>(&self, rules: &R, difficulty: Difficulty) -> Option<EngineAnalysis> {
        let moves = rules.legal_moves(None);

        let chosen = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            moves.choose(&mut *rng)?.clone()
        };
        let facts = rules.inspect(&chosen);

        let mut evaluation = (rules.piece_count() as f64 - FULL_BOARD) * 0.1;
        if facts.capture {
            evaluation += CAPTURE_BIAS;
        }
        if facts.check {
            evaluation += CHECK_BIAS;
        }

        Some(EngineAnalysis {
            mv: facts.notation,
            evaluation,
            depth: difficulty.depth(),
        })
    }
}
