//! Performance summary shown next to the board.
//!
//! These are placeholders. Nothing here looks at positions or evaluations:
//! accuracy is a fixed figure and the move-quality counts are fixed shares of
//! the move count. Only `average_time` is measured.

use chess_core::MoveRecord;
use serde::Serialize;

/// Reported accuracy once at least one move exists
const PLACEHOLDER_ACCURACY: u32 = 85;

/// Share of moves counted as best moves
const BEST_MOVE_SHARE: f64 = 0.3;
const BLUNDER_SHARE: f64 = 0.05;
const MISTAKE_SHARE: f64 = 0.1;
const INACCURACY_SHARE: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub accuracy: u32,
    /// Mean milliseconds between consecutive moves
    pub average_time: f64,
    pub best_move: usize,
    pub blunders: usize,
    pub mistakes: usize,
    pub inaccuracies: usize,
}

impl PerformanceMetrics {
    /// Neutral figures for a game with no moves.
    pub fn baseline() -> Self {
        Self {
            accuracy: 100,
            average_time: 0.0,
            best_move: 0,
            blunders: 0,
            mistakes: 0,
            inaccuracies: 0,
        }
    }
}

pub fn performance_metrics(moves: &[MoveRecord]) -> PerformanceMetrics {
    if moves.is_empty() {
        return PerformanceMetrics::baseline();
    }

    let count = moves.len();
    let share = |ratio: f64| (count as f64 * ratio).floor() as usize;

    PerformanceMetrics {
        accuracy: PLACEHOLDER_ACCURACY,
        average_time: average_move_time(moves),
        best_move: share(BEST_MOVE_SHARE),
        blunders: share(BLUNDER_SHARE),
        mistakes: share(MISTAKE_SHARE),
        inaccuracies: share(INACCURACY_SHARE),
    }
}

/// Mean gap between consecutive timestamps. The first move counts as 0.
fn average_move_time(moves: &[MoveRecord]) -> f64 {
    let total: i64 = moves
        .windows(2)
        .map(|pair| pair[1].timestamp - pair[0].timestamp)
        .sum();
    total as f64 / moves.len() as f64
}
