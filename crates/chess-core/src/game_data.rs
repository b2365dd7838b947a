use std::fmt;

use serde::{Serialize, Serializer};
use shakmaty::{Color, Square};

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Serialized board position (FEN). Only the rules adapter looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PositionString(String);

impl PositionString {
    pub fn new(fen: impl Into<String>) -> Self {
        Self(fen.into())
    }

    pub fn initial() -> Self {
        Self(STANDARD_START_FEN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Placement, side to move, castling and en passant fields.
    /// Two positions with the same key count as a repetition.
    pub fn repetition_key(&self) -> String {
        self.0.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }
}

impl fmt::Display for PositionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One accepted move. Created once, never edited.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    #[serde(serialize_with = "square_name")]
    pub source: Square,
    #[serde(serialize_with = "square_name")]
    pub target: Square,
    pub notation: String, // SAN, with +/# suffix
    pub resulting_position: PositionString,
    pub timestamp: i64, // ms since epoch
    #[serde(serialize_with = "color_name")]
    pub side: Color,
    pub capture: bool,
    pub check: bool,
    pub castle: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
    None,
}

impl GameResult {
    pub fn describe(self) -> Option<&'static str> {
        match self {
            GameResult::WhiteWins => Some("White wins"),
            GameResult::BlackWins => Some("Black wins"),
            GameResult::Draw => Some("Draw"),
            GameResult::None => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawReason {
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

/// Derived game state. Always rebuilt from a position, never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    pub position: PositionString,
    pub is_over: bool,
    pub result: GameResult,
    #[serde(serialize_with = "color_name")]
    pub side_to_move: Color,
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
    pub is_draw: bool,
    pub draw_reason: Option<DrawReason>,
}

fn square_name<S: Serializer>(square: &Square, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(square)
}

fn color_name<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(match color {
        Color::White => "white",
        Color::Black => "black",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repetition_key_ignores_clocks() {
        let a = PositionString::new("4k3/8/8/8/8/8/8/4K2R w K - 3 40");
        let b = PositionString::new("4k3/8/8/8/8/8/8/4K2R w K - 11 44");
        assert_eq!(a.repetition_key(), b.repetition_key());
        assert_eq!(a.repetition_key(), "4k3/8/8/8/8/8/8/4K2R w K -");
    }

    #[test]
    fn test_move_record_json_shape() {
        let record = MoveRecord {
            source: Square::E2,
            target: Square::E4,
            notation: "e4".to_string(),
            resulting_position: PositionString::new(
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1",
            ),
            timestamp: 1_700_000_000_000,
            side: Color::White,
            capture: false,
            check: false,
            castle: false,
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source"], "e2");
        assert_eq!(json["target"], "e4");
        assert_eq!(json["side"], "white");
        assert_eq!(json["resultingPosition"], record.resulting_position.as_str());
    }
}
