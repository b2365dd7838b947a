//! Move numbering, movetext and input parsing helpers.

use regex::Regex;
use shakmaty::Square;

use crate::game_data::MoveRecord;

/// Full-move number for a 0-indexed half-move.
pub fn move_number(index: usize) -> usize {
    index / 2 + 1
}

/// Even half-move indices belong to White.
pub fn is_white_move(index: usize) -> bool {
    index % 2 == 0
}

/// Render the log as movetext: `1. e4 e5 2. Nf3`.
pub fn movetext(moves: &[MoveRecord]) -> String {
    let mut out = String::new();
    for (index, record) in moves.iter().enumerate() {
        if !out.is_empty() {
            out.push(' ');
        }
        if is_white_move(index) {
            out.push_str(&format!("{}. ", move_number(index)));
        }
        out.push_str(&record.notation);
    }
    out
}

/// `m:ss` for a minute or more, otherwise `Ns`.
pub fn format_move_time(milliseconds: i64) -> String {
    let seconds = milliseconds.max(0) / 1000;
    let minutes = seconds / 60;
    let remaining = seconds % 60;

    if minutes > 0 {
        format!("{minutes}:{remaining:02}")
    } else {
        format!("{remaining}s")
    }
}

/// Parse coordinate input such as `e2e4`, `e2-e4` or `e2 e4`.
pub fn parse_coordinate_move(text: &str) -> Option<(Square, Square)> {
    let re = Regex::new(r"^\s*([a-h][1-8])\s*[-\s]?\s*([a-h][1-8])\s*$").ok()?;
    let lowered = text.to_ascii_lowercase();
    let caps = re.captures(&lowered)?;

    let source: Square = caps[1].parse().ok()?;
    let target: Square = caps[2].parse().ok()?;
    Some((source, target))
}
