//! Text views over the session. Read-only: every function here borrows.

use std::fmt::Write as _;

use chess_core::notation::{format_move_time, is_white_move, move_number, movetext};
use chess_core::{Color, File, GameStatus, MoveRecord, Rank, Rules, Square};
use serde::Serialize;

use crate::controller::GameController;
use crate::metrics::{performance_metrics, PerformanceMetrics};
use crate::session::GameSession;
use crate::settings::GameSettings;
use crate::sound::SoundSink;

/// One row of the move list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveListEntry {
    pub index: usize,
    pub number: usize,
    pub white: bool,
    pub notation: String,
    pub current: bool,
}

pub fn move_list<R: Rules>(session: &GameSession<R>) -> Vec<MoveListEntry> {
    session
        .moves()
        .iter()
        .enumerate()
        .map(|(index, record)| MoveListEntry {
            index,
            number: move_number(index),
            white: is_white_move(index),
            notation: record.notation.clone(),
            current: session.cursor() == Some(index),
        })
        .collect()
}

/// Two half-moves per line; the current move is bracketed.
pub fn render_move_list(entries: &[MoveListEntry]) -> String {
    if entries.is_empty() {
        return "No moves yet".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let text = if entry.current {
            format!("[{}]", entry.notation)
        } else {
            entry.notation.clone()
        };
        if entry.white {
            if entry.index > 0 {
                out.push('\n');
            }
            let _ = write!(out, "{:>3}. {:<9}", entry.number, text);
        } else {
            if entry.index == 0 {
                let _ = write!(out, "{:>3}. {:<9}", entry.number, "...");
            }
            out.push_str(&text);
        }
    }
    out
}

pub fn status_line(status: &GameStatus, thinking: bool) -> String {
    if thinking {
        return "Engine is thinking...".to_string();
    }
    if status.is_over {
        return status.result.describe().unwrap_or("Game Over").to_string();
    }
    if status.in_check {
        return "Check!".to_string();
    }
    match status.side_to_move {
        Color::White => "White's turn".to_string(),
        Color::Black => "Black's turn".to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccuracyBand {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl AccuracyBand {
    pub fn for_accuracy(accuracy: u32) -> Self {
        if accuracy >= 90 {
            AccuracyBand::Excellent
        } else if accuracy >= 80 {
            AccuracyBand::Good
        } else if accuracy >= 70 {
            AccuracyBand::Fair
        } else {
            AccuracyBand::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AccuracyBand::Excellent => "excellent",
            AccuracyBand::Good => "good",
            AccuracyBand::Fair => "fair",
            AccuracyBand::Poor => "poor",
        }
    }
}

pub fn render_metrics(metrics: &PerformanceMetrics, game_active: bool) -> String {
    if !game_active && metrics.accuracy == 100 {
        return "Start playing to see your performance metrics".to_string();
    }

    let band = AccuracyBand::for_accuracy(metrics.accuracy);
    format!(
        "Accuracy:   {}% ({})\n\
         Avg. time:  {}\n\
         Best moves: {}\n\
         Blunders:   {}\n\
         Mistakes:   {}\n\
         Inaccuracies: {}",
        metrics.accuracy,
        band.label(),
        format_move_time(metrics.average_time.round() as i64),
        metrics.best_move,
        metrics.blunders,
        metrics.mistakes,
        metrics.inaccuracies,
    )
}

fn piece_symbol(piece: char) -> char {
    match piece {
        'P' => '♙',
        'R' => '♖',
        'N' => '♘',
        'B' => '♗',
        'Q' => '♕',
        'K' => '♔',
        'p' => '♟',
        'r' => '♜',
        'n' => '♞',
        'b' => '♝',
        'q' => '♛',
        'k' => '♚',
        _ => '?',
    }
}

/// Draw the displayed position. `flipped` puts Black at the bottom. The
/// selected square is shown as `[x]`, legal targets as `(x)` or ` * `.
pub fn render_board<R: Rules>(
    session: &GameSession<R>,
    flipped: bool,
    selected: Option<Square>,
    targets: &[Square],
) -> String {
    let mut ranks: Vec<Rank> = Rank::ALL.to_vec();
    let mut files: Vec<File> = File::ALL.to_vec();
    if flipped {
        files.reverse();
    } else {
        ranks.reverse();
    }

    let file_labels: String = files
        .iter()
        .map(|file| format!(" {} ", file.char()))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "   {file_labels}");
    for rank in &ranks {
        let _ = write!(out, " {} ", rank.char());
        for file in &files {
            let square = Square::from_coords(*file, *rank);
            let symbol = session.piece_char_at(square).map(piece_symbol);
            let cell = match (symbol, selected == Some(square), targets.contains(&square)) {
                (Some(s), true, _) => format!("[{s}]"),
                (Some(s), false, true) => format!("({s})"),
                (Some(s), false, false) => format!(" {s} "),
                (None, _, true) => " * ".to_string(),
                (None, _, false) => " · ".to_string(),
            };
            out.push_str(&cell);
        }
        let _ = writeln!(out, " {}", rank.char());
    }
    let _ = write!(out, "   {file_labels}");
    out
}

/// Everything the `json` command prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot<'a> {
    pub settings: &'a GameSettings,
    pub moves: &'a [MoveRecord],
    pub movetext: String,
    pub current_move_index: i64,
    pub status: GameStatus,
    pub metrics: PerformanceMetrics,
    pub thinking: bool,
}

impl<'a> SessionSnapshot<'a> {
    pub fn capture<R, S>(controller: &'a GameController<R, S>) -> Self
    where
        R: Rules + Send + 'static,
        S: SoundSink + 'static,
    {
        let session = controller.session();
        Self {
            settings: controller.settings(),
            moves: session.moves(),
            movetext: movetext(session.moves()),
            current_move_index: session.cursor_index(),
            status: session.status(),
            metrics: performance_metrics(session.moves()),
            thinking: controller.is_thinking(),
        }
    }
}
