//! Rules collaborator.
//!
//! The session never reasons about chess itself. Everything it needs (legal
//! moves, SAN, check and mate detection, FEN) goes through [`Rules`], which
//! [`StandardRules`] implements on top of `shakmaty`.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::uci::UciMove;
use shakmaty::{
    CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square,
};

use crate::error::CoreError;
use crate::game_data::PositionString;

/// What a move does, as seen from the position it is played in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveFacts {
    pub source: Square,
    pub target: Square,
    pub notation: String,
    pub side: Color,
    pub capture: bool,
    pub check: bool,
    pub castle: bool,
}

/// Rule-level flags for a single position. Repetition needs history and is
/// left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RulesStatus {
    pub turn: Color,
    pub check: bool,
    pub checkmate: bool,
    pub stalemate: bool,
    pub insufficient_material: bool,
    pub fifty_moves: bool,
}

impl RulesStatus {
    pub fn is_game_over(&self) -> bool {
        self.checkmate || self.stalemate || self.insufficient_material || self.fifty_moves
    }
}

pub trait Rules: Clone {
    type Move: Clone + std::fmt::Debug;

    /// Standard starting position.
    fn initial() -> Self;

    fn from_position(position: &PositionString) -> Result<Self, CoreError>;

    fn position(&self) -> PositionString;

    fn turn(&self) -> Color;

    /// Colour of the piece on `square`, if any.
    fn side_at(&self, square: Square) -> Option<Color>;

    /// FEN letter of the piece on `square` (`P` white pawn, `n` black knight).
    fn piece_char(&self, square: Square) -> Option<char>;

    /// Legal move from `source` to `target`. Pure query, nothing is played.
    fn find_move(&self, source: Square, target: Square) -> Option<Self::Move>;

    /// Legal move named by SAN (or UCI) text. Pure query.
    fn parse_notation(&self, notation: &str) -> Option<Self::Move>;

    /// All legal moves, or only those leaving `source`.
    fn legal_moves(&self, source: Option<Square>) -> Vec<Self::Move>;

    /// Describe `mv` without playing it.
    fn inspect(&self, mv: &Self::Move) -> MoveFacts;

    /// Play a move previously returned by one of the queries above.
    fn apply(&mut self, mv: &Self::Move) -> MoveFacts;

    fn status(&self) -> RulesStatus;

    fn piece_count(&self) -> usize;
}

/// `shakmaty::Chess` with standard castling.
#[derive(Debug, Clone, Default)]
pub struct StandardRules {
    pos: Chess,
}

impl Rules for StandardRules {
    type Move = Move;

    fn initial() -> Self {
        Self::default()
    }

    fn from_position(position: &PositionString) -> Result<Self, CoreError> {
        let invalid = |reason: String| CoreError::InvalidPosition {
            position: position.to_string(),
            reason,
        };

        let fen: Fen = position
            .as_str()
            .parse()
            .map_err(|e| invalid(format!("{e}")))?;
        let pos: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|e| invalid(format!("{e}")))?;

        Ok(Self { pos })
    }

    fn position(&self) -> PositionString {
        PositionString::new(Fen::from_position(&self.pos, EnPassantMode::Legal).to_string())
    }

    fn turn(&self) -> Color {
        self.pos.turn()
    }

    fn side_at(&self, square: Square) -> Option<Color> {
        self.pos.board().color_at(square)
    }

    fn piece_char(&self, square: Square) -> Option<char> {
        self.pos.board().piece_at(square).map(|piece| piece.char())
    }

    fn find_move(&self, source: Square, target: Square) -> Option<Move> {
        let matching: Vec<Move> = self
            .legal_moves(Some(source))
            .into_iter()
            .filter(|mv| endpoints(mv).1 == target)
            .collect();

        // Pawn reaching the last rank with no piece chosen: promote to a queen.
        matching
            .iter()
            .find(|mv| mv.promotion() == Some(Role::Queen))
            .or_else(|| matching.first())
            .cloned()
    }

    fn parse_notation(&self, notation: &str) -> Option<Move> {
        let text = notation.trim();

        if let Ok(san) = text.parse::<SanPlus>() {
            if let Ok(mv) = san.san.to_move(&self.pos) {
                return Some(mv);
            }
        }

        let uci: UciMove = text.parse().ok()?;
        uci.to_move(&self.pos).ok()
    }

    fn legal_moves(&self, source: Option<Square>) -> Vec<Move> {
        self.pos
            .legal_moves()
            .into_iter()
            .filter(|mv| source.map_or(true, |sq| endpoints(mv).0 == sq))
            .collect()
    }

    fn inspect(&self, mv: &Move) -> MoveFacts {
        let mut scratch = self.pos.clone();
        facts_for(&mut scratch, mv)
    }

    fn apply(&mut self, mv: &Move) -> MoveFacts {
        facts_for(&mut self.pos, mv)
    }

    fn status(&self) -> RulesStatus {
        RulesStatus {
            turn: self.pos.turn(),
            check: self.pos.is_check(),
            checkmate: self.pos.is_checkmate(),
            stalemate: self.pos.is_stalemate(),
            insufficient_material: self.pos.is_insufficient_material(),
            fifty_moves: self.pos.halfmoves() >= 100,
        }
    }

    fn piece_count(&self) -> usize {
        self.pos.board().occupied().count()
    }
}

/// Play `mv` on `pos` and report what it did.
fn facts_for(pos: &mut Chess, mv: &Move) -> MoveFacts {
    let side = pos.turn();
    let (source, target) = endpoints(mv);
    let san = SanPlus::from_move_and_play_unchecked(pos, mv.clone());

    MoveFacts {
        source,
        target,
        notation: san.to_string(),
        side,
        capture: mv.is_capture(),
        check: pos.is_check(),
        castle: mv.is_castle(),
    }
}

/// Squares a player clicks to make `mv`. Castling is the king's two-square
/// step, not king-takes-rook.
fn endpoints(mv: &Move) -> (Square, Square) {
    match mv {
        Move::Normal { from, to, .. } => (*from, *to),
        Move::EnPassant { from, to } => (*from, *to),
        Move::Castle { king, rook } => {
            let file = if rook.file() > king.file() { File::G } else { File::C };
            (*king, Square::from_coords(file, king.rank()))
        }
        Move::Put { to, .. } => (*to, *to),
    }
}
