//! Two-click board input

use chess_core::{Rules, Square};

use crate::session::GameSession;
use crate::settings::PlayerSide;

/// What a click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Board disabled, not the player's turn, or nothing to pick up.
    Ignored,
    Selected(Square),
    Cleared,
    /// A legal move was chosen; the caller decides whether to play it.
    Intent { from: Square, to: Square },
}

#[derive(Debug, Clone, Default)]
pub struct BoardInput {
    selected: Option<Square>,
}

impl BoardInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn click<R: Rules>(
        &mut self,
        square: Square,
        session: &GameSession<R>,
        side: PlayerSide,
        disabled: bool,
    ) -> Selection {
        let turn = session.side_to_move();
        if disabled || !side.controls(turn) {
            return Selection::Ignored;
        }

        let movable = session.piece_side_at(square) == Some(turn);

        let Some(from) = self.selected else {
            if movable {
                self.selected = Some(square);
                return Selection::Selected(square);
            }
            return Selection::Ignored;
        };

        if from == square {
            self.selected = None;
            return Selection::Cleared;
        }

        if session.is_legal(from, square) {
            self.selected = None;
            return Selection::Intent { from, to: square };
        }

        // Not a legal target: pick up the clicked piece instead, if possible.
        if movable {
            self.selected = Some(square);
            Selection::Selected(square)
        } else {
            self.selected = None;
            Selection::Cleared
        }
    }

    /// Legal targets of the selected piece.
    pub fn highlights<R: Rules>(&self, session: &GameSession<R>) -> Vec<Square> {
        self.selected
            .map(|square| session.legal_targets(square))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new()
    }

    #[test]
    fn test_two_clicks_make_an_intent() {
        let session = session();
        let mut input = BoardInput::new();

        assert_eq!(
            input.click(Square::E2, &session, PlayerSide::White, false),
            Selection::Selected(Square::E2)
        );
        assert_eq!(input.highlights(&session).len(), 2);
        assert_eq!(
            input.click(Square::E4, &session, PlayerSide::White, false),
            Selection::Intent { from: Square::E2, to: Square::E4 }
        );
        assert_eq!(input.selected(), None);
    }

    #[test]
    fn test_clicking_selection_again_clears_it() {
        let session = session();
        let mut input = BoardInput::new();
        input.click(Square::G1, &session, PlayerSide::White, false);

        assert_eq!(
            input.click(Square::G1, &session, PlayerSide::White, false),
            Selection::Cleared
        );
        assert!(input.highlights(&session).is_empty());
    }

    #[test]
    fn test_illegal_target_reselects_own_piece() {
        let session = session();
        let mut input = BoardInput::new();
        input.click(Square::E2, &session, PlayerSide::White, false);

        assert_eq!(
            input.click(Square::D2, &session, PlayerSide::White, false),
            Selection::Selected(Square::D2)
        );
        assert_eq!(
            input.click(Square::D5, &session, PlayerSide::White, false),
            Selection::Cleared
        );
    }

    #[test]
    fn test_king_then_own_rook_selects_the_rook() {
        let mut session = session();
        for san in ["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5"] {
            session.apply_external_move(san).unwrap();
        }
        let mut input = BoardInput::new();
        input.click(Square::E1, &session, PlayerSide::White, false);

        assert_eq!(
            input.click(Square::H1, &session, PlayerSide::White, false),
            Selection::Selected(Square::H1)
        );
        assert_eq!(
            input.click(Square::E1, &session, PlayerSide::White, false),
            Selection::Selected(Square::E1)
        );
        assert_eq!(
            input.click(Square::G1, &session, PlayerSide::White, false),
            Selection::Intent { from: Square::E1, to: Square::G1 }
        );
    }

    #[test]
    fn test_empty_or_enemy_square_is_ignored() {
        let session = session();
        let mut input = BoardInput::new();

        assert_eq!(
            input.click(Square::E4, &session, PlayerSide::White, false),
            Selection::Ignored
        );
        assert_eq!(
            input.click(Square::E7, &session, PlayerSide::White, false),
            Selection::Ignored
        );
        assert_eq!(input.selected(), None);
    }

    #[test]
    fn test_wrong_side_or_disabled_is_ignored() {
        let session = session();
        let mut input = BoardInput::new();

        assert_eq!(
            input.click(Square::E2, &session, PlayerSide::Black, false),
            Selection::Ignored
        );
        assert_eq!(
            input.click(Square::E2, &session, PlayerSide::White, true),
            Selection::Ignored
        );
        assert_eq!(
            input.click(Square::E2, &session, PlayerSide::Both, false),
            Selection::Selected(Square::E2)
        );
    }
}
