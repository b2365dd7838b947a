//! Game session state: move log, replay cursor and derived status.

use std::sync::Arc;

use chess_core::{
    Color, DrawReason, GameResult, GameStatus, MoveRecord, PositionString, Rules, Square,
    StandardRules,
};
use tracing::{debug, info};

use crate::error::SessionError;

/// Milliseconds since the Unix epoch.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn wall_clock() -> Clock {
    Arc::new(|| chrono::Utc::now().timestamp_millis())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    InProgress,
    Checkmate,
    Stalemate,
    Draw,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        self != GamePhase::InProgress
    }
}

/// One game. Owns the log and cursor; views only borrow it.
///
/// `live` is the position after the last accepted move. `displayed` is the
/// position at the replay cursor and equals `live` unless the player is
/// reviewing an earlier move.
pub struct GameSession<R: Rules = StandardRules> {
    live: R,
    displayed: R,
    moves: Vec<MoveRecord>,
    cursor: Option<usize>,
    clock: Clock,
}

impl<R: Rules> Default for GameSession<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rules> GameSession<R> {
    pub fn new() -> Self {
        Self::with_clock(wall_clock())
    }

    pub fn with_clock(clock: Clock) -> Self {
        let live = R::initial();
        Self {
            displayed: live.clone(),
            live,
            moves: Vec::new(),
            cursor: None,
            clock,
        }
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// Cursor as an index; `None` is the initial position.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor using `-1` for the initial position.
    pub fn cursor_index(&self) -> i64 {
        self.cursor.map_or(-1, |i| i as i64)
    }

    pub fn is_at_latest(&self) -> bool {
        self.cursor == self.moves.len().checked_sub(1)
    }

    pub fn live_position(&self) -> PositionString {
        self.live.position()
    }

    pub fn displayed_position(&self) -> PositionString {
        self.displayed.position()
    }

    /// Side to move in the displayed position.
    pub fn side_to_move(&self) -> Color {
        self.displayed.turn()
    }

    /// Side to move in the live position.
    pub fn live_turn(&self) -> Color {
        self.live.turn()
    }

    pub fn piece_side_at(&self, square: Square) -> Option<Color> {
        self.displayed.side_at(square)
    }

    pub fn piece_char_at(&self, square: Square) -> Option<char> {
        self.displayed.piece_char(square)
    }

    /// Whether `from`-`to` is legal in the displayed position.
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        self.displayed.find_move(from, to).is_some()
    }

    /// Target squares of the legal moves leaving `source`.
    pub fn legal_targets(&self, source: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .displayed
            .legal_moves(Some(source))
            .iter()
            .map(|mv| self.displayed.inspect(mv).target)
            .collect();
        // One entry per square, not per promotion piece.
        targets.sort();
        targets.dedup();
        targets
    }

    /// Validate and play a move given as two squares.
    ///
    /// Legality is a pure query against the live position; nothing is
    /// played until the move is known to be legal.
    pub fn propose_move(&mut self, from: Square, to: Square) -> Result<MoveRecord, SessionError> {
        self.ensure_playable()?;

        if self.live.side_at(from) != Some(self.live.turn()) {
            return Err(SessionError::NoPieceOnSource(from));
        }

        let mv = self
            .live
            .find_move(from, to)
            .ok_or(SessionError::IllegalMove { from, to })?;

        Ok(self.commit(&mv))
    }

    /// Validate and play a move given as notation (engine replies).
    pub fn apply_external_move(&mut self, notation: &str) -> Result<MoveRecord, SessionError> {
        self.ensure_playable()?;

        let mv = self
            .live
            .parse_notation(notation)
            .ok_or_else(|| SessionError::IllegalNotation(notation.to_string()))?;

        Ok(self.commit(&mv))
    }

    /// Show the position after move `index` (`-1` for the start) by replaying
    /// the log from the initial position. The log is not touched.
    pub fn jump_to(&mut self, index: i64) -> Result<(), SessionError> {
        let last = self.moves.len() as i64 - 1;
        if index < -1 || index > last {
            return Err(SessionError::ReplayIndexOutOfRange { index, last });
        }

        let count = (index + 1) as usize;
        let mut rules = R::initial();
        for (i, record) in self.moves[..count].iter().enumerate() {
            let mv = rules
                .parse_notation(&record.notation)
                .ok_or(SessionError::ReplayDiverged(i))?;
            rules.apply(&mv);
            if rules.position() != record.resulting_position {
                return Err(SessionError::ReplayDiverged(i));
            }
        }

        self.displayed = rules;
        self.cursor = count.checked_sub(1);
        debug!(cursor = index, "Jumped in move list");
        Ok(())
    }

    pub fn jump_to_latest(&mut self) -> Result<(), SessionError> {
        self.jump_to(self.moves.len() as i64 - 1)
    }

    /// Status of the displayed position.
    pub fn status(&self) -> GameStatus {
        let count = self.cursor.map_or(0, |i| i + 1);
        compute_status(&self.displayed, &self.moves[..count])
    }

    /// Status of the live position.
    pub fn live_status(&self) -> GameStatus {
        compute_status(&self.live, &self.moves)
    }

    pub fn phase(&self) -> GamePhase {
        let status = self.live_status();
        if status.is_checkmate {
            GamePhase::Checkmate
        } else if status.is_stalemate {
            GamePhase::Stalemate
        } else if status.is_draw {
            GamePhase::Draw
        } else {
            GamePhase::InProgress
        }
    }

    pub fn reset(&mut self) {
        self.live = R::initial();
        self.displayed = self.live.clone();
        self.moves.clear();
        self.cursor = None;
        info!("New game");
    }

    fn ensure_playable(&self) -> Result<(), SessionError> {
        if self.phase().is_terminal() {
            return Err(SessionError::GameOver);
        }
        if !self.is_at_latest() {
            return Err(SessionError::ReviewingHistory);
        }
        Ok(())
    }

    fn commit(&mut self, mv: &R::Move) -> MoveRecord {
        let facts = self.live.apply(mv);
        let record = MoveRecord {
            source: facts.source,
            target: facts.target,
            notation: facts.notation,
            resulting_position: self.live.position(),
            timestamp: (self.clock)(),
            side: facts.side,
            capture: facts.capture,
            check: facts.check,
            castle: facts.castle,
        };

        self.moves.push(record.clone());
        self.cursor = Some(self.moves.len() - 1);
        self.displayed = self.live.clone();

        debug!(
            ply = self.moves.len(),
            notation = %record.notation,
            "Move accepted"
        );
        record
    }
}

fn compute_status<R: Rules>(rules: &R, history: &[MoveRecord]) -> GameStatus {
    let flags = rules.status();
    let position = rules.position();

    let draw_reason = if flags.checkmate {
        None
    } else if flags.stalemate {
        Some(DrawReason::Stalemate)
    } else if flags.insufficient_material {
        Some(DrawReason::InsufficientMaterial)
    } else if flags.fifty_moves {
        Some(DrawReason::FiftyMoveRule)
    } else if repetitions(&position, history) >= 3 {
        Some(DrawReason::ThreefoldRepetition)
    } else {
        None
    };

    let result = if flags.checkmate {
        match flags.turn {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    } else if draw_reason.is_some() {
        GameResult::Draw
    } else {
        GameResult::None
    };

    GameStatus {
        position,
        is_over: flags.checkmate || draw_reason.is_some(),
        result,
        side_to_move: flags.turn,
        in_check: flags.check,
        is_checkmate: flags.checkmate,
        is_stalemate: flags.stalemate,
        is_draw: draw_reason.is_some(),
        draw_reason,
    }
}

/// Occurrences of `position` in the game so far, counting the start.
fn repetitions(position: &PositionString, history: &[MoveRecord]) -> usize {
    let key = position.repetition_key();
    let start = PositionString::initial();

    std::iter::once(&start)
        .chain(history.iter().map(|record| &record.resulting_position))
        .filter(|seen| seen.repetition_key() == key)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    fn ticking_clock() -> Clock {
        let now = Arc::new(AtomicI64::new(1_000));
        Arc::new(move || now.fetch_add(1_000, Ordering::SeqCst))
    }

    fn session() -> GameSession {
        GameSession::with_clock(ticking_clock())
    }

    fn play(session: &mut GameSession, moves: &[&str]) {
        for san in moves {
            session.apply_external_move(san).unwrap();
        }
    }

    #[test]
    fn test_first_move_flips_turn() {
        let mut session = session();
        let record = session.propose_move(Square::E2, Square::E4).unwrap();

        assert_eq!(record.notation, "e4");
        assert_eq!(record.side, Color::White);
        assert_eq!(session.moves().len(), 1);
        assert_eq!(session.cursor(), Some(0));

        let status = session.status();
        assert_eq!(status.side_to_move, Color::Black);
        assert!(!status.is_over);
        assert_eq!(status.result, GameResult::None);
    }

    #[test]
    fn test_rejected_move_leaves_position_untouched() {
        let mut session = session();
        let before = session.live_position();

        assert_eq!(
            session.propose_move(Square::E2, Square::E5),
            Err(SessionError::IllegalMove { from: Square::E2, to: Square::E5 })
        );
        assert_eq!(
            session.propose_move(Square::E7, Square::E5),
            Err(SessionError::NoPieceOnSource(Square::E7))
        );
        assert_eq!(
            session.propose_move(Square::E4, Square::E5),
            Err(SessionError::NoPieceOnSource(Square::E4))
        );
        assert_eq!(session.live_position(), before);
        assert!(session.moves().is_empty());
    }

    #[test]
    fn test_timestamps_come_from_clock() {
        let mut session = session();
        play(&mut session, &["e4", "e5"]);
        assert_eq!(session.moves()[0].timestamp, 1_000);
        assert_eq!(session.moves()[1].timestamp, 2_000);
    }

    #[test]
    fn test_jump_replays_without_touching_log() {
        let mut session = session();
        play(&mut session, &["e4", "e5", "Nf3"]);
        let live = session.live_position();

        session.jump_to(-1).unwrap();
        assert_eq!(session.displayed_position(), PositionString::initial());
        assert_eq!(session.cursor_index(), -1);
        assert_eq!(session.moves().len(), 3);

        session.jump_to(0).unwrap();
        assert_eq!(session.displayed_position(), session.moves()[0].resulting_position);
        assert_eq!(session.side_to_move(), Color::Black);

        session.jump_to(2).unwrap();
        assert_eq!(session.displayed_position(), live);
        assert!(session.is_at_latest());
    }

    #[test]
    fn test_jump_out_of_range_is_rejected() {
        let mut session = session();
        play(&mut session, &["e4"]);

        assert_eq!(
            session.jump_to(1),
            Err(SessionError::ReplayIndexOutOfRange { index: 1, last: 0 })
        );
        assert_eq!(
            session.jump_to(-2),
            Err(SessionError::ReplayIndexOutOfRange { index: -2, last: 0 })
        );
        assert_eq!(session.cursor(), Some(0));
    }

    #[test]
    fn test_moves_blocked_while_reviewing() {
        let mut session = session();
        play(&mut session, &["e4", "e5"]);
        session.jump_to(0).unwrap();

        assert_eq!(
            session.propose_move(Square::G1, Square::F3),
            Err(SessionError::ReviewingHistory)
        );

        session.jump_to_latest().unwrap();
        assert!(session.propose_move(Square::G1, Square::F3).is_ok());
    }

    #[test]
    fn test_checkmate_ends_the_game() {
        let mut session = session();
        play(&mut session, &["f3", "e5", "g4", "Qh4#"]);

        let status = session.status();
        assert!(status.is_checkmate);
        assert!(status.is_over);
        assert!(status.in_check);
        assert_eq!(status.result, GameResult::BlackWins);
        assert_eq!(session.phase(), GamePhase::Checkmate);

        assert_eq!(
            session.propose_move(Square::A2, Square::A3),
            Err(SessionError::GameOver)
        );
        assert_eq!(session.apply_external_move("a3"), Err(SessionError::GameOver));
    }

    #[test]
    fn test_threefold_repetition_is_a_draw() {
        let mut session = session();
        play(
            &mut session,
            &["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"],
        );

        let status = session.status();
        assert!(status.is_draw);
        assert_eq!(status.draw_reason, Some(DrawReason::ThreefoldRepetition));
        assert_eq!(status.result, GameResult::Draw);
        assert_eq!(session.phase(), GamePhase::Draw);
    }

    #[test]
    fn test_status_follows_cursor() {
        let mut session = session();
        play(&mut session, &["f3", "e5", "g4", "Qh4#"]);
        session.jump_to(1).unwrap();

        assert!(!session.status().is_over);
        assert!(session.live_status().is_over);
    }

    #[test]
    fn test_reset_returns_to_start() {
        let mut session = session();
        play(&mut session, &["f3", "e5", "g4", "Qh4#"]);
        session.reset();

        assert!(session.moves().is_empty());
        assert_eq!(session.cursor(), None);
        assert_eq!(session.live_position(), PositionString::initial());
        assert_eq!(session.phase(), GamePhase::InProgress);
        assert!(session.propose_move(Square::E2, Square::E4).is_ok());
    }

    fn status_of(fen: &str) -> GameStatus {
        let rules = StandardRules::from_position(&PositionString::new(fen)).unwrap();
        compute_status(&rules, &[])
    }

    #[test]
    fn test_bare_kings_are_insufficient_material() {
        let status = status_of("8/8/4k3/8/8/4K3/8/8 w - - 0 60");
        assert!(status.is_draw && status.is_over);
        assert!(!status.is_stalemate);
        assert_eq!(status.draw_reason, Some(DrawReason::InsufficientMaterial));
        assert_eq!(status.result, GameResult::Draw);
    }

    #[test]
    fn test_fifty_move_rule_is_a_draw() {
        let status = status_of("4k3/8/8/8/8/8/4P3/4K2R w K - 100 80");
        assert_eq!(status.draw_reason, Some(DrawReason::FiftyMoveRule));
        assert!(status.is_over);

        let status = status_of("4k3/8/8/8/8/8/4P3/4K2R w K - 99 80");
        assert_eq!(status.draw_reason, None);
        assert!(!status.is_over);
    }

    #[test]
    fn test_promotion_target_listed_once() {
        let mut session = session();
        play(
            &mut session,
            &["h4", "g5", "hxg5", "h6", "gxh6", "Bg7", "h7", "a6"],
        );
        assert_eq!(session.legal_targets(Square::H7), vec![Square::G8]);
    }

    #[test]
    fn test_legal_targets_for_knight() {
        let session = session();
        let mut targets = session.legal_targets(Square::G1);
        targets.sort();
        assert_eq!(targets, vec![Square::F3, Square::H3]);
        assert!(session.legal_targets(Square::E8).is_empty());
    }
}
