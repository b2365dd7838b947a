//! Game controller: routes player input and engine replies into the session.
//!
//! The controller never awaits while holding the session. An engine turn is a
//! ticket: [`GameController::analysis_future`] produces a detached future for
//! it, and [`GameController::resolve`] checks the outcome against the live
//! position once it arrives. Replies for a position that has since changed are
//! dropped.

use std::future::Future;

use chess_core::{MoveRecord, PositionString, Rules, Square, StandardRules};
use mock_engine::{Difficulty, EngineAnalysis, EngineError, MockEngine};
use tracing::{debug, info, warn};

use crate::error::SessionError;
use crate::input::{BoardInput, Selection};
use crate::session::GameSession;
use crate::settings::GameSettings;
use crate::sound::{SoundBoard, SoundSink};

/// One outstanding engine request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisTicket {
    pub id: u64,
    pub position: PositionString,
    pub difficulty: Difficulty,
}

/// An accepted player move, plus the engine request it triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerTurn {
    pub record: MoveRecord,
    pub engine_request: Option<AnalysisTicket>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickResult {
    Ignored,
    Selected(Square),
    Cleared,
    Played(PlayerTurn),
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineReply {
    Applied {
        record: MoveRecord,
        analysis: EngineAnalysis,
        /// Issued when the engine is also due to answer the new position.
        next_request: Option<AnalysisTicket>,
    },
    /// Superseded by a newer request or a move made in the meantime.
    Stale,
    /// The side to move had no legal moves.
    NoMove,
    /// The reply no longer fits the session (game over, reviewing history).
    Discarded(SessionError),
    Failed(String),
}

pub struct GameController<R: Rules = StandardRules, S: SoundSink = SoundBoard> {
    session: GameSession<R>,
    engine: MockEngine,
    settings: GameSettings,
    sound: S,
    input: BoardInput,
    pending: Option<AnalysisTicket>,
    next_id: u64,
}

impl<R, S> GameController<R, S>
where
    R: Rules + Send + 'static,
    S: SoundSink + 'static,
{
    pub fn new(settings: GameSettings, engine: MockEngine, sound: S) -> Self {
        Self::with_session(GameSession::new(), settings, engine, sound)
    }

    pub fn with_session(
        session: GameSession<R>,
        settings: GameSettings,
        engine: MockEngine,
        sound: S,
    ) -> Self {
        Self {
            session,
            engine,
            settings,
            sound,
            input: BoardInput::new(),
            pending: None,
            next_id: 0,
        }
    }

    pub fn session(&self) -> &GameSession<R> {
        &self.session
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn sound(&self) -> &S {
        &self.sound
    }

    pub fn input(&self) -> &BoardInput {
        &self.input
    }

    pub fn pending(&self) -> Option<&AnalysisTicket> {
        self.pending.as_ref()
    }

    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_board_disabled(&self) -> bool {
        self.is_thinking() || self.session.phase().is_terminal() || !self.session.is_at_latest()
    }

    /// Engine's opening move when it plays White.
    pub fn start(&mut self) -> Option<AnalysisTicket> {
        info!(
            side = %self.settings.side,
            difficulty = self.settings.difficulty.level(),
            "Game started"
        );
        self.engine_turn_if_due()
    }

    pub fn play(&mut self, from: Square, to: Square) -> Result<PlayerTurn, SessionError> {
        self.ensure_player_turn()?;
        let record = self.session.propose_move(from, to)?;
        Ok(self.after_player_move(record))
    }

    /// Player move typed as SAN or UCI.
    pub fn play_notation(&mut self, notation: &str) -> Result<PlayerTurn, SessionError> {
        self.ensure_player_turn()?;
        let record = self.session.apply_external_move(notation)?;
        Ok(self.after_player_move(record))
    }

    pub fn click(&mut self, square: Square) -> Result<ClickResult, SessionError> {
        let disabled = self.is_board_disabled();
        let selection = self
            .input
            .click(square, &self.session, self.settings.side, disabled);

        match selection {
            Selection::Ignored => Ok(ClickResult::Ignored),
            Selection::Selected(square) => Ok(ClickResult::Selected(square)),
            Selection::Cleared => Ok(ClickResult::Cleared),
            Selection::Intent { from, to } => self.play(from, to).map(ClickResult::Played),
        }
    }

    /// Ask the engine to move for whichever side is to move.
    pub fn request_engine_move(&mut self) -> Result<AnalysisTicket, SessionError> {
        if self.session.phase().is_terminal() {
            return Err(SessionError::GameOver);
        }
        if !self.session.is_at_latest() {
            return Err(SessionError::ReviewingHistory);
        }
        Ok(self.begin_engine_turn())
    }

    /// Issue a new ticket for the live position, replacing any pending one.
    pub fn begin_engine_turn(&mut self) -> AnalysisTicket {
        self.next_id += 1;
        let ticket = AnalysisTicket {
            id: self.next_id,
            position: self.session.live_position(),
            difficulty: self.settings.difficulty,
        };

        info!(
            ticket = ticket.id,
            side = ?self.session.live_turn(),
            difficulty = ticket.difficulty.level(),
            "Engine is thinking"
        );
        self.pending = Some(ticket.clone());
        ticket
    }

    /// Detached analysis for `ticket`; owns everything it needs.
    pub fn analysis_future(
        &self,
        ticket: &AnalysisTicket,
    ) -> impl Future<Output = Result<Option<EngineAnalysis>, EngineError>> + Send + 'static {
        let engine = self.engine.clone();
        let position = ticket.position.clone();
        let difficulty = ticket.difficulty;
        async move { engine.request_move::<R>(position, difficulty).await }
    }

    /// Apply an engine outcome if `ticket` is still the current request and
    /// the live position has not moved on.
    pub fn resolve(
        &mut self,
        ticket: &AnalysisTicket,
        outcome: Result<Option<EngineAnalysis>, EngineError>,
    ) -> EngineReply {
        if self.pending.as_ref().map(|p| p.id) != Some(ticket.id) {
            debug!(ticket = ticket.id, "Discarding superseded engine reply");
            return EngineReply::Stale;
        }
        self.pending = None;

        if self.session.live_position() != ticket.position {
            debug!(ticket = ticket.id, "Discarding engine reply for an old position");
            return EngineReply::Stale;
        }

        let analysis = match outcome {
            Ok(Some(analysis)) => analysis,
            Ok(None) => {
                debug!(ticket = ticket.id, "Engine has no legal move");
                return EngineReply::NoMove;
            }
            Err(e) => {
                warn!(ticket = ticket.id, error = %e, "Engine request failed");
                return EngineReply::Failed(e.to_string());
            }
        };

        match self.session.apply_external_move(&analysis.mv) {
            Ok(record) => {
                info!(
                    notation = %record.notation,
                    evaluation = analysis.evaluation,
                    depth = analysis.depth,
                    "Engine moved"
                );
                self.input.clear();
                self.play_sounds(&record);
                EngineReply::Applied {
                    record,
                    analysis,
                    next_request: self.engine_turn_if_due(),
                }
            }
            Err(e) => {
                debug!(ticket = ticket.id, error = %e, "Engine move not applied");
                EngineReply::Discarded(e)
            }
        }
    }

    /// Run one engine turn to completion. The binary races the future
    /// against input instead.
    pub async fn run_engine_turn(&mut self, ticket: AnalysisTicket) -> EngineReply {
        let outcome = self.analysis_future(&ticket).await;
        self.resolve(&ticket, outcome)
    }

    /// Move the replay cursor. Coming back to the latest position restarts
    /// the engine if it is to move and no request is pending.
    pub fn jump_to(&mut self, index: i64) -> Result<Option<AnalysisTicket>, SessionError> {
        self.session.jump_to(index)?;
        self.input.clear();
        Ok(self.engine_turn_if_due())
    }

    pub fn jump_to_latest(&mut self) -> Result<Option<AnalysisTicket>, SessionError> {
        self.jump_to(self.session.moves().len() as i64 - 1)
    }

    /// Start over with the same settings.
    pub fn new_game(&mut self) -> Option<AnalysisTicket> {
        self.session.reset();
        self.pending = None;
        self.input.clear();
        self.engine_turn_if_due()
    }

    fn ensure_player_turn(&self) -> Result<(), SessionError> {
        if self.settings.side.controls(self.session.live_turn()) {
            Ok(())
        } else {
            Err(SessionError::NotYourTurn)
        }
    }

    fn after_player_move(&mut self, record: MoveRecord) -> PlayerTurn {
        // The position changed, so any outstanding reply is stale.
        if let Some(old) = self.pending.take() {
            debug!(ticket = old.id, "Player move supersedes engine request");
        }
        self.input.clear();
        self.play_sounds(&record);

        PlayerTurn {
            record,
            engine_request: self.engine_turn_if_due(),
        }
    }

    fn engine_turn_if_due(&mut self) -> Option<AnalysisTicket> {
        if self.settings.side.engine_color() != Some(self.session.live_turn()) {
            return None;
        }
        if self.session.phase().is_terminal() || !self.session.is_at_latest() {
            return None;
        }
        let live = self.session.live_position();
        if self.pending.as_ref().is_some_and(|p| p.position == live) {
            return None;
        }
        Some(self.begin_engine_turn())
    }

    fn play_sounds(&mut self, record: &MoveRecord) {
        self.sound.on_move(record.capture, record.check, record.castle);
        if self.session.phase().is_terminal() {
            info!(result = ?self.session.live_status().result, "Game over");
            self.sound.on_game_end();
        }
    }
}
