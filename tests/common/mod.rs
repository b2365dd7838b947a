#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use game_session::{Clock, GameController, GameSession, GameSettings, PlayerSide, SoundSink};
use mock_engine::{EngineConfig, MockEngine};

/// Clock starting at `start` ms and advancing `step` ms per reading.
pub fn ticking_clock(start: i64, step: i64) -> Clock {
    let now = Arc::new(AtomicI64::new(start));
    Arc::new(move || now.fetch_add(step, Ordering::SeqCst))
}

pub fn session() -> GameSession {
    GameSession::with_clock(ticking_clock(1_000, 1_000))
}

pub fn seeded_engine(seed: u64) -> MockEngine {
    MockEngine::new(EngineConfig {
        seed: Some(seed),
        ..EngineConfig::default()
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEvent {
    Move { capture: bool, check: bool, castle: bool },
    GameEnd,
}

/// Sound sink that remembers what it was asked to play.
#[derive(Debug, Default)]
pub struct RecordingSound {
    pub events: Vec<SoundEvent>,
}

impl SoundSink for RecordingSound {
    fn on_move(&mut self, capture: bool, check: bool, castle: bool) {
        self.events.push(SoundEvent::Move {
            capture,
            check,
            castle,
        });
    }

    fn on_game_end(&mut self) {
        self.events.push(SoundEvent::GameEnd);
    }
}

pub type TestController = GameController<chess_core::StandardRules, RecordingSound>;

pub fn controller(side: PlayerSide, seed: u64) -> TestController {
    let settings = GameSettings {
        side,
        sound_enabled: false,
        ..GameSettings::default()
    };
    GameController::with_session(session(), settings, seeded_engine(seed), RecordingSound::default())
}
