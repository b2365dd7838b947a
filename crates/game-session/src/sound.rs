//! Move sounds. Fire-and-forget: failures are logged and never reach the game.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::SoundError;

pub trait SoundSink {
    fn on_move(&mut self, capture: bool, check: bool, castle: bool);
    fn on_game_end(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    Move,
    Capture,
    Check,
    Castle,
    GameEnd,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 5] = [
        SoundEffect::Move,
        SoundEffect::Capture,
        SoundEffect::Check,
        SoundEffect::Castle,
        SoundEffect::GameEnd,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SoundEffect::Move => "move.mp3",
            SoundEffect::Capture => "capture.mp3",
            SoundEffect::Check => "check.mp3",
            SoundEffect::Castle => "castle.mp3",
            SoundEffect::GameEnd => "game-end.mp3",
        }
    }

    pub fn volume(self) -> f32 {
        match self {
            SoundEffect::Move => 0.5,
            SoundEffect::Capture => 0.6,
            SoundEffect::Check => 0.7,
            SoundEffect::Castle => 0.5,
            SoundEffect::GameEnd => 0.8,
        }
    }
}

/// One effect per move: castle, then check, then capture, then a plain move.
pub fn effect_for(capture: bool, check: bool, castle: bool) -> SoundEffect {
    if castle {
        SoundEffect::Castle
    } else if check {
        SoundEffect::Check
    } else if capture {
        SoundEffect::Capture
    } else {
        SoundEffect::Move
    }
}

/// Terminal sound output. Rings the bell once the sound files are found.
#[derive(Debug, Clone)]
pub struct SoundBoard {
    dir: Option<PathBuf>,
}

impl SoundBoard {
    /// Silent when disabled or when any sound file is missing.
    pub fn init(enabled: bool, dir: impl AsRef<Path>) -> Self {
        if !enabled {
            return Self::disabled();
        }

        let dir = dir.as_ref();
        match check_files(dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "Sounds loaded");
                Self {
                    dir: Some(dir.to_path_buf()),
                }
            }
            Err(e) => {
                warn!(error = %e, "Sound unavailable, continuing without sound");
                Self::disabled()
            }
        }
    }

    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.dir.is_some()
    }

    pub fn play(&mut self, effect: SoundEffect) {
        if self.dir.is_none() {
            return;
        }

        debug!(effect = effect.file_name(), volume = effect.volume(), "Playing sound");
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            warn!(error = %e, "Sound playback failed");
        }
    }
}

impl SoundSink for SoundBoard {
    fn on_move(&mut self, capture: bool, check: bool, castle: bool) {
        self.play(effect_for(capture, check, castle));
    }

    fn on_game_end(&mut self) {
        self.play(SoundEffect::GameEnd);
    }
}

fn check_files(dir: &Path) -> Result<(), SoundError> {
    for effect in SoundEffect::ALL {
        let path = dir.join(effect.file_name());
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(SoundError::Missing(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SoundError::Missing(path))
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
