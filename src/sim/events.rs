//! Notifications emitted by the simulation
//!
//! The step never touches audio, DOM or storage directly. It queues events
//! that the driver drains after each frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::PowerUpKind;
use crate::Color;

/// Audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    Hit,
    Success,
    AmbientStart,
    AmbientStop,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    Crashed,
    OutOfFuel,
}

impl EndReason {
    pub fn message(self) -> &'static str {
        match self {
            EndReason::Crashed => "Crashed into obstacle!",
            EndReason::OutOfFuel => "Out of fuel!",
        }
    }
}

/// Overlay screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Start,
    LevelComplete,
    GameOver,
}

pub const CRASH_FLASH: Color = [1.0, 0.0, 0.0, 0.5];
pub const ABSORB_FLASH: Color = [0.0, 1.0, 1.0, 0.3];

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(SoundCue),
    ScorePopup {
        pos: Vec2,
        label: String,
    },
    ScreenFlash {
        color: Color,
        duration_ms: u32,
    },
    PowerUpActivated {
        kind: PowerUpKind,
        duration: f32,
    },
    ShowScreen(Screen),
    HideScreen(Screen),
    LevelStarted {
        level: u32,
    },
    LevelComplete {
        level: u32,
        score: u64,
        bonus: u64,
    },
    GameOver {
        reason: EndReason,
        score: u64,
        level: u32,
        high_score: u64,
        new_high_score: bool,
    },
    GameWon {
        score: u64,
        high_score: u64,
        new_high_score: bool,
    },
    /// A new high score that should be persisted and displayed
    HighScore(u64),
}
