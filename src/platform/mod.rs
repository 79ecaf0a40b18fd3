//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (held keys to steering intent, shortcut keys)
//! - Frame timing and visibility transitions

pub mod clock;
pub mod input;

pub use clock::FrameClock;
pub use input::{Direction, KeyAction, KeyState, action_for};
