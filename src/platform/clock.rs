//! Frame clock
//!
//! Turns `requestAnimationFrame` timestamps (milliseconds) into clamped
//! per-frame `dt` in seconds.

use crate::consts::MAX_FRAME_DT;

#[derive(Debug, Clone, Copy)]
pub struct FrameClock {
    last_ms: Option<f64>,
    max_dt: f32,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last_ms: None,
            max_dt: max_dt.max(0.0),
        }
    }

    /// Seconds since the previous frame, clamped to `[0, max_dt]`.
    /// The first frame after construction or `reset` yields 0.
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        if dt.is_finite() {
            dt.clamp(0.0, self.max_dt)
        } else {
            0.0
        }
    }

    /// Forget the last timestamp so a hidden-tab gap is not replayed
    pub fn reset(&mut self) {
        self.last_ms = None;
    }
}
