//! The player's car
//!
//! Power-up capabilities are derived from their countdown timers; a timer
//! above zero is the only thing that makes a capability active.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Entity, PowerUpKind};
use crate::consts::*;

/// Countdown timers for every timed ability (seconds remaining)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerUpTimers {
    pub shield: f32,
    pub speed_boost: f32,
    pub invincibility: f32,
    pub magnetic: f32,
}

impl PowerUpTimers {
    pub fn get(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::Shield => self.shield,
            PowerUpKind::Speed => self.speed_boost,
            PowerUpKind::Invincibility => self.invincibility,
            PowerUpKind::Magnetic => self.magnetic,
        }
    }

    fn slot(&mut self, kind: PowerUpKind) -> &mut f32 {
        match kind {
            PowerUpKind::Shield => &mut self.shield,
            PowerUpKind::Speed => &mut self.speed_boost,
            PowerUpKind::Invincibility => &mut self.invincibility,
            PowerUpKind::Magnetic => &mut self.magnetic,
        }
    }

    /// Count every timer down, never below zero
    fn tick(&mut self, dt: f32) {
        for kind in PowerUpKind::ALL {
            let timer = self.slot(kind);
            if *timer > 0.0 {
                *timer = (*timer - dt).max(0.0);
                if *timer == 0.0 {
                    log::debug!("{} expired", kind.label());
                }
            }
        }
    }
}

/// Result of an obstacle hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Invincibility ignored the hit; nothing consumed
    Ignored,
    /// The shield soaked the hit and is now gone
    ShieldAbsorbed,
    /// No protection left; the run ends
    Taken,
}

/// The player's car
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub timers: PowerUpTimers,
    /// Vertical draw offset for the idle bounce
    pub bounce_offset: f32,
    bounce_phase: f32,
}

impl Player {
    /// Place the car centred horizontally near the bottom of the viewport
    pub fn new(viewport: Vec2) -> Self {
        let size = Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT);
        let pos = Vec2::new(
            viewport.x / 2.0 - size.x / 2.0,
            viewport.y - PLAYER_BOTTOM_OFFSET,
        );
        Self {
            body: Body::new(pos, size),
            timers: PowerUpTimers::default(),
            bounce_offset: 0.0,
            bounce_phase: 0.0,
        }
    }

    pub fn has_shield(&self) -> bool {
        self.timers.shield > 0.0
    }

    pub fn has_speed_boost(&self) -> bool {
        self.timers.speed_boost > 0.0
    }

    pub fn is_invincible(&self) -> bool {
        self.timers.invincibility > 0.0
    }

    pub fn has_magnetic(&self) -> bool {
        self.timers.magnetic > 0.0
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.timers.get(kind) > 0.0
    }

    /// Current horizontal speed cap
    pub fn max_speed(&self) -> f32 {
        if self.has_speed_boost() {
            PLAYER_MAX_SPEED * SPEED_BOOST_MULTIPLIER
        } else {
            PLAYER_MAX_SPEED
        }
    }

    /// Start (or restart) a timed ability
    pub fn activate(&mut self, kind: PowerUpKind, duration: f32) {
        *self.timers.slot(kind) = duration.max(0.0);
        log::debug!("{} activated for {duration}s", kind.label());
    }

    /// Steer, integrate, clamp to the viewport and count down timers.
    /// `intent` is the horizontal input in {-1, 0, 1}.
    pub fn steer(&mut self, intent: f32, dt: f32, viewport_width: f32) {
        let intent = intent.clamp(-1.0, 1.0);
        self.body.vel.x += intent * PLAYER_ACCELERATION * dt;
        self.body.vel.x *= PLAYER_FRICTION;
        let max_speed = self.max_speed();
        self.body.vel.x = self.body.vel.x.clamp(-max_speed, max_speed);

        self.body.advance(dt);
        let max_x = (viewport_width - self.body.width()).max(0.0);
        self.body.pos.x = self.body.pos.x.clamp(0.0, max_x);

        self.timers.tick(dt);

        self.bounce_phase += dt * 50.0;
        self.bounce_offset = self.bounce_phase.sin() * 2.0;
    }

    /// Resolve an obstacle hit: invincibility first, then shield, else damage.
    /// At most one protection is consumed.
    pub fn take_damage(&mut self) -> DamageOutcome {
        if self.is_invincible() {
            log::debug!("Invincibility ignored the hit");
            return DamageOutcome::Ignored;
        }
        if self.has_shield() {
            self.timers.shield = 0.0;
            log::debug!("Shield absorbed the hit");
            return DamageOutcome::ShieldAbsorbed;
        }
        DamageOutcome::Taken
    }
}

impl Entity for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT))
    }

    #[test]
    fn test_spawn_position() {
        let p = player();
        assert_eq!(p.body.pos, Vec2::new(380.0, 500.0));
        assert_eq!(p.body.size(), Vec2::new(40.0, 70.0));
    }

    #[test]
    fn test_flags_follow_timers() {
        let mut p = player();
        assert!(!p.has_shield());
        p.activate(PowerUpKind::Shield, 5.0);
        assert!(p.has_shield());
        p.steer(0.0, 0.016, VIEWPORT_WIDTH);
        assert!((p.timers.shield - 4.984).abs() < 1e-4);

        // Run the timer out
        for _ in 0..400 {
            p.steer(0.0, 0.016, VIEWPORT_WIDTH);
        }
        assert_eq!(p.timers.shield, 0.0);
        assert!(!p.has_shield());
    }

    #[test]
    fn test_invincibility_beats_shield() {
        let mut p = player();
        p.activate(PowerUpKind::Invincibility, 4.0);
        p.activate(PowerUpKind::Shield, 5.0);
        assert_eq!(p.take_damage(), DamageOutcome::Ignored);
        assert!(p.has_shield());
        assert_eq!(p.timers.shield, 5.0);
        assert!(p.is_invincible());
    }

    #[test]
    fn test_shield_consumed_once() {
        let mut p = player();
        p.activate(PowerUpKind::Shield, 5.0);
        assert_eq!(p.take_damage(), DamageOutcome::ShieldAbsorbed);
        assert!(!p.has_shield());
        assert_eq!(p.take_damage(), DamageOutcome::Taken);
    }

    #[test]
    fn test_steer_respects_bounds_and_cap() {
        let mut p = player();
        for _ in 0..2000 {
            p.steer(1.0, 0.016, VIEWPORT_WIDTH);
            assert!(p.body.vel.x.abs() <= PLAYER_MAX_SPEED);
        }
        assert_eq!(p.body.pos.x, VIEWPORT_WIDTH - PLAYER_WIDTH);

        for _ in 0..2000 {
            p.steer(-1.0, 0.016, VIEWPORT_WIDTH);
        }
        assert_eq!(p.body.pos.x, 0.0);
    }

    #[test]
    fn test_friction_stops_car() {
        let mut p = player();
        p.steer(1.0, 0.016, VIEWPORT_WIDTH);
        assert!(p.body.vel.x > 0.0);
        for _ in 0..200 {
            p.steer(0.0, 0.016, VIEWPORT_WIDTH);
        }
        assert!(p.body.vel.x.abs() < 1e-3);
    }
}
