//! Scrolling entities
//!
//! Every gameplay object shares a [`Body`] (position, immutable size,
//! velocity). The four spawnable kinds wrap a body with their own constants
//! and decorative animation state; rendering lives in `renderer::draw`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::OFFSCREEN_MARGIN;

/// Axis-aligned body shared by all entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Integrate position by velocity
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Strict interval overlap on both axes (touching edges do not collide)
    pub fn overlaps(&self, other: &Body) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// True once the top edge has scrolled past the bottom margin
    pub fn is_off_screen(&self, viewport_height: f32) -> bool {
        self.pos.y > viewport_height + OFFSCREEN_MARGIN
    }
}

/// Midpoint between two bodies' centres (explosion origin)
pub fn midpoint(a: &Body, b: &Body) -> Vec2 {
    (a.center() + b.center()) * 0.5
}

/// Common contract for everything that moves and collides
pub trait Entity {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    /// Advance position and any secondary animation
    fn update(&mut self, dt: f32) {
        self.body_mut().advance(dt);
    }

    fn collides_with(&self, other: &dyn Entity) -> bool {
        self.body().overlaps(other.body())
    }

    fn is_off_screen(&self, viewport_height: f32) -> bool {
        self.body().is_off_screen(viewport_height)
    }

    fn center(&self) -> Vec2 {
        self.body().center()
    }
}

macro_rules! impl_body {
    () => {
        fn body(&self) -> &Body {
            &self.body
        }
        fn body_mut(&mut self) -> &mut Body {
            &mut self.body
        }
    };
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Cone,
    Car,
    Truck,
}

impl ObstacleKind {
    pub fn size(self) -> Vec2 {
        match self {
            ObstacleKind::Cone => Vec2::new(25.0, 35.0),
            ObstacleKind::Car => Vec2::new(40.0, 70.0),
            ObstacleKind::Truck => Vec2::new(50.0, 90.0),
        }
    }
}

/// Something to dodge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    pub kind: ObstacleKind,
    /// Wobble phase (cones only)
    pub wobble: f32,
}

impl Obstacle {
    pub fn new(pos: Vec2, kind: ObstacleKind, speed: f32, wobble: f32) -> Self {
        let mut body = Body::new(pos, kind.size());
        body.vel.y = speed;
        Self { body, kind, wobble }
    }
}

impl Entity for Obstacle {
    impl_body!();

    fn update(&mut self, dt: f32) {
        self.body.advance(dt);
        if self.kind == ObstacleKind::Cone {
            self.wobble += dt * 3.0;
        }
    }
}

/// Collectible types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Star,
    Coin,
}

impl CollectibleKind {
    pub fn points(self) -> u64 {
        match self {
            CollectibleKind::Star => 100,
            CollectibleKind::Coin => 50,
        }
    }
}

pub const COLLECTIBLE_SIZE: f32 = 25.0;

/// Points pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub body: Body,
    pub kind: CollectibleKind,
    pub points: u64,
    pub spin: f32,
    pub pulse_phase: f32,
}

impl Collectible {
    pub fn new(pos: Vec2, kind: CollectibleKind, speed: f32) -> Self {
        let mut body = Body::new(pos, Vec2::splat(COLLECTIBLE_SIZE));
        body.vel.y = speed;
        Self {
            body,
            kind,
            points: kind.points(),
            spin: 0.0,
            pulse_phase: 0.0,
        }
    }

    /// Scale factor for the breathing animation
    pub fn pulse_scale(&self) -> f32 {
        1.0 + self.pulse_phase.sin() * 0.2
    }
}

impl Entity for Collectible {
    impl_body!();

    fn update(&mut self, dt: f32) {
        self.body.advance(dt);
        self.spin += 5.0 * dt;
        self.pulse_phase += 30.0 * dt;
    }
}

pub const FUEL_PICKUP_SIZE: Vec2 = Vec2::new(30.0, 40.0);

/// Fuel canister
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelPickup {
    pub body: Body,
    /// Fuel restored on pickup
    pub amount: f32,
    /// Glow intensity, ping-pongs in 0..=1
    pub glow: f32,
    glow_rising: bool,
}

impl FuelPickup {
    pub fn new(pos: Vec2, amount: f32, speed: f32) -> Self {
        let mut body = Body::new(pos, FUEL_PICKUP_SIZE);
        body.vel.y = speed;
        Self {
            body,
            amount,
            glow: 0.0,
            glow_rising: true,
        }
    }
}

impl Entity for FuelPickup {
    impl_body!();

    fn update(&mut self, dt: f32) {
        self.body.advance(dt);
        let step = dt * 3.0;
        if self.glow_rising {
            self.glow += step;
            if self.glow >= 1.0 {
                self.glow = 1.0;
                self.glow_rising = false;
            }
        } else {
            self.glow -= step;
            if self.glow <= 0.0 {
                self.glow = 0.0;
                self.glow_rising = true;
            }
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    Speed,
    Shield,
    Invincibility,
    Magnetic,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Speed,
        PowerUpKind::Shield,
        PowerUpKind::Invincibility,
        PowerUpKind::Magnetic,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PowerUpKind::Speed => "SPEED",
            PowerUpKind::Shield => "SHIELD",
            PowerUpKind::Invincibility => "INVINCIBILITY",
            PowerUpKind::Magnetic => "MAGNETIC",
        }
    }
}

pub const POWER_UP_SIZE: f32 = 35.0;

/// Timed ability pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub body: Body,
    pub kind: PowerUpKind,
    pub spin: f32,
    pub float_phase: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind, speed: f32) -> Self {
        let mut body = Body::new(pos, Vec2::splat(POWER_UP_SIZE));
        body.vel.y = speed;
        Self {
            body,
            kind,
            spin: 0.0,
            float_phase: 0.0,
        }
    }

    /// Vertical draw offset for the hover animation
    pub fn float_offset(&self) -> f32 {
        self.float_phase.sin() * 3.0
    }
}

impl Entity for PowerUp {
    impl_body!();

    fn update(&mut self, dt: f32) {
        self.body.advance(dt);
        self.spin += 4.0 * dt;
        self.float_phase += 40.0 * dt;
    }
}
