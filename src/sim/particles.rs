//! Visual-effect particles
//!
//! Purely cosmetic: nothing in here reads or writes gameplay state. The pool
//! owns its own RNG so bursts never shift the gameplay random stream.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::entity::PowerUpKind;
use crate::consts::MAX_PARTICLES;
use crate::{Color, hsl};

/// Colour family for a pickup burst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstTint {
    Fuel,
    PowerUp(PowerUpKind),
}

/// Particle behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    Explosion,
    /// Pickup sparkle; carries its rotating sparkle phase
    PowerUp { tint: BurstTint, sparkle: f32 },
    Collect,
    Spark,
}

/// A single particle
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Current radius, shrinks with remaining life
    pub size: f32,
    pub max_size: f32,
    pub life: f32,
    pub max_life: f32,
    /// Life lost per second
    pub fade_rate: f32,
    /// Downward acceleration (negative floats upward)
    pub gravity: f32,
    /// Velocity multiplier applied each update
    pub friction: f32,
    pub kind: ParticleKind,
}

impl Particle {
    fn spawn(rng: &mut Pcg32, pos: Vec2, kind: ParticleKind) -> Self {
        let mut r = || rng.random::<f32>();
        let (color, size, vel, gravity, friction, fade_rate, kind) = match kind {
            ParticleKind::Explosion => (
                hsl(r() * 60.0, 1.0, 0.5 + r() * 0.3),
                2.0 + r() * 4.0,
                Vec2::new((r() - 0.5) * 200.0, (r() - 0.5) * 200.0),
                50.0,
                0.95,
                2.0 + r(),
                kind,
            ),
            ParticleKind::PowerUp { tint, .. } => {
                let color = match tint {
                    BurstTint::Fuel => hsl(120.0 + r() * 60.0, 0.8, 0.5 + r() * 0.3),
                    BurstTint::PowerUp(PowerUpKind::Shield) => {
                        hsl(180.0 + r() * 60.0, 0.8, 0.5 + r() * 0.3)
                    }
                    BurstTint::PowerUp(PowerUpKind::Invincibility) => {
                        hsl(45.0 + r() * 15.0, 1.0, 0.6 + r() * 0.2)
                    }
                    BurstTint::PowerUp(PowerUpKind::Magnetic) => {
                        hsl(r() * 20.0, 0.8, 0.5 + r() * 0.3)
                    }
                    BurstTint::PowerUp(PowerUpKind::Speed) => {
                        hsl(300.0 + r() * 60.0, 0.8, 0.6 + r() * 0.2)
                    }
                };
                (
                    color,
                    3.0 + r() * 3.0,
                    Vec2::new((r() - 0.5) * 100.0, -50.0 - r() * 50.0),
                    -20.0,
                    0.98,
                    1.5,
                    ParticleKind::PowerUp {
                        tint,
                        sparkle: r() * std::f32::consts::TAU,
                    },
                )
            }
            ParticleKind::Collect => (
                [1.0, 0.843, 0.0, 1.0],
                2.0 + r() * 2.0,
                Vec2::new((r() - 0.5) * 80.0, -80.0 - r() * 40.0),
                100.0,
                0.96,
                2.5,
                kind,
            ),
            ParticleKind::Spark => (
                [1.0, 1.0, 1.0, 1.0],
                1.0 + r() * 2.0,
                Vec2::new((r() - 0.5) * 150.0, (r() - 0.5) * 150.0),
                0.0,
                0.92,
                3.0,
                kind,
            ),
        };
        Self {
            pos,
            vel,
            color,
            size,
            max_size: size,
            life: 1.0,
            max_life: 1.0,
            fade_rate,
            gravity,
            friction,
            kind,
        }
    }

    /// Integrate one step; returns false once life has run out
    pub fn update(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        self.vel.y += self.gravity * dt;
        self.vel *= self.friction;

        self.life -= self.fade_rate * dt;
        self.size = (self.max_size * (self.life / self.max_life)).max(0.0);

        if let ParticleKind::PowerUp { sparkle, .. } = &mut self.kind {
            *sparkle += dt * 10.0;
        }
        self.life > 0.0
    }

    /// Opacity derived from remaining life
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Capped particle pool
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    max_particles: usize,
    rng: Pcg32,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(0, MAX_PARTICLES)
    }
}

impl ParticleSystem {
    pub fn new(seed: u64, max_particles: usize) -> Self {
        Self {
            particles: Vec::with_capacity(max_particles.min(MAX_PARTICLES)),
            max_particles,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
    }

    /// Emit `count` particles jittered within `spread` around `center`.
    /// Stops silently at the cap.
    fn burst(&mut self, center: Vec2, count: usize, spread: f32, kind: ParticleKind) {
        for _ in 0..count {
            if self.particles.len() >= self.max_particles {
                break;
            }
            let offset = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread,
            );
            let particle = Particle::spawn(&mut self.rng, center + offset, kind);
            self.particles.push(particle);
        }
    }

    /// Crash burst; `intensity` 1 for an absorbed hit, 2 for a fatal one
    pub fn explosion(&mut self, center: Vec2, intensity: u32) {
        let count = 10 + intensity as usize * 15;
        self.burst(center, count, 20.0, ParticleKind::Explosion);
    }

    /// Coloured sparkle plus white sparks for a fuel or power-up pickup
    pub fn power_up_burst(&mut self, center: Vec2, tint: BurstTint) {
        self.burst(
            center,
            15,
            30.0,
            ParticleKind::PowerUp { tint, sparkle: 0.0 },
        );
        self.burst(center, 8, 40.0, ParticleKind::Spark);
    }

    pub fn collect_burst(&mut self, center: Vec2) {
        self.burst(center, 8, 15.0, ParticleKind::Collect);
    }

    pub fn spark_trail(&mut self, origin: Vec2, count: usize) {
        self.burst(origin, count, 10.0, ParticleKind::Spark);
    }

    /// Exhaust sparks for an active speed boost: 70% of frames, two sparks
    /// at a random point along the car's rear edge
    pub fn speed_trail(&mut self, rear_center: Vec2, width: f32) {
        if self.rng.random::<f32>() >= 0.7 {
            return;
        }
        let x = rear_center.x + (self.rng.random::<f32>() - 0.5) * width;
        self.spark_trail(Vec2::new(x, rear_center.y), 2);
    }

    /// Advance every particle and drop the ones whose life ran out
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.update(dt));
    }
}
