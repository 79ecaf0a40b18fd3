//! Spawn timing and weighted type selection

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{
    COLLECTIBLE_SIZE, Collectible, CollectibleKind, FUEL_PICKUP_SIZE, FuelPickup, Obstacle,
    ObstacleKind, POWER_UP_SIZE, PowerUp, PowerUpKind,
};
use super::state::Difficulty;

pub const OBSTACLE_WEIGHTS: [(ObstacleKind, f32); 3] = [
    (ObstacleKind::Cone, 0.5),
    (ObstacleKind::Car, 0.3),
    (ObstacleKind::Truck, 0.2),
];

pub const POWER_UP_WEIGHTS: [(PowerUpKind, f32); 4] = [
    (PowerUpKind::Speed, 0.35),
    (PowerUpKind::Shield, 0.35),
    (PowerUpKind::Invincibility, 0.15),
    (PowerUpKind::Magnetic, 0.15),
];

pub const COLLECTIBLE_WEIGHTS: [(CollectibleKind, f32); 2] =
    [(CollectibleKind::Star, 0.7), (CollectibleKind::Coin, 0.3)];

/// Pick the first entry whose cumulative weight reaches `r` (r in [0, 1)).
/// Falls back to the last entry if rounding leaves `r` uncovered.
pub fn weighted_pick<T: Copy>(table: &[(T, f32)], r: f32) -> T {
    let mut cumulative = 0.0;
    for &(kind, weight) in table {
        cumulative += weight;
        if cumulative >= r {
            return kind;
        }
    }
    table[table.len() - 1].0
}

/// Spawnable categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnKind {
    Obstacle,
    Collectible,
    Fuel,
    PowerUp,
}

/// Seconds elapsed since each kind last spawned
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub obstacle: f32,
    pub collectible: f32,
    pub fuel: f32,
    pub power_up: f32,
}

impl SpawnTimers {
    /// Advance all timers and report which kinds are due, resetting those timers.
    /// Order of the result is obstacle, collectible, fuel, power-up.
    pub fn advance(&mut self, dt: f32, difficulty: &Difficulty) -> Vec<SpawnKind> {
        let mut due = Vec::new();
        let slots = [
            (&mut self.obstacle, difficulty.obstacle_interval, SpawnKind::Obstacle),
            (&mut self.collectible, difficulty.collectible_interval, SpawnKind::Collectible),
            (&mut self.fuel, difficulty.fuel_interval, SpawnKind::Fuel),
            (&mut self.power_up, difficulty.power_up_interval, SpawnKind::PowerUp),
        ];
        for (elapsed, interval, kind) in slots {
            *elapsed += dt;
            if *elapsed >= interval {
                *elapsed = 0.0;
                due.push(kind);
            }
        }
        due
    }
}

/// Random x in [0, viewport_width - width], y just above the viewport
fn spawn_pos(rng: &mut Pcg32, viewport_width: f32, size: Vec2) -> Vec2 {
    let span = (viewport_width - size.x).max(0.0);
    Vec2::new(rng.random::<f32>() * span, -size.y)
}

pub fn spawn_obstacle(rng: &mut Pcg32, viewport_width: f32, speed: f32) -> Obstacle {
    let kind = weighted_pick(&OBSTACLE_WEIGHTS, rng.random());
    let pos = spawn_pos(rng, viewport_width, kind.size());
    let wobble = rng.random::<f32>() * std::f32::consts::TAU;
    log::debug!("Spawned obstacle {:?} at x={:.0}", kind, pos.x);
    Obstacle::new(pos, kind, speed, wobble)
}

pub fn spawn_collectible(rng: &mut Pcg32, viewport_width: f32) -> Collectible {
    let kind = weighted_pick(&COLLECTIBLE_WEIGHTS, rng.random());
    let pos = spawn_pos(rng, viewport_width, Vec2::splat(COLLECTIBLE_SIZE));
    let speed = 100.0 + rng.random::<f32>() * 50.0;
    log::debug!("Spawned collectible {:?} at x={:.0}", kind, pos.x);
    Collectible::new(pos, kind, speed)
}

pub fn spawn_fuel(rng: &mut Pcg32, viewport_width: f32, amount: f32) -> FuelPickup {
    let pos = spawn_pos(rng, viewport_width, FUEL_PICKUP_SIZE);
    let speed = 120.0 + rng.random::<f32>() * 30.0;
    log::debug!("Spawned fuel pickup at x={:.0}", pos.x);
    FuelPickup::new(pos, amount, speed)
}

pub fn spawn_power_up(rng: &mut Pcg32, viewport_width: f32) -> PowerUp {
    let kind = weighted_pick(&POWER_UP_WEIGHTS, rng.random());
    let pos = spawn_pos(rng, viewport_width, Vec2::splat(POWER_UP_SIZE));
    let speed = 110.0 + rng.random::<f32>() * 40.0;
    log::debug!("Spawned power-up {:?} at x={:.0}", kind, pos.x);
    PowerUp::new(pos, kind, speed)
}
