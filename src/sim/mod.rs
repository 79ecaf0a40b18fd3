//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Time only advances through the clamped `dt` handed to `tick`
//! - Seeded RNG only (gameplay and particles draw from separate streams)
//! - Stable iteration order (entities resolve in spawn order)
//! - No rendering, audio or platform dependencies; side effects leave as events

pub mod entity;
pub mod events;
pub mod particles;
pub mod player;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use entity::{
    Body, Collectible, CollectibleKind, Entity, FuelPickup, Obstacle, ObstacleKind, PowerUp,
    PowerUpKind,
};
pub use events::{EndReason, GameEvent, Screen, SoundCue};
pub use particles::{BurstTint, Particle, ParticleKind, ParticleSystem};
pub use player::{DamageOutcome, Player, PowerUpTimers};
pub use spawn::{SpawnKind, SpawnTimers, weighted_pick};
pub use state::{Difficulty, GamePhase, GameState, RunStats};
pub use tick::{TickInput, tick};
pub use world::World;
