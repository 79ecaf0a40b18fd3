//! Simulation context
//!
//! One `World` holds everything a frame touches: the state machine, the
//! player, every entity collection, the particle pool, the gameplay RNG and
//! the outgoing event queue. Renderers read it; only `tick` and the
//! transition methods below mutate it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Collectible, FuelPickup, Obstacle, PowerUp};
use super::events::GameEvent;
use super::particles::ParticleSystem;
use super::player::Player;
use super::spawn::SpawnTimers;
use super::state::{GamePhase, GameState};
use crate::tuning::Tuning;

/// Offset mixed into the seed so particles draw from an independent stream
const PARTICLE_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub state: GameState,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub fuel_pickups: Vec<FuelPickup>,
    pub power_ups: Vec<PowerUp>,
    pub particles: ParticleSystem,
    pub spawn_timers: SpawnTimers,
    /// Road marking scroll, wraps at `ROAD_WRAP`
    pub road_offset: f32,
    pub viewport: Vec2,
    pub(super) rng: Pcg32,
    pub(super) events: Vec<GameEvent>,
}

impl World {
    pub fn new(
        seed: u64,
        viewport: Vec2,
        tuning: Tuning,
        high_score: u64,
        max_particles: usize,
    ) -> Self {
        Self {
            seed,
            state: GameState::new(tuning, high_score),
            player: Player::new(viewport),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            fuel_pickups: Vec::new(),
            power_ups: Vec::new(),
            particles: ParticleSystem::new(seed ^ PARTICLE_SEED_SALT, max_particles),
            spawn_timers: SpawnTimers::default(),
            road_offset: 0.0,
            viewport,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every gameplay entity and put the car back at its start position
    fn reset_entities(&mut self) {
        self.obstacles.clear();
        self.collectibles.clear();
        self.fuel_pickups.clear();
        self.power_ups.clear();
        self.player = Player::new(self.viewport);
        self.spawn_timers = SpawnTimers::default();
        self.road_offset = 0.0;
    }

    /// Fresh run from the title or an end screen
    pub fn start_game(&mut self) {
        if matches!(
            self.state.phase,
            GamePhase::Start | GamePhase::GameOver | GamePhase::GameWon
        ) {
            self.reset_entities();
        }
        self.state.start_game(&mut self.events);
    }

    /// Continue after a level-complete screen; entities already on the road stay
    pub fn next_level(&mut self) {
        self.state.next_level(&mut self.events);
    }

    /// Back to the title screen
    pub fn restart(&mut self) {
        self.reset_entities();
        self.state.restart(&mut self.events);
    }

    /// Viewport changed; keep the car centred and on the road
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
        let body = &mut self.player.body;
        body.pos.x = viewport.x / 2.0 - body.width() / 2.0;
        body.pos.y = viewport.y - crate::consts::PLAYER_BOTTOM_OFFSET;
    }
}
