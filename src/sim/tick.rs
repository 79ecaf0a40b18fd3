//! Per-frame simulation step
//!
//! Order inside a frame is fixed: state machine, player, spawning, entity
//! movement, collisions, particles, off-screen cleanup.

use glam::Vec2;

use super::entity::{Entity, midpoint};
use super::events::{ABSORB_FLASH, CRASH_FLASH, EndReason, GameEvent, SoundCue};
use super::particles::BurstTint;
use super::player::DamageOutcome;
use super::spawn::{
    SpawnKind, spawn_collectible, spawn_fuel, spawn_obstacle, spawn_power_up,
};
use super::world::World;
use crate::consts::*;

/// Input commands for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Steering intent: -1 left, 0 none, 1 right
    pub horizontal: i8,
}

impl TickInput {
    pub fn steer(horizontal: i8) -> Self {
        Self {
            horizontal: horizontal.clamp(-1, 1),
        }
    }
}

/// Advance the world by one frame. `dt` is clamped to `MAX_FRAME_DT`.
pub fn tick(world: &mut World, input: &TickInput, dt: f32) {
    let dt = if dt.is_finite() {
        dt.clamp(0.0, MAX_FRAME_DT)
    } else {
        0.0
    };

    world.state.update(dt, &mut world.events);

    // Effects keep animating on the end screens
    if !world.state.is_playing() {
        world.particles.update(dt);
        return;
    }

    world.road_offset += ROAD_SPEED * dt;
    if world.road_offset >= ROAD_WRAP {
        world.road_offset = 0.0;
    }

    world
        .player
        .steer(input.horizontal as f32, dt, world.viewport.x);
    if world.player.has_speed_boost() {
        let body = &world.player.body;
        let rear = Vec2::new(body.center().x, body.pos.y + body.height() - 5.0);
        world.particles.speed_trail(rear, body.width());
    }

    spawn_due(world, dt);
    move_entities(world, dt);
    resolve_collisions(world);
    world.particles.update(dt);
    cleanup(world);
}

fn spawn_due(world: &mut World, dt: f32) {
    let difficulty = world.state.difficulty;
    let width = world.viewport.x;
    for kind in world.spawn_timers.advance(dt, &difficulty) {
        match kind {
            SpawnKind::Obstacle => {
                let obstacle = spawn_obstacle(&mut world.rng, width, difficulty.obstacle_speed);
                world.obstacles.push(obstacle);
            }
            SpawnKind::Collectible => {
                let collectible = spawn_collectible(&mut world.rng, width);
                world.collectibles.push(collectible);
            }
            SpawnKind::Fuel => {
                let amount = world.state.tuning.fuel_pickup_amount();
                let fuel = spawn_fuel(&mut world.rng, width, amount);
                world.fuel_pickups.push(fuel);
            }
            SpawnKind::PowerUp => {
                let power_up = spawn_power_up(&mut world.rng, width);
                world.power_ups.push(power_up);
            }
        }
    }
}

fn move_entities(world: &mut World, dt: f32) {
    world.obstacles.iter_mut().for_each(|o| o.update(dt));
    world.collectibles.iter_mut().for_each(|c| c.update(dt));
    world.fuel_pickups.iter_mut().for_each(|f| f.update(dt));
    world.power_ups.iter_mut().for_each(|p| p.update(dt));

    if world.player.has_magnetic() {
        let target = world.player.center();
        for collectible in &mut world.collectibles {
            let to_player = target - collectible.center();
            let dist = to_player.length();
            if dist > 0.0 && dist <= MAGNETIC_RANGE {
                let step = (MAGNETIC_PULL_SPEED * dt).min(dist);
                collectible.body.pos += to_player / dist * step;
            }
        }
    }
}

/// Obstacles, then collectibles, then fuel, then power-ups. A crash ends the
/// run and skips the remaining categories for this frame.
fn resolve_collisions(world: &mut World) {
    if resolve_obstacle(world) {
        return;
    }

    let player = &world.player;
    let state = &mut world.state;
    let particles = &mut world.particles;
    let events = &mut world.events;

    world.collectibles.retain(|collectible| {
        if !player.collides_with(collectible) {
            return true;
        }
        let center = collectible.center();
        state.add_score(collectible.points);
        state.stats.items_collected += 1;
        particles.collect_burst(center);
        events.push(GameEvent::ScorePopup {
            pos: center,
            label: format!("+{}", collectible.points),
        });
        events.push(GameEvent::Sound(SoundCue::Success));
        false
    });

    world.fuel_pickups.retain(|fuel| {
        if !player.collides_with(fuel) {
            return true;
        }
        let center = fuel.center();
        let added = state.add_fuel(fuel.amount);
        log::debug!("Fuel restored: {added:.1}");
        particles.power_up_burst(center, BurstTint::Fuel);
        events.push(GameEvent::ScorePopup {
            pos: center,
            label: "+FUEL".to_string(),
        });
        events.push(GameEvent::Sound(SoundCue::Success));
        false
    });

    let durations = state.tuning.power_up_durations;
    let mut activated = Vec::new();
    world.power_ups.retain(|power_up| {
        if !player.collides_with(power_up) {
            return true;
        }
        let center = power_up.center();
        let duration = durations.get(power_up.kind);
        activated.push((power_up.kind, duration));
        particles.power_up_burst(center, BurstTint::PowerUp(power_up.kind));
        events.push(GameEvent::PowerUpActivated {
            kind: power_up.kind,
            duration,
        });
        events.push(GameEvent::ScorePopup {
            pos: center,
            label: format!("+{}", power_up.kind.label()),
        });
        events.push(GameEvent::Sound(SoundCue::Success));
        false
    });
    for (kind, duration) in activated {
        world.player.activate(kind, duration);
    }
}

/// Handle at most one obstacle hit, newest first; returns true if it ended the run
fn resolve_obstacle(world: &mut World) -> bool {
    let Some(index) = world
        .obstacles
        .iter()
        .rposition(|o| world.player.collides_with(o))
    else {
        return false;
    };

    let obstacle = world.obstacles.remove(index);
    let origin = midpoint(&world.player.body, &obstacle.body);

    match world.player.take_damage() {
        DamageOutcome::Taken => {
            world.particles.explosion(origin, 2);
            world.state.game_over(EndReason::Crashed, &mut world.events);
            world.events.push(GameEvent::ScreenFlash {
                color: CRASH_FLASH,
                duration_ms: 300,
            });
            true
        }
        DamageOutcome::ShieldAbsorbed | DamageOutcome::Ignored => {
            world.particles.explosion(origin, 1);
            world.events.push(GameEvent::ScreenFlash {
                color: ABSORB_FLASH,
                duration_ms: 200,
            });
            world.events.push(GameEvent::Sound(SoundCue::Hit));
            false
        }
    }
}

/// Drop entities that scrolled past the bottom; dodged obstacles count as avoided
fn cleanup(world: &mut World) {
    let height = world.viewport.y;
    let before = world.obstacles.len();
    world.obstacles.retain(|o| !o.is_off_screen(height));
    world.state.stats.obstacles_avoided += (before - world.obstacles.len()) as u32;

    world.collectibles.retain(|c| !c.is_off_screen(height));
    world.fuel_pickups.retain(|f| !f.is_off_screen(height));
    world.power_ups.retain(|p| !p.is_off_screen(height));
}
