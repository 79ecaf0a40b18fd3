//! Entity drawing
//!
//! Read-only: every routine takes `&self` and only talks to the `Surface`.
//! Shapes are expressed in viewport units so any surface implementation can
//! present them.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::shapes::star_points;
use super::surface::Surface;
use super::vertex::colors::*;
use crate::consts::ROAD_WIDTH_FRACTION;
use crate::sim::{
    Collectible, CollectibleKind, FuelPickup, Obstacle, ObstacleKind, Particle, ParticleKind,
    Player, PowerUp, PowerUpKind, World,
};
use crate::with_alpha;

const MARKING_WIDTH: f32 = 4.0;
const MARKING_HEIGHT: f32 = 30.0;
const MARKING_GAP: f32 = 20.0;

pub trait Draw {
    fn draw(&self, surface: &mut dyn Surface);
}

/// Sky, grass verges, asphalt, scrolling centre line and road edges
pub fn draw_road(surface: &mut dyn Surface, road_offset: f32) {
    let size = surface.viewport();
    surface.fill_gradient_rect(Vec2::ZERO, size, SKY_TOP, SKY_BOTTOM);

    let road_width = size.x * ROAD_WIDTH_FRACTION;
    let road_x = (size.x - road_width) / 2.0;
    surface.fill_rect(Vec2::new(road_x, 0.0), Vec2::new(road_width, size.y), ROAD);

    let mut y = -MARKING_HEIGHT + road_offset;
    while y < size.y + MARKING_HEIGHT {
        surface.fill_rect(
            Vec2::new(size.x / 2.0 - MARKING_WIDTH / 2.0, y),
            Vec2::new(MARKING_WIDTH, MARKING_HEIGHT),
            ROAD_MARKING,
        );
        y += MARKING_HEIGHT + MARKING_GAP;
    }

    let edge = Vec2::new(4.0, size.y);
    surface.fill_rect(Vec2::new(road_x - 2.0, 0.0), edge, ROAD_EDGE);
    surface.fill_rect(Vec2::new(road_x + road_width - 2.0, 0.0), edge, ROAD_EDGE);

    surface.fill_rect(Vec2::ZERO, Vec2::new(road_x, size.y), GRASS);
    surface.fill_rect(
        Vec2::new(road_x + road_width, 0.0),
        Vec2::new(size.x - road_x - road_width, size.y),
        GRASS,
    );
}

/// Four wheels hanging off the sides of a car-shaped body
fn draw_wheels(surface: &mut dyn Surface, pos: Vec2, size: Vec2, wheel: Vec2, inset: f32) {
    let half = wheel.x / 2.0;
    for (dx, dy) in [
        (-half, inset),
        (size.x - half, inset),
        (-half, size.y - 25.0),
        (size.x - half, size.y - 25.0),
    ] {
        surface.fill_rect(pos + Vec2::new(dx, dy), wheel, WHEEL);
    }
}

impl Draw for Player {
    fn draw(&self, surface: &mut dyn Surface) {
        let pos = self.body.pos + Vec2::new(0.0, self.bounce_offset);
        let size = self.body.size();

        if self.has_shield() {
            surface.save();
            surface.set_alpha(surface.alpha() * 0.6);
            surface.stroke_circle(pos + size / 2.0, size.x / 2.0 + 10.0, 3.0, SHIELD_RING);
            surface.restore();
        }

        let body = if self.has_speed_boost() {
            PLAYER_BOOSTED
        } else {
            PLAYER
        };
        surface.fill_rect(pos, size, body);
        draw_wheels(surface, pos, size, Vec2::new(6.0, 15.0), 10.0);
        surface.fill_rect(
            pos + Vec2::new(5.0, 5.0),
            Vec2::new(size.x - 10.0, 15.0),
            WINDSHIELD,
        );

        if self.has_speed_boost() {
            surface.save();
            surface.set_alpha(surface.alpha() * 0.7);
            for i in 0..3 {
                let i = i as f32;
                surface.fill_rect(
                    pos + Vec2::new(5.0 + i * 10.0, size.y + 5.0 + i * 8.0),
                    Vec2::new(8.0, 20.0),
                    EXHAUST,
                );
            }
            surface.restore();
        }
    }
}

impl Draw for Obstacle {
    fn draw(&self, surface: &mut dyn Surface) {
        let pos = self.body.pos;
        let size = self.body.size();
        match self.kind {
            ObstacleKind::Cone => {
                let wobble = self.wobble.sin() * 2.0;
                surface.fill_path(
                    &[
                        pos + Vec2::new(size.x / 2.0, wobble),
                        pos + Vec2::new(0.0, size.y),
                        pos + size,
                    ],
                    CONE,
                );
                for offset in [20.0, 10.0] {
                    surface.fill_rect(
                        pos + Vec2::new(3.0, size.y - offset),
                        Vec2::new(size.x - 6.0, 4.0),
                        CONE_STRIPE,
                    );
                }
            }
            ObstacleKind::Car => {
                surface.fill_rect(pos, size, CAR);
                draw_wheels(surface, pos, size, Vec2::new(6.0, 15.0), 10.0);
                // Rear window, the car faces away from the player
                surface.fill_rect(
                    pos + Vec2::new(5.0, size.y - 20.0),
                    Vec2::new(size.x - 10.0, 15.0),
                    WINDSHIELD,
                );
            }
            ObstacleKind::Truck => {
                surface.fill_rect(pos, size, TRUCK);
                surface.fill_rect(
                    pos + Vec2::new(5.0, size.y - 30.0),
                    Vec2::new(size.x - 10.0, 25.0),
                    TRUCK_CAB,
                );
                draw_wheels(surface, pos, size, Vec2::new(8.0, 20.0), 15.0);
            }
        }
    }
}

impl Draw for Collectible {
    fn draw(&self, surface: &mut dyn Surface) {
        let radius = self.body.width() / 2.0;
        surface.save();
        surface.translate(self.body.center());
        surface.rotate(self.spin);
        surface.scale(Vec2::splat(self.pulse_scale()));

        match self.kind {
            CollectibleKind::Star => {
                let star = star_points(5, radius, radius * 0.5);
                surface.fill_path(&star, GOLD);
                surface.stroke_path(&star, true, 2.0, AMBER);
            }
            CollectibleKind::Coin => {
                surface.fill_circle(Vec2::ZERO, radius, AMBER);
                surface.stroke_circle(Vec2::ZERO, radius, 2.0, COIN_RIM);
                surface.fill_circle(Vec2::ZERO, self.body.width() / 3.0, GOLD);
            }
        }
        surface.restore();
    }
}

impl Draw for FuelPickup {
    fn draw(&self, surface: &mut dyn Surface) {
        let pos = self.body.pos;
        let size = self.body.size();
        let center = self.body.center();

        surface.save();
        surface.set_alpha(surface.alpha() * self.glow * 0.3);
        surface.fill_circle(center, size.x / 2.0 + 10.0, FUEL_GLOW);
        surface.restore();

        surface.fill_rect(pos + Vec2::splat(5.0), size - Vec2::splat(10.0), FUEL_BODY);
        surface.fill_rect(
            pos + Vec2::new(8.0, 0.0),
            Vec2::new(size.x - 16.0, 8.0),
            FUEL_CAP,
        );

        // "F" glyph
        let glyph = center + Vec2::new(-4.0, -6.0);
        surface.fill_rect(glyph, Vec2::new(3.0, 13.0), FUEL_GLOW);
        surface.fill_rect(glyph, Vec2::new(9.0, 3.0), FUEL_GLOW);
        surface.fill_rect(glyph + Vec2::new(0.0, 5.0), Vec2::new(7.0, 3.0), FUEL_GLOW);
    }
}

const BOLT_OUTLINE: [Vec2; 7] = [
    Vec2::new(-8.0, -12.0),
    Vec2::new(2.0, -12.0),
    Vec2::new(-2.0, -2.0),
    Vec2::new(8.0, -2.0),
    Vec2::new(-2.0, 12.0),
    Vec2::new(2.0, 2.0),
    Vec2::new(-8.0, 2.0),
];

const SHIELD_OUTLINE: [Vec2; 6] = [
    Vec2::new(0.0, -15.0),
    Vec2::new(12.0, -8.0),
    Vec2::new(12.0, 8.0),
    Vec2::new(0.0, 15.0),
    Vec2::new(-12.0, 8.0),
    Vec2::new(-12.0, -8.0),
];

const SHIELD_EMBLEM: [Vec2; 6] = [
    Vec2::new(0.0, -8.0),
    Vec2::new(6.0, -2.0),
    Vec2::new(6.0, 6.0),
    Vec2::new(0.0, 10.0),
    Vec2::new(-6.0, 6.0),
    Vec2::new(-6.0, -2.0),
];

const MAGNET_OUTLINE: [Vec2; 14] = [
    Vec2::new(-10.0, -12.0),
    Vec2::new(-10.0, 8.0),
    Vec2::new(-6.0, 12.0),
    Vec2::new(-2.0, 12.0),
    Vec2::new(-2.0, -8.0),
    Vec2::new(2.0, -8.0),
    Vec2::new(2.0, 12.0),
    Vec2::new(6.0, 12.0),
    Vec2::new(10.0, 8.0),
    Vec2::new(10.0, -12.0),
    Vec2::new(6.0, -12.0),
    Vec2::new(6.0, -8.0),
    Vec2::new(-6.0, -8.0),
    Vec2::new(-6.0, -12.0),
];

impl Draw for PowerUp {
    fn draw(&self, surface: &mut dyn Surface) {
        surface.save();
        surface.translate(self.body.center() + Vec2::new(0.0, self.float_offset()));
        surface.rotate(self.spin);

        match self.kind {
            PowerUpKind::Speed => {
                surface.fill_path(&BOLT_OUTLINE, BOLT);
                surface.stroke_path(&BOLT_OUTLINE, true, 2.0, AMBER);
            }
            PowerUpKind::Shield => {
                surface.fill_path(&SHIELD_OUTLINE, SHIELD);
                surface.stroke_path(&SHIELD_OUTLINE, true, 2.0, SHIELD_RIM);
                surface.fill_path(&SHIELD_EMBLEM, WHITE);
            }
            PowerUpKind::Invincibility => {
                let star = star_points(8, 15.0, 8.0);
                surface.fill_path(&star, GOLD);
                surface.stroke_path(&star, true, 2.0, INVINCIBLE_RIM);
                surface.fill_circle(Vec2::ZERO, 5.0, INVINCIBLE_CORE);
            }
            PowerUpKind::Magnetic => {
                surface.fill_path(&MAGNET_OUTLINE, MAGNET);
                surface.stroke_path(&MAGNET_OUTLINE, true, 2.0, MAGNET_RIM);
                for i in 0..3 {
                    let radius = 15.0 + i as f32 * 3.0;
                    for x in [-6.0, 6.0] {
                        surface.stroke_arc(
                            Vec2::new(x, 0.0),
                            radius,
                            -PI * 0.6,
                            -PI * 0.4,
                            1.0,
                            FIELD_LINE,
                        );
                    }
                }
            }
        }
        surface.restore();
    }
}

impl Draw for Particle {
    fn draw(&self, surface: &mut dyn Surface) {
        if self.size <= 0.0 {
            return;
        }
        surface.save();
        let alpha = surface.alpha() * self.alpha();
        surface.set_alpha(alpha);
        surface.fill_circle(self.pos, self.size, self.color);

        match self.kind {
            ParticleKind::Explosion => {
                surface.fill_circle(self.pos, self.size * 0.5, with_alpha(WHITE, 0.5));
            }
            ParticleKind::PowerUp { sparkle, .. } => {
                let length = self.size * 1.5;
                for i in 0..4 {
                    let angle = sparkle + i as f32 * FRAC_PI_2;
                    let dir = Vec2::from_angle(angle);
                    surface.stroke_line(
                        self.pos + dir * length * 0.5,
                        self.pos + dir * length,
                        1.0,
                        WHITE,
                    );
                }
            }
            ParticleKind::Collect => {
                surface.stroke_circle(self.pos, self.size, 1.0, AMBER);
                let (x, y) = (Vec2::X * self.size, Vec2::Y * self.size);
                surface.stroke_line(self.pos - x, self.pos + x, 0.5, WHITE);
                surface.stroke_line(self.pos - y, self.pos + y, 0.5, WHITE);
            }
            ParticleKind::Spark => {}
        }
        surface.restore();
    }
}

/// Draw one frame. Gameplay entities are only shown while playing; particles
/// always render so crash effects finish on the end screens.
pub fn draw_scene(world: &World, surface: &mut dyn Surface) {
    draw_road(surface, world.road_offset);

    if world.state.is_playing() {
        world.player.draw(surface);
        for obstacle in &world.obstacles {
            obstacle.draw(surface);
        }
        for collectible in &world.collectibles {
            collectible.draw(surface);
        }
        for fuel in &world.fuel_pickups {
            fuel.draw(surface);
        }
        for power_up in &world.power_ups {
            power_up.draw(surface);
        }
    }

    for particle in world.particles.particles() {
        particle.draw(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuning;
    use crate::renderer::ShapeBatch;
    use crate::sim::{ParticleSystem, TickInput, tick};

    fn viewport() -> Vec2 {
        Vec2::new(800.0, 600.0)
    }

    #[test]
    fn test_road_fills_viewport() {
        let mut batch = ShapeBatch::new(viewport());
        draw_road(&mut batch, 0.0);
        let v = batch.vertices();
        assert!(!v.is_empty());
        // Sky gradient covers the whole viewport first
        assert_eq!(v[0].position, [0.0, 0.0]);
        assert_eq!(v[2].position, [800.0, 600.0]);
        assert_eq!(v[0].color, SKY_TOP);
        assert_eq!(v[2].color, SKY_BOTTOM);
    }

    #[test]
    fn test_road_markings_scroll() {
        let count = |offset: f32| {
            let mut batch = ShapeBatch::new(viewport());
            draw_road(&mut batch, offset);
            batch
                .vertices()
                .iter()
                .filter(|v| v.color == ROAD_MARKING)
                .map(|v| v.position[1])
                .fold(f32::INFINITY, f32::min)
        };
        assert_eq!(count(0.0), -30.0);
        assert_eq!(count(25.0), -5.0);
    }

    #[test]
    fn test_draw_leaves_surface_balanced() {
        let mut world = World::new(5, viewport(), Tuning::default(), 0, 500);
        world.start_game();
        world.player.activate(PowerUpKind::Shield, 5.0);
        world.player.activate(PowerUpKind::Speed, 3.0);
        for kind in PowerUpKind::ALL {
            world
                .power_ups
                .push(PowerUp::new(Vec2::new(100.0, 100.0), kind, 120.0));
        }
        world.collectibles.push(Collectible::new(
            Vec2::new(200.0, 100.0),
            CollectibleKind::Star,
            100.0,
        ));
        world.collectibles.push(Collectible::new(
            Vec2::new(250.0, 100.0),
            CollectibleKind::Coin,
            100.0,
        ));
        for (i, kind) in [ObstacleKind::Cone, ObstacleKind::Car, ObstacleKind::Truck]
            .into_iter()
            .enumerate()
        {
            world.obstacles.push(Obstacle::new(
                Vec2::new(100.0 + i as f32 * 60.0, 200.0),
                kind,
                150.0,
                0.0,
            ));
        }
        world
            .fuel_pickups
            .push(FuelPickup::new(Vec2::new(400.0, 100.0), 25.0, 120.0));
        world.particles.explosion(Vec2::new(300.0, 300.0), 2);
        tick(&mut world, &TickInput::default(), 0.016);

        let mut batch = ShapeBatch::new(viewport());
        draw_scene(&world, &mut batch);
        assert_eq!(batch.alpha(), 1.0);
        assert_eq!(batch.transform(), glam::Affine2::IDENTITY);
        assert!(batch.vertices().iter().all(|v| v.color[3] <= 1.0));
    }

    #[test]
    fn test_entities_hidden_off_play() {
        let mut world = World::new(5, viewport(), Tuning::default(), 0, 500);
        let mut idle = ShapeBatch::new(viewport());
        draw_scene(&world, &mut idle);

        world.start_game();
        let mut playing = ShapeBatch::new(viewport());
        draw_scene(&world, &mut playing);
        assert!(playing.vertices().len() > idle.vertices().len());
    }

    #[test]
    fn test_dead_particles_draw_nothing() {
        let mut ps = ParticleSystem::new(1, 10);
        ps.collect_burst(Vec2::ZERO);
        let mut particle = ps.particles()[0].clone();
        particle.size = 0.0;
        let mut batch = ShapeBatch::new(viewport());
        particle.draw(&mut batch);
        assert!(batch.vertices().is_empty());
    }
}
