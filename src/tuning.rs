//! Data-driven game balance
//!
//! Defaults reproduce the shipped balance. A JSON override may set any
//! subset of fields; out-of-range values are clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::sim::PowerUpKind;

/// Spawn timing for one entity category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCurve {
    /// Seconds between spawns at level 1
    pub base_interval: f32,
    /// How strongly the difficulty multiplier shortens the interval
    pub damping: f32,
    /// Interval never drops below this
    pub min_interval: f32,
}

impl SpawnCurve {
    pub const fn new(base_interval: f32, damping: f32, min_interval: f32) -> Self {
        Self {
            base_interval,
            damping,
            min_interval,
        }
    }

    /// Interval for a given difficulty multiplier
    pub fn interval(&self, multiplier: f32) -> f32 {
        (self.base_interval / (multiplier * self.damping)).max(self.min_interval)
    }

    fn sanitized(self) -> Self {
        let min_interval = positive_or(self.min_interval, 0.1);
        Self {
            base_interval: positive_or(self.base_interval, min_interval),
            damping: positive_or(self.damping, 1.0),
            min_interval,
        }
    }
}

/// Timed ability durations in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUpDurations {
    pub speed: f32,
    pub shield: f32,
    pub invincibility: f32,
    pub magnetic: f32,
}

impl Default for PowerUpDurations {
    fn default() -> Self {
        Self {
            speed: 3.0,
            shield: 5.0,
            invincibility: 4.0,
            magnetic: 6.0,
        }
    }
}

impl PowerUpDurations {
    pub fn get(&self, kind: PowerUpKind) -> f32 {
        match kind {
            PowerUpKind::Speed => self.speed,
            PowerUpKind::Shield => self.shield,
            PowerUpKind::Invincibility => self.invincibility,
            PowerUpKind::Magnetic => self.magnetic,
        }
    }
}

/// Balance constants for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub max_level: u32,
    pub max_fuel: f32,
    /// Fuel burned per second while playing
    pub fuel_consumption_rate: f32,
    /// Seconds to survive to clear a level
    pub level_duration: f32,
    /// Awarded for clearing the final level
    pub completion_bonus: u64,
    /// Fuel handed back when the next level starts
    pub next_level_fuel: f32,
    /// Points per second left on the level clock
    pub time_bonus_per_second: f32,
    /// Points per unit of fuel left
    pub fuel_bonus_per_unit: f32,
    /// Added to the difficulty multiplier per level above 1
    pub difficulty_step: f32,
    pub base_obstacle_speed: f32,
    pub obstacle: SpawnCurve,
    pub collectible: SpawnCurve,
    pub fuel: SpawnCurve,
    pub power_up: SpawnCurve,
    pub power_up_durations: PowerUpDurations,
    /// Fraction of max fuel a pickup restores
    pub fuel_pickup_fraction: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_level: 5,
            max_fuel: 100.0,
            fuel_consumption_rate: 8.0,
            level_duration: 30.0,
            completion_bonus: 5000,
            next_level_fuel: 30.0,
            time_bonus_per_second: 10.0,
            fuel_bonus_per_unit: 5.0,
            difficulty_step: 0.3,
            base_obstacle_speed: 150.0,
            obstacle: SpawnCurve::new(1.5, 1.0, 0.5),
            collectible: SpawnCurve::new(3.0, 0.8, 1.5),
            fuel: SpawnCurve::new(8.0, 0.6, 4.0),
            power_up: SpawnCurve::new(12.0, 0.7, 6.0),
            power_up_durations: PowerUpDurations::default(),
            fuel_pickup_fraction: 0.25,
        }
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and sanitize it
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Clamp every value into a range the simulation can run with
    pub fn sanitized(self) -> Self {
        let defaults = Tuning::default();
        let durations = self.power_up_durations;
        Self {
            max_level: self.max_level.max(1),
            max_fuel: positive_or(self.max_fuel, defaults.max_fuel),
            fuel_consumption_rate: non_negative(self.fuel_consumption_rate),
            level_duration: positive_or(self.level_duration, defaults.level_duration),
            completion_bonus: self.completion_bonus,
            next_level_fuel: non_negative(self.next_level_fuel),
            time_bonus_per_second: non_negative(self.time_bonus_per_second),
            fuel_bonus_per_unit: non_negative(self.fuel_bonus_per_unit),
            difficulty_step: non_negative(self.difficulty_step),
            base_obstacle_speed: positive_or(self.base_obstacle_speed, defaults.base_obstacle_speed),
            obstacle: self.obstacle.sanitized(),
            collectible: self.collectible.sanitized(),
            fuel: self.fuel.sanitized(),
            power_up: self.power_up.sanitized(),
            power_up_durations: PowerUpDurations {
                speed: non_negative(durations.speed),
                shield: non_negative(durations.shield),
                invincibility: non_negative(durations.invincibility),
                magnetic: non_negative(durations.magnetic),
            },
            fuel_pickup_fraction: non_negative(self.fuel_pickup_fraction).min(1.0),
        }
    }

    /// Fuel restored by one pickup
    pub fn fuel_pickup_amount(&self) -> f32 {
        self.max_fuel * self.fuel_pickup_fraction
    }
}
