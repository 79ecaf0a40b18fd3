//! Game state machine
//!
//! Owns phase, score, fuel, level progress and difficulty. Transitions push
//! their side effects (audio cues, screens, high score) onto the caller's
//! event queue.

use serde::{Deserialize, Serialize};

use super::events::{EndReason, GameEvent, Screen, SoundCue};
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, idle
    Start,
    /// Active driving
    Playing,
    /// Run ended by a crash or an empty tank
    GameOver,
    /// Between levels, waiting for the player to continue
    LevelComplete,
    /// Final level cleared
    GameWon,
}

/// Spawn intervals (seconds) and obstacle speed for one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    pub obstacle_interval: f32,
    pub collectible_interval: f32,
    pub fuel_interval: f32,
    pub power_up_interval: f32,
    pub obstacle_speed: f32,
}

impl Difficulty {
    /// multiplier = 1 + (level - 1) * step; intervals shrink toward their floors,
    /// obstacle speed grows without a cap
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        let multiplier = 1.0 + level.saturating_sub(1) as f32 * tuning.difficulty_step;
        Self {
            obstacle_interval: tuning.obstacle.interval(multiplier),
            collectible_interval: tuning.collectible.interval(multiplier),
            fuel_interval: tuning.fuel.interval(multiplier),
            power_up_interval: tuning.power_up.interval(multiplier),
            obstacle_speed: tuning.base_obstacle_speed * multiplier,
        }
    }
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub items_collected: u32,
    pub obstacles_avoided: u32,
    /// Seconds spent in `Playing`
    pub play_time: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub fuel: f32,
    /// Seconds spent in the current level
    pub level_elapsed: f32,
    /// 0..=1
    pub level_progress: f32,
    pub difficulty: Difficulty,
    pub high_score: u64,
    pub is_new_high_score: bool,
    pub stats: RunStats,
    pub end_reason: Option<EndReason>,
    /// Bonus awarded by the most recent level completion
    pub last_bonus: u64,
    pub tuning: Tuning,
}

impl GameState {
    pub fn new(tuning: Tuning, high_score: u64) -> Self {
        let tuning = tuning.sanitized();
        Self {
            phase: GamePhase::Start,
            score: 0,
            level: 1,
            fuel: tuning.max_fuel,
            level_elapsed: 0.0,
            level_progress: 0.0,
            difficulty: Difficulty::for_level(1, &tuning),
            high_score,
            is_new_high_score: false,
            stats: RunStats::default(),
            end_reason: None,
            last_bonus: 0,
            tuning,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub fn max_fuel(&self) -> f32 {
        self.tuning.max_fuel
    }

    pub fn fuel_percentage(&self) -> f32 {
        self.fuel / self.tuning.max_fuel * 100.0
    }

    pub fn level_progress_percentage(&self) -> f32 {
        self.level_progress * 100.0
    }

    pub fn update_difficulty(&mut self) {
        self.difficulty = Difficulty::for_level(self.level, &self.tuning);
        log::debug!("Level {} difficulty: {:?}", self.level, self.difficulty);
    }

    /// Reset run counters for a fresh game
    fn reset_run(&mut self) {
        self.score = 0;
        self.level = 1;
        self.fuel = self.tuning.max_fuel;
        self.level_elapsed = 0.0;
        self.level_progress = 0.0;
        self.stats = RunStats::default();
        self.is_new_high_score = false;
        self.end_reason = None;
        self.last_bonus = 0;
        self.update_difficulty();
    }

    /// Begin a fresh run from the title or an end screen
    pub fn start_game(&mut self, events: &mut Vec<GameEvent>) {
        if matches!(self.phase, GamePhase::Playing | GamePhase::LevelComplete) {
            log::warn!("start_game ignored while {:?}", self.phase);
            return;
        }
        self.reset_run();
        self.phase = GamePhase::Playing;

        events.push(GameEvent::HideScreen(Screen::Start));
        events.push(GameEvent::HideScreen(Screen::GameOver));
        events.push(GameEvent::Sound(SoundCue::AmbientStart));
        events.push(GameEvent::LevelStarted { level: self.level });
        log::info!("Game started");
    }

    /// Per-frame fuel burn and level clock; idle outside `Playing`
    pub fn update(&mut self, dt: f32, events: &mut Vec<GameEvent>) {
        if self.phase != GamePhase::Playing {
            return;
        }

        self.fuel = (self.fuel - self.tuning.fuel_consumption_rate * dt).max(0.0);
        if self.fuel <= 0.0 {
            self.game_over(EndReason::OutOfFuel, events);
            return;
        }

        self.level_elapsed += dt;
        self.stats.play_time += dt;
        self.level_progress = (self.level_elapsed / self.tuning.level_duration).min(1.0);
        if self.level_progress >= 1.0 {
            self.complete_level(events);
        }
    }

    pub fn add_score(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }

    /// Add fuel up to the tank size; returns the amount actually added
    pub fn add_fuel(&mut self, amount: f32) -> f32 {
        let before = self.fuel;
        self.fuel = (self.fuel + amount.max(0.0)).min(self.tuning.max_fuel);
        self.fuel - before
    }

    /// Level clock ran out: bonus and pause, or win on the last level
    pub fn complete_level(&mut self, events: &mut Vec<GameEvent>) {
        if self.level >= self.tuning.max_level {
            self.game_won(events);
            return;
        }

        let remaining = self.tuning.level_duration - self.level_elapsed;
        let time_bonus = (remaining * self.tuning.time_bonus_per_second).floor();
        let fuel_bonus = (self.fuel * self.tuning.fuel_bonus_per_unit).floor();
        let bonus = (time_bonus + fuel_bonus).max(0.0) as u64;

        self.add_score(bonus);
        self.last_bonus = bonus;
        self.phase = GamePhase::LevelComplete;

        events.push(GameEvent::Sound(SoundCue::Success));
        events.push(GameEvent::LevelComplete {
            level: self.level,
            score: self.score,
            bonus,
        });
        events.push(GameEvent::ShowScreen(Screen::LevelComplete));
        log::info!("Level {} complete! Bonus: {}", self.level, bonus);
    }

    /// Continue from the level-complete screen
    pub fn next_level(&mut self, events: &mut Vec<GameEvent>) {
        if self.phase != GamePhase::LevelComplete {
            log::warn!("next_level ignored while {:?}", self.phase);
            return;
        }
        self.level += 1;
        self.level_elapsed = 0.0;
        self.level_progress = 0.0;
        self.fuel = (self.fuel + self.tuning.next_level_fuel).min(self.tuning.max_fuel);
        self.update_difficulty();
        self.phase = GamePhase::Playing;

        events.push(GameEvent::HideScreen(Screen::LevelComplete));
        events.push(GameEvent::LevelStarted { level: self.level });
        log::info!("Starting level {}", self.level);
    }

    pub fn game_over(&mut self, reason: EndReason, events: &mut Vec<GameEvent>) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.end_reason = Some(reason);

        events.push(GameEvent::Sound(SoundCue::AmbientStop));
        events.push(GameEvent::Sound(SoundCue::Hit));
        self.check_high_score(events);
        events.push(GameEvent::GameOver {
            reason,
            score: self.score,
            level: self.level,
            high_score: self.high_score,
            new_high_score: self.is_new_high_score,
        });
        events.push(GameEvent::ShowScreen(Screen::GameOver));
        log::info!("Game over: {}", reason.message());
    }

    fn game_won(&mut self, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::GameWon;
        self.add_score(self.tuning.completion_bonus);

        events.push(GameEvent::Sound(SoundCue::AmbientStop));
        events.push(GameEvent::Sound(SoundCue::Success));
        self.check_high_score(events);
        events.push(GameEvent::GameWon {
            score: self.score,
            high_score: self.high_score,
            new_high_score: self.is_new_high_score,
        });
        events.push(GameEvent::ShowScreen(Screen::GameOver));
        log::info!("Game won! All {} levels completed", self.tuning.max_level);
    }

    fn check_high_score(&mut self, events: &mut Vec<GameEvent>) {
        if self.score > self.high_score {
            self.high_score = self.score;
            self.is_new_high_score = true;
            events.push(GameEvent::HighScore(self.high_score));
            log::info!("New high score: {}", self.high_score);
        } else {
            self.is_new_high_score = false;
        }
    }

    /// Back to the title screen with all run counters cleared
    pub fn restart(&mut self, events: &mut Vec<GameEvent>) {
        self.reset_run();
        self.phase = GamePhase::Start;

        events.push(GameEvent::Sound(SoundCue::AmbientStop));
        events.push(GameEvent::HideScreen(Screen::GameOver));
        events.push(GameEvent::HideScreen(Screen::LevelComplete));
        events.push(GameEvent::ShowScreen(Screen::Start));
        log::info!("Game reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn playing() -> (GameState, Vec<GameEvent>) {
        let mut state = GameState::new(Tuning::default(), 0);
        let mut events = Vec::new();
        state.start_game(&mut events);
        (state, events)
    }

    #[test]
    fn test_start_game_resets_run() {
        let (state, events) = playing();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 1);
        assert_eq!(state.fuel, 100.0);
        assert_eq!(state.score, 0);
        assert!(events.contains(&GameEvent::Sound(SoundCue::AmbientStart)));
    }

    #[test]
    fn test_idle_phases_do_not_burn_fuel() {
        let mut state = GameState::new(Tuning::default(), 0);
        let mut events = Vec::new();
        state.update(1.0, &mut events);
        assert_eq!(state.fuel, 100.0);
        assert_eq!(state.level_elapsed, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_difficulty_curve() {
        let tuning = Tuning::default();
        let l1 = Difficulty::for_level(1, &tuning);
        assert_eq!(l1.obstacle_interval, 1.5);
        assert!((l1.collectible_interval - 3.75).abs() < 1e-5);
        assert!((l1.fuel_interval - 8.0 / 0.6).abs() < 1e-4);
        assert!((l1.power_up_interval - 12.0 / 0.7).abs() < 1e-4);
        assert_eq!(l1.obstacle_speed, 150.0);

        let l5 = Difficulty::for_level(5, &tuning);
        // multiplier 2.2
        assert!((l5.obstacle_interval - 1.5 / 2.2).abs() < 1e-5);
        assert!((l5.collectible_interval - 3.0 / (2.2 * 0.8)).abs() < 1e-4);
        assert!((l5.fuel_interval - 8.0 / (2.2 * 0.6)).abs() < 1e-4);
        assert!((l5.obstacle_speed - 330.0).abs() < 1e-3);

        let l20 = Difficulty::for_level(20, &tuning);
        assert_eq!(l20.obstacle_interval, 0.5);
        assert_eq!(l20.collectible_interval, 1.5);
        assert_eq!(l20.fuel_interval, 4.0);
        assert_eq!(l20.power_up_interval, 6.0);
    }

    #[test]
    fn test_add_fuel_returns_applied_delta() {
        let (mut state, _) = playing();
        state.fuel = 90.0;
        assert_eq!(state.add_fuel(25.0), 10.0);
        assert_eq!(state.fuel, 100.0);
        state.fuel = 40.0;
        assert_eq!(state.add_fuel(25.0), 25.0);
        assert_eq!(state.fuel, 65.0);
    }

    #[test]
    fn test_level_bonus() {
        let (mut state, _) = playing();
        state.score = 1000;
        state.level_elapsed = 25.0;
        state.fuel = 80.0;
        let mut events = Vec::new();
        state.complete_level(&mut events);
        assert_eq!(state.last_bonus, 450);
        assert_eq!(state.score, 1450);
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!(events.contains(&GameEvent::LevelComplete {
            level: 1,
            score: 1450,
            bonus: 450
        }));
    }

    #[test]
    fn test_level_clock_completes_level() {
        let tuning = Tuning {
            fuel_consumption_rate: 1.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, 0);
        let mut events = Vec::new();
        state.start_game(&mut events);
        let mut t = 0.0f32;
        while state.is_playing() && t < 40.0 {
            state.update(0.016, &mut events);
            t += 0.016;
        }
        assert_eq!(state.phase, GamePhase::LevelComplete);
        assert!((t - 30.0).abs() < 0.05);
        assert_eq!(state.level_progress, 1.0);
    }

    #[test]
    fn test_next_level_restores_fuel_and_difficulty() {
        let (mut state, _) = playing();
        state.level_elapsed = 30.0;
        state.fuel = 50.0;
        let mut events = Vec::new();
        state.complete_level(&mut events);
        state.next_level(&mut events);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.level, 2);
        assert_eq!(state.fuel, 80.0);
        assert_eq!(state.level_elapsed, 0.0);
        assert!((state.difficulty.obstacle_speed - 195.0).abs() < 1e-3);
    }

    #[test]
    fn test_final_level_wins() {
        let (mut state, _) = playing();
        state.level = 5;
        state.score = 200;
        let mut events = Vec::new();
        state.complete_level(&mut events);
        assert_eq!(state.phase, GamePhase::GameWon);
        assert_eq!(state.score, 5200);
        assert_eq!(state.high_score, 5200);
        assert!(state.is_new_high_score);
        assert!(events.contains(&GameEvent::HighScore(5200)));
        assert!(events.contains(&GameEvent::Sound(SoundCue::AmbientStop)));
    }

    #[test]
    fn test_out_of_fuel_at_twelve_and_a_half_seconds() {
        let (mut state, _) = playing();
        let mut events = Vec::new();
        let dt = 0.016;
        let mut t = 0.0f32;
        while state.is_playing() {
            state.update(dt, &mut events);
            t += dt;
            assert!(t < 13.0, "fuel never ran out");
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.end_reason, Some(EndReason::OutOfFuel));
        assert_eq!(state.fuel, 0.0);
        assert!(t >= 12.5 - dt && t <= 12.5 + dt, "ran out at {t}");
    }

    #[test]
    fn test_high_score_only_when_strictly_greater() {
        let mut state = GameState::new(Tuning::default(), 500);
        let mut events = Vec::new();
        state.start_game(&mut events);
        state.add_score(500);
        events.clear();
        state.game_over(EndReason::Crashed, &mut events);
        assert!(!state.is_new_high_score);
        assert_eq!(state.high_score, 500);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::HighScore(_))));
    }

    #[test]
    fn test_restart_is_idempotent() {
        let (mut state, _) = playing();
        state.add_score(1234);
        state.level = 3;
        state.fuel = 12.0;
        state.stats.items_collected = 9;
        let mut events = Vec::new();
        state.game_over(EndReason::Crashed, &mut events);

        state.restart(&mut events);
        let once = state.clone();
        state.restart(&mut events);
        assert_eq!(state, once);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.fuel, 100.0);
        assert_eq!(state.stats, RunStats::default());
        // High score survives the reset
        assert_eq!(state.high_score, 1234);
    }

    #[test]
    fn test_invalid_transitions_are_ignored() {
        let mut state = GameState::new(Tuning::default(), 0);
        let mut events = Vec::new();
        state.next_level(&mut events);
        assert_eq!(state.phase, GamePhase::Start);
        state.game_over(EndReason::Crashed, &mut events);
        assert_eq!(state.phase, GamePhase::Start);
        assert!(events.is_empty());
    }

    proptest! {
        #[test]
        fn prop_fuel_stays_in_range(
            start in 0.0f32..=100.0,
            ops in proptest::collection::vec((any::<bool>(), 0.0f32..60.0), 1..50),
        ) {
            let (mut state, _) = playing();
            state.fuel = start;
            let mut events = Vec::new();
            for (refuel, amount) in ops {
                if refuel {
                    let before = state.fuel;
                    let added = state.add_fuel(amount);
                    prop_assert!(added >= 0.0 && added <= amount + 1e-4);
                    prop_assert!((state.fuel - (before + added)).abs() < 1e-3);
                } else {
                    state.update(amount / 60.0, &mut events);
                }
                prop_assert!(state.fuel >= 0.0 && state.fuel <= state.max_fuel());
            }
        }
    }
}
