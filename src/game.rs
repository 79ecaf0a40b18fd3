//! Frame driver
//!
//! `Game` owns the simulation world and its injected collaborators. Each
//! `frame` call runs clock → tick → event routing → HUD, in that order.
//! Page-level happenings (keys, focus, visibility, buttons) come in through
//! the remaining methods.

use glam::Vec2;

use crate::audio::AudioSink;
use crate::persistence::HighScoreStore;
use crate::platform::{FrameClock, KeyAction, KeyState, action_for};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, TickInput, World, tick};
use crate::tuning::Tuning;
use crate::ui::{HudSnapshot, Presenter};

/// Side-effect collaborators handed to the driver
pub struct Services {
    pub audio: Box<dyn AudioSink>,
    pub presenter: Box<dyn Presenter>,
    pub store: Box<dyn HighScoreStore>,
}

pub struct Game {
    world: World,
    audio: Box<dyn AudioSink>,
    presenter: Box<dyn Presenter>,
    store: Box<dyn HighScoreStore>,
    settings: Settings,
    clock: FrameClock,
    keys: KeyState,
    visible: bool,
    /// Set once the first user gesture has unlocked audio
    audio_unlocked: bool,
}

impl Game {
    pub fn new(
        seed: u64,
        viewport: Vec2,
        tuning: Tuning,
        settings: Settings,
        services: Services,
    ) -> Self {
        let Services {
            mut audio,
            presenter,
            store,
        } = services;
        let settings = settings.sanitized();
        *audio.volume_mut() = settings.volume();

        let high_score = store.load_high_score();
        log::info!("Loaded high score: {high_score}");
        let world = World::new(seed, viewport, tuning, high_score, settings.max_particles());

        let mut game = Self {
            world,
            audio,
            presenter,
            store,
            settings,
            clock: FrameClock::default(),
            keys: KeyState::default(),
            visible: true,
            audio_unlocked: false,
        };
        game.refresh_hud();
        game
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for tools and scripted scenarios
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    pub fn phase(&self) -> GamePhase {
        self.world.state.phase
    }

    pub fn is_muted(&self) -> bool {
        self.audio.volume().is_muted()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn hud(&self) -> HudSnapshot {
        HudSnapshot::from_world(&self.world, self.is_muted())
    }

    /// One animation frame; `now_ms` is the `requestAnimationFrame` timestamp
    pub fn frame(&mut self, now_ms: f64) {
        let dt = self.clock.tick(now_ms);
        self.step(dt);
    }

    /// Advance by an explicit `dt` (headless runs and tests)
    pub fn step(&mut self, dt: f32) {
        let input = TickInput::steer(self.keys.horizontal());
        tick(&mut self.world, &input, dt);
        self.dispatch_events();
        self.refresh_hud();
    }

    fn refresh_hud(&mut self) {
        let hud = self.hud();
        self.presenter.update_hud(&hud);
    }

    /// Route everything the simulation queued to its collaborator
    fn dispatch_events(&mut self) {
        for event in self.world.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio.play(cue),
                GameEvent::HighScore(score) => {
                    self.store.save_high_score(score);
                    self.presenter.notify(&event);
                }
                GameEvent::ScreenFlash { .. } if !self.settings.effective_screen_flash() => {}
                _ => self.presenter.notify(&event),
            }
        }
    }

    /// Start button
    pub fn start_game(&mut self) {
        self.world.start_game();
        self.dispatch_events();
        self.refresh_hud();
    }

    /// Next-level button
    pub fn next_level(&mut self) {
        self.world.next_level();
        self.dispatch_events();
        self.refresh_hud();
    }

    /// Back to the title screen
    pub fn restart(&mut self) {
        self.world.restart();
        self.dispatch_events();
        self.refresh_hud();
    }

    /// Space bar: whatever the visible screen's button does.
    /// Returns false while driving, where it has no meaning.
    pub fn primary_action(&mut self) -> bool {
        match self.phase() {
            GamePhase::Start | GamePhase::GameOver | GamePhase::GameWon => self.start_game(),
            GamePhase::LevelComplete => self.next_level(),
            GamePhase::Playing => return false,
        }
        true
    }

    /// Returns true when the key is ours and the page default should be suppressed
    pub fn key_down(&mut self, code: &str) -> bool {
        match action_for(code) {
            Some(KeyAction::Hold(_)) => self.keys.handle_key(code, true),
            Some(KeyAction::Confirm) => {
                self.user_gesture();
                self.primary_action();
                true
            }
            Some(KeyAction::ToggleMute) => {
                self.toggle_mute();
                false
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, code: &str) -> bool {
        self.keys.handle_key(code, false)
    }

    /// Window blur: release every held key
    pub fn focus_lost(&mut self) {
        self.keys.reset();
    }

    /// First click or key press; browsers keep audio suspended until then
    pub fn user_gesture(&mut self) {
        if !self.audio_unlocked {
            self.audio_unlocked = true;
            self.audio.resume();
            log::debug!("Audio unlocked");
        }
    }

    /// Flip mute, restarting the ambient loop when unmuting mid-run
    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.audio.toggle_mute();
        if !muted && self.visible && self.world.state.is_playing() {
            self.audio.play_ambient_loop();
        }
        self.settings.set_volume(self.audio.volume());
        self.settings.save();
        self.refresh_hud();
        muted
    }

    /// Page visibility change
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible == visible {
            return;
        }
        self.visible = visible;
        if visible {
            self.clock.reset();
            if self.world.state.is_playing() && !self.is_muted() {
                self.audio.play_ambient_loop();
            }
        } else {
            self.audio.stop_ambient_loop();
        }
        log::debug!("Page {}", if visible { "visible" } else { "hidden" });
    }

    pub fn resize(&mut self, viewport: Vec2) {
        self.world.resize(viewport);
    }

    /// Apply new preferences and persist them
    pub fn apply_settings(&mut self, settings: Settings) {
        let settings = settings.sanitized();
        let was_muted = self.is_muted();
        self.audio.set_music_volume(settings.music_volume);
        self.audio.set_effect_volume(settings.effect_volume);
        if settings.muted != was_muted {
            self.toggle_mute();
        }
        self.world.particles.set_max_particles(settings.max_particles());
        self.settings = settings;
        self.settings.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::persistence::MemoryStore;
    use crate::ui::LogPresenter;

    fn game(high_score: u64) -> Game {
        Game::new(
            11,
            Vec2::new(800.0, 600.0),
            Tuning::default(),
            Settings::default(),
            Services {
                audio: Box::new(NullAudio::default()),
                presenter: Box::new(LogPresenter::default()),
                store: Box::new(MemoryStore::with_score(high_score)),
            },
        )
    }

    #[test]
    fn test_loads_high_score() {
        let g = game(4200);
        assert_eq!(g.world().state.high_score, 4200);
        assert_eq!(g.phase(), GamePhase::Start);
    }

    #[test]
    fn test_primary_action_follows_screen() {
        let mut g = game(0);
        assert!(g.primary_action());
        assert_eq!(g.phase(), GamePhase::Playing);
        assert!(!g.primary_action());

        g.world.state.level_elapsed = g.world.state.tuning.level_duration;
        g.step(0.0);
        assert_eq!(g.phase(), GamePhase::LevelComplete);
        assert!(g.primary_action());
        assert_eq!(g.phase(), GamePhase::Playing);
        assert_eq!(g.world().state.level, 2);
    }

    #[test]
    fn test_keys_steer_the_car() {
        let mut g = game(0);
        g.start_game();
        let x0 = g.world().player.body.pos.x;
        assert!(g.key_down("ArrowRight"));
        for _ in 0..10 {
            g.step(0.016);
        }
        assert!(g.world().player.body.pos.x > x0);

        g.focus_lost();
        assert_eq!(g.keys().horizontal(), 0);
        assert!(!g.key_up("KeyQ"));
    }

    #[test]
    fn test_space_starts_and_m_mutes() {
        let mut g = game(0);
        assert!(g.key_down("Space"));
        assert_eq!(g.phase(), GamePhase::Playing);
        assert!(!g.key_down("KeyM"));
        assert!(g.is_muted());
        assert!(g.settings().muted);
    }

    #[test]
    fn test_apply_settings_caps_particles() {
        let mut g = game(0);
        g.apply_settings(Settings {
            particles: false,
            ..Settings::default()
        });
        assert_eq!(g.world().particles.max_particles(), 0);
    }
}
