//! HUD and overlay presentation
//!
//! The driver hands the presenter a `HudSnapshot` every frame and forwards
//! the simulation's display events (screens, popups, flashes). The DOM
//! presenter mirrors them onto the page; the log presenter is the native
//! stand-in.

use serde::Serialize;

use crate::Color;
use crate::sim::{GameEvent, GamePhase, PowerUpKind, RunStats, World};

/// A timed ability with time left on its clock
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    /// Seconds remaining
    pub remaining: f32,
}

/// Everything the HUD shows, copied out of the world once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub level: u32,
    pub high_score: u64,
    pub fuel_percent: f32,
    pub progress_percent: f32,
    pub power_ups: Vec<ActivePowerUp>,
    pub particle_count: usize,
    pub stats: RunStats,
    pub muted: bool,
}

impl HudSnapshot {
    pub fn from_world(world: &World, muted: bool) -> Self {
        let state = &world.state;
        let power_ups = PowerUpKind::ALL
            .into_iter()
            .filter_map(|kind| {
                let remaining = world.player.timers.get(kind);
                (remaining > 0.0).then_some(ActivePowerUp { kind, remaining })
            })
            .collect();

        Self {
            phase: state.phase,
            score: state.score,
            level: state.level,
            high_score: state.high_score,
            fuel_percent: state.fuel_percentage(),
            progress_percent: state.level_progress_percentage(),
            power_ups,
            particle_count: world.particles.len(),
            stats: state.stats,
            muted,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.power_ups.iter().any(|p| p.kind == kind)
    }
}

/// Fuel gauge fill: green above 60%, orange above 30%, red below
pub fn fuel_bar_color(percent: f32) -> &'static str {
    if percent > 60.0 {
        "linear-gradient(90deg, #44ff44 0%, #88ff44 100%)"
    } else if percent > 30.0 {
        "linear-gradient(90deg, #ffaa00 0%, #ffcc44 100%)"
    } else {
        "linear-gradient(90deg, #ff4444 0%, #ff6666 100%)"
    }
}

/// Element id of a power-up's HUD badge
pub fn indicator_id(kind: PowerUpKind) -> &'static str {
    match kind {
        PowerUpKind::Speed => "speedBoostIndicator",
        PowerUpKind::Shield => "shieldIndicator",
        PowerUpKind::Invincibility => "invincibilityIndicator",
        PowerUpKind::Magnetic => "magneticIndicator",
    }
}

/// Heading for the end-of-run screen
pub fn end_title(won: bool, new_high_score: bool) -> &'static str {
    if new_high_score {
        "🎉 New High Score! 🎉"
    } else if won {
        "Congratulations! You completed all levels!"
    } else {
        "Game Over!"
    }
}

/// CSS `rgba()` for a flash overlay
pub fn css_rgba(color: Color) -> String {
    let [r, g, b, a] = color;
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgba({}, {}, {}, {})", channel(r), channel(g), channel(b), a)
}

/// UI collaborator
pub trait Presenter {
    fn update_hud(&mut self, hud: &HudSnapshot);
    fn notify(&mut self, event: &GameEvent);
}

/// Native presenter: lifecycle events go to the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    last: Option<HudSnapshot>,
}

impl LogPresenter {
    pub fn last_hud(&self) -> Option<&HudSnapshot> {
        self.last.as_ref()
    }
}

impl Presenter for LogPresenter {
    fn update_hud(&mut self, hud: &HudSnapshot) {
        if self.last.as_ref().is_none_or(|last| last.level != hud.level) {
            log::debug!("HUD level {} score {}", hud.level, hud.score);
        }
        self.last = Some(hud.clone());
    }

    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::LevelComplete { level, score, bonus } => {
                log::info!("Level {level} cleared: {score} (+{bonus})");
            }
            GameEvent::GameOver {
                reason,
                score,
                level,
                high_score,
                new_high_score,
            } => {
                log::info!(
                    "{} {} - score {score}, level {level}, best {high_score}",
                    end_title(false, *new_high_score),
                    reason.message()
                );
            }
            GameEvent::GameWon {
                score,
                high_score,
                new_high_score,
            } => {
                log::info!(
                    "{} - score {score}, best {high_score}",
                    end_title(true, *new_high_score)
                );
            }
            GameEvent::PowerUpActivated { kind, duration } => {
                log::debug!("{} for {duration}s", kind.label());
            }
            _ => {}
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::DomPresenter;

#[cfg(target_arch = "wasm32")]
mod dom {
    use web_sys::{Document, Element};

    use super::*;
    use crate::sim::Screen;

    const EFFECTS_STYLE_ID: &str = "roadRushEffects";
    const EFFECTS_CSS: &str = "
        @keyframes scorePopup {
            0% { opacity: 1; transform: translateY(0); }
            100% { opacity: 0; transform: translateY(-50px); }
        }
        @keyframes flashEffect {
            0% { opacity: 1; }
            100% { opacity: 0; }
        }
        @keyframes pulse {
            0%, 100% { transform: scale(1); opacity: 1; }
            50% { transform: scale(1.1); opacity: 0.8; }
        }
    ";
    const POPUP_MS: f64 = 1000.0;

    fn screen_id(screen: Screen) -> &'static str {
        match screen {
            Screen::Start => "startScreen",
            Screen::LevelComplete => "levelCompleteScreen",
            Screen::GameOver => "gameOverScreen",
        }
    }

    /// Presenter over the game page's HUD and overlay elements
    pub struct DomPresenter {
        document: Document,
        /// Popups and flashes with their removal time
        transient: Vec<(Element, f64)>,
        level: u32,
    }

    impl DomPresenter {
        pub fn new() -> Option<Self> {
            let document = web_sys::window()?.document()?;
            if document.get_element_by_id(EFFECTS_STYLE_ID).is_none() {
                let style = document.create_element("style").ok()?;
                style.set_id(EFFECTS_STYLE_ID);
                style.set_text_content(Some(EFFECTS_CSS));
                document.body()?.append_child(&style).ok()?;
            }
            Some(Self {
                document,
                transient: Vec::new(),
                level: 1,
            })
        }

        fn set_text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if hidden {
                    classes.add_1("hidden")
                } else {
                    classes.remove_1("hidden")
                };
            }
        }

        /// Append a short-lived element to the page
        fn spawn_overlay(&mut self, style: &str, text: Option<&str>, lifetime_ms: f64) {
            let Some(body) = self.document.body() else {
                return;
            };
            let Ok(el) = self.document.create_element("div") else {
                return;
            };
            let _ = el.set_attribute("style", style);
            if let Some(text) = text {
                el.set_class_name("score-popup");
                el.set_text_content(Some(text));
            }
            if body.append_child(&el).is_ok() {
                self.transient.push((el, js_sys::Date::now() + lifetime_ms));
            }
        }

        fn expire_overlays(&mut self) {
            let now = js_sys::Date::now();
            self.transient.retain(|(el, until)| {
                let keep = *until > now;
                if !keep {
                    el.remove();
                }
                keep
            });
        }

        /// Page offset of the canvas so popups land over the entity
        fn canvas_origin(&self) -> (f64, f64) {
            let window = web_sys::window();
            let scroll = window.as_ref().map_or((0.0, 0.0), |w| {
                (w.scroll_x().unwrap_or(0.0), w.scroll_y().unwrap_or(0.0))
            });
            self.document
                .get_element_by_id("gameCanvas")
                .map(|canvas| {
                    let rect = canvas.get_bounding_client_rect();
                    (rect.left() + scroll.0, rect.top() + scroll.1)
                })
                .unwrap_or(scroll)
        }

        fn show_end_screen(&self, won: bool, score: u64, high_score: u64, new_high_score: bool) {
            self.set_text("#finalScore span", &score.to_string());
            self.set_text("#finalLevel span", &self.level.to_string());
            self.set_text("#gameOverScreen h1", end_title(won, new_high_score));
            if let Some(el) = self.document.get_element_by_id("highScoreDisplay") {
                el.set_text_content(Some(&format!("High Score: {high_score}")));
                let (color, animation) = if new_high_score {
                    ("#ffd700", "pulse 2s infinite")
                } else {
                    ("#fff", "none")
                };
                let _ = el.set_attribute(
                    "style",
                    &format!("color: {color}; animation: {animation};"),
                );
            }
        }
    }

    impl Presenter for DomPresenter {
        fn update_hud(&mut self, hud: &HudSnapshot) {
            self.expire_overlays();
            self.level = hud.level;

            self.set_text("#score", &hud.score.to_string());
            self.set_text("#level", &hud.level.to_string());
            self.set_text("#startHighScoreValue", &hud.high_score.to_string());
            if let Some(fill) = self.document.get_element_by_id("fuelFill") {
                let _ = fill.set_attribute(
                    "style",
                    &format!(
                        "width: {:.1}%; background: {};",
                        hud.fuel_percent,
                        fuel_bar_color(hud.fuel_percent)
                    ),
                );
            }
            for kind in PowerUpKind::ALL {
                self.set_hidden(indicator_id(kind), !hud.is_active(kind));
            }
        }

        fn notify(&mut self, event: &GameEvent) {
            match event {
                GameEvent::ShowScreen(screen) => self.set_hidden(screen_id(*screen), false),
                GameEvent::HideScreen(screen) => self.set_hidden(screen_id(*screen), true),
                GameEvent::ScorePopup { pos, label } => {
                    let (left, top) = self.canvas_origin();
                    let style = format!(
                        "position: absolute; left: {}px; top: {}px; color: #ffd700; \
                         font-weight: bold; font-size: 18px; pointer-events: none; \
                         z-index: 1000; animation: scorePopup 1s ease-out forwards;",
                        left + pos.x as f64,
                        top + pos.y as f64
                    );
                    self.spawn_overlay(&style, Some(label.as_str()), POPUP_MS);
                }
                GameEvent::ScreenFlash { color, duration_ms } => {
                    let style = format!(
                        "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                         background: {}; pointer-events: none; z-index: 9999; \
                         animation: flashEffect {duration_ms}ms ease-out;",
                        css_rgba(*color)
                    );
                    self.spawn_overlay(&style, None, f64::from(*duration_ms));
                }
                GameEvent::LevelStarted { level } => {
                    self.level = *level;
                    self.set_text("#level", &level.to_string());
                }
                GameEvent::LevelComplete { score, bonus, .. } => {
                    self.set_text("#levelScore span", &score.saturating_sub(*bonus).to_string());
                    self.set_text("#bonusPoints span", &format!("+{bonus}"));
                }
                GameEvent::GameOver {
                    score,
                    high_score,
                    new_high_score,
                    ..
                } => self.show_end_screen(false, *score, *high_score, *new_high_score),
                GameEvent::GameWon {
                    score,
                    high_score,
                    new_high_score,
                } => self.show_end_screen(true, *score, *high_score, *new_high_score),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::Tuning;

    fn world() -> World {
        World::new(7, Vec2::new(800.0, 600.0), Tuning::default(), 900, 500)
    }

    #[test]
    fn test_fuel_bar_tiers() {
        assert!(fuel_bar_color(100.0).contains("#44ff44"));
        assert!(fuel_bar_color(60.5).contains("#44ff44"));
        assert!(fuel_bar_color(60.0).contains("#ffaa00"));
        assert!(fuel_bar_color(30.5).contains("#ffaa00"));
        assert!(fuel_bar_color(30.0).contains("#ff4444"));
        assert!(fuel_bar_color(0.0).contains("#ff4444"));
    }

    #[test]
    fn test_snapshot_lists_only_running_timers() {
        let mut w = world();
        w.start_game();
        w.player.activate(PowerUpKind::Shield, 5.0);
        w.player.activate(PowerUpKind::Magnetic, 2.5);
        w.state.fuel = 40.0;

        let hud = HudSnapshot::from_world(&w, true);
        assert_eq!(hud.phase, GamePhase::Playing);
        assert_eq!(hud.high_score, 900);
        assert!((hud.fuel_percent - 40.0).abs() < 1e-4);
        assert!(hud.muted);
        assert_eq!(
            hud.power_ups,
            vec![
                ActivePowerUp {
                    kind: PowerUpKind::Shield,
                    remaining: 5.0
                },
                ActivePowerUp {
                    kind: PowerUpKind::Magnetic,
                    remaining: 2.5
                },
            ]
        );
        assert!(hud.is_active(PowerUpKind::Shield));
        assert!(!hud.is_active(PowerUpKind::Speed));
    }

    #[test]
    fn test_end_title_prefers_high_score() {
        assert_eq!(end_title(true, true), "🎉 New High Score! 🎉");
        assert_eq!(end_title(true, false), "Congratulations! You completed all levels!");
        assert_eq!(end_title(false, false), "Game Over!");
    }

    #[test]
    fn test_css_rgba() {
        assert_eq!(css_rgba([1.0, 0.0, 0.0, 0.5]), "rgba(255, 0, 0, 0.5)");
        assert_eq!(css_rgba([0.0, 1.0, 1.0, 0.3]), "rgba(0, 255, 255, 0.3)");
    }

    #[test]
    fn test_log_presenter_keeps_last_snapshot() {
        let w = world();
        let mut presenter = LogPresenter::default();
        assert!(presenter.last_hud().is_none());
        presenter.update_hud(&HudSnapshot::from_world(&w, false));
        presenter.notify(&GameEvent::HighScore(10));
        assert_eq!(presenter.last_hud().map(|h| h.level), Some(1));
    }
}
