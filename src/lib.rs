//! Road Rush - A vertically-scrolling car-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, particles, game state machine)
//! - `renderer`: Drawing surface abstraction and WebGPU presentation
//! - `platform`: Keyboard intent and frame clock
//! - `persistence`: High score storage
//! - `tuning`: Data-driven game balance
//! - `game`: Frame driver wiring the simulation to its collaborators

pub mod audio;
pub mod game;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Game configuration constants
pub mod consts {
    /// Upper bound on a single frame's dt (seconds)
    pub const MAX_FRAME_DT: f32 = 0.016;

    /// Default viewport, matching the largest canvas the page allows
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;

    /// Entities are discarded once their top edge is this far below the viewport
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Road scroll speed and marking period
    pub const ROAD_SPEED: f32 = 200.0;
    pub const ROAD_WRAP: f32 = 50.0;
    /// Fraction of the viewport width covered by asphalt
    pub const ROAD_WIDTH_FRACTION: f32 = 0.8;

    /// Player car
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 70.0;
    pub const PLAYER_ACCELERATION: f32 = 800.0;
    /// Multiplier applied to horizontal speed every frame
    pub const PLAYER_FRICTION: f32 = 0.85;
    pub const PLAYER_MAX_SPEED: f32 = 500.0;
    pub const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
    /// Distance from the bottom of the viewport to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 100.0;
    /// Reach of the magnetic power-up, measured centre to centre
    pub const MAGNETIC_RANGE: f32 = 80.0;
    pub const MAGNETIC_PULL_SPEED: f32 = 300.0;

    /// Hard cap on live particles when no settings override it
    pub const MAX_PARTICLES: usize = 500;
}

/// Convert an HSL triple (hue in degrees, saturation and lightness in 0..=1) to RGBA
pub fn hsl(hue: f32, saturation: f32, lightness: f32) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let x = c * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = lightness - c / 2.0;
    [r + m, g + m, b + m, 1.0]
}

/// Same color with its alpha multiplied by `alpha`
#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], color[3] * alpha]
}
