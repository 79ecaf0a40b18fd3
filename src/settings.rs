//! Game settings and preferences
//!
//! Persisted separately from the high score in LocalStorage. Out-of-range
//! values coming back from storage are clamped, never rejected.

use serde::{Deserialize, Serialize};

use crate::audio::VolumeControl;
#[cfg(target_arch = "wasm32")]
use crate::persistence::StorageError;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 500,
            QualityPreset::High => 2000,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Particle effects (explosions, sparks, pickup bursts)
    pub particles: bool,
    /// Full-screen colour flash on crashes and shield hits
    pub screen_flash: bool,

    // === Audio ===
    /// Ambient loop volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Hit and pickup volume (0.0 - 1.0)
    pub effect_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (suppresses screen flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            screen_flash: true,
            music_volume: 0.3,
            effect_volume: 0.5,
            muted: false,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen flash (respects reduced_motion)
    pub fn effective_screen_flash(&self) -> bool {
        self.screen_flash && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Audio volumes, clamped
    pub fn volume(&self) -> VolumeControl {
        VolumeControl::new(self.music_volume, self.effect_volume, self.muted)
    }

    /// Copy the (clamped) audio state back in before saving
    pub fn set_volume(&mut self, volume: &VolumeControl) {
        self.music_volume = volume.music_volume();
        self.effect_volume = volume.effect_volume();
        self.muted = volume.is_muted();
    }

    /// Clamp anything a hand-edited store may have put out of range
    pub fn sanitized(mut self) -> Self {
        let volume = self.volume();
        self.set_volume(&volume);
        self
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "road_rush_settings";

    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable)
    }

    #[cfg(target_arch = "wasm32")]
    fn read_stored() -> Result<Option<Self>, StorageError> {
        let Some(json) = Self::storage()?
            .get_item(Self::STORAGE_KEY)
            .map_err(|_| StorageError::Unavailable)?
        else {
            return Ok(None);
        };
        serde_json::from_str::<Settings>(&json)
            .map(|settings| Some(settings.sanitized()))
            .map_err(|e| StorageError::Malformed(e.to_string()))
    }

    /// Load settings from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        match Self::read_stored() {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from LocalStorage");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring stored settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let result = serde_json::to_string(self)
            .map_err(|e| StorageError::Malformed(e.to_string()))
            .and_then(|json| {
                Self::storage()?
                    .set_item(Self::STORAGE_KEY, &json)
                    .map_err(|_| StorageError::Rejected("setItem failed".into()))
            });
        if let Err(e) = result {
            log::warn!("Failed to save settings: {e}");
        }
    }

    /// Native builds keep preferences for the process lifetime only
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}
