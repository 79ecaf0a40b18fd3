//! Audio system
//!
//! Procedurally generated sounds on the Web Audio API: a crash thud, a
//! pickup chime and a looping engine drone. No external files needed.
//! Every call is fire-and-forget; failures are swallowed with `.ok()` or
//! logged, never propagated into the frame.

use crate::sim::SoundCue;

/// Volume and mute state shared by every sink. Setters clamp to `0..=1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeControl {
    music_volume: f32,
    effect_volume: f32,
    muted: bool,
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self {
            music_volume: 0.3,
            effect_volume: 0.5,
            muted: false,
        }
    }
}

impl VolumeControl {
    pub fn new(music_volume: f32, effect_volume: f32, muted: bool) -> Self {
        let mut volume = Self::default();
        volume.set_music_volume(music_volume);
        volume.set_effect_volume(effect_volume);
        volume.muted = muted;
        volume
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    pub fn effect_volume(&self) -> f32 {
        self.effect_volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) };
    }

    pub fn set_effect_volume(&mut self, vol: f32) {
        self.effect_volume = if vol.is_nan() { 0.0 } else { vol.clamp(0.0, 1.0) };
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Effect gain after mute
    pub fn effective_effect(&self) -> f32 {
        if self.muted { 0.0 } else { self.effect_volume }
    }

    /// Music gain after mute
    pub fn effective_music(&self) -> f32 {
        if self.muted { 0.0 } else { self.music_volume }
    }
}

/// Audio collaborator driven by the game loop
pub trait AudioSink {
    fn play_hit(&mut self);
    fn play_success(&mut self);
    /// Start the ambient loop from the beginning; no-op while muted
    fn play_ambient_loop(&mut self);
    fn stop_ambient_loop(&mut self);
    fn is_ambient_playing(&self) -> bool;

    fn volume(&self) -> &VolumeControl;
    fn volume_mut(&mut self) -> &mut VolumeControl;

    /// Muting also silences the ambient loop
    fn set_muted(&mut self, muted: bool) {
        self.volume_mut().set_muted(muted);
        if muted {
            self.stop_ambient_loop();
        }
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
    }

    /// Flip mute; returns the new state
    fn toggle_mute(&mut self) -> bool {
        let muted = !self.volume().is_muted();
        self.set_muted(muted);
        muted
    }

    fn set_music_volume(&mut self, vol: f32) {
        self.volume_mut().set_music_volume(vol);
    }

    fn set_effect_volume(&mut self, vol: f32) {
        self.volume_mut().set_effect_volume(vol);
    }

    /// Resume a context suspended by the browser's autoplay policy
    fn resume(&mut self) {}

    fn play(&mut self, cue: SoundCue) {
        match cue {
            SoundCue::Hit => self.play_hit(),
            SoundCue::Success => self.play_success(),
            SoundCue::AmbientStart => self.play_ambient_loop(),
            SoundCue::AmbientStop => self.stop_ambient_loop(),
        }
    }
}

/// Silent sink for native builds and tests; tracks the ambient flag only
#[derive(Debug, Default)]
pub struct NullAudio {
    volume: VolumeControl,
    ambient: bool,
}

impl NullAudio {
    pub fn new(volume: VolumeControl) -> Self {
        Self {
            volume,
            ambient: false,
        }
    }
}

impl AudioSink for NullAudio {
    fn play_hit(&mut self) {}

    fn play_success(&mut self) {}

    fn play_ambient_loop(&mut self) {
        if !self.volume.is_muted() {
            self.ambient = true;
        }
    }

    fn stop_ambient_loop(&mut self) {
        self.ambient = false;
    }

    fn is_ambient_playing(&self) -> bool {
        self.ambient
    }

    fn volume(&self) -> &VolumeControl {
        &self.volume
    }

    fn volume_mut(&mut self) -> &mut VolumeControl {
        &mut self.volume
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, VolumeControl};

    /// Oscillators and output gain of the running engine drone
    struct Drone {
        oscillators: Vec<OscillatorNode>,
        gain: GainNode,
    }

    /// Web Audio sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: VolumeControl,
        drone: Option<Drone>,
    }

    impl WebAudio {
        pub fn new(volume: VolumeControl) -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume,
                drone: None,
            }
        }

        /// Live context, resumed if the browser suspended it
        fn context(&self) -> Option<&AudioContext> {
            let ctx = self.ctx.as_ref()?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Some(ctx)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn start_drone(ctx: &AudioContext, vol: f32) -> Option<Drone> {
            let gain = ctx.create_gain().ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;
            let t = ctx.current_time();
            gain.gain().set_value_at_time(0.001, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.15, t + 0.5)
                .ok();

            // Low engine hum with a detuned fifth on top
            let mut oscillators = Vec::new();
            for (freq, osc_type) in [
                (55.0, OscillatorType::Sawtooth),
                (82.5, OscillatorType::Triangle),
                (110.5, OscillatorType::Sine),
            ] {
                let osc = ctx.create_oscillator().ok()?;
                osc.set_type(osc_type);
                osc.frequency().set_value(freq);
                osc.connect_with_audio_node(&gain).ok()?;
                osc.start().ok()?;
                oscillators.push(osc);
            }
            Some(Drone { oscillators, gain })
        }
    }

    impl AudioSink for WebAudio {
        /// Crash - low boom with a sharp crack
        fn play_hit(&mut self) {
            let vol = self.volume.effective_effect();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };
            let t = ctx.current_time();

            if let Some((osc, gain)) = Self::create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
                gain.gain().set_value_at_time(vol * 0.6, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                    .ok();
                osc.frequency().set_value_at_time(120.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(35.0, t + 0.35)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.4).ok();
            }

            if let Some((osc, gain)) = Self::create_osc(ctx, 1200.0, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.08)
                    .ok();
                osc.start().ok();
                osc.stop_with_when(t + 0.1).ok();
            }
        }

        /// Pickup - rising three-note chime
        fn play_success(&mut self) {
            let vol = self.volume.effective_effect();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = self.context() else { return };

            for (i, freq) in [660.0, 880.0, 1100.0].iter().enumerate() {
                let delay = i as f64 * 0.06;
                if let Some((osc, gain)) = Self::create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        fn play_ambient_loop(&mut self) {
            let vol = self.volume.effective_music();
            if vol <= 0.0 {
                return;
            }
            // Restart from the beginning
            self.stop_ambient_loop();
            let Some(ctx) = self.context().cloned() else {
                return;
            };
            self.drone = Self::start_drone(&ctx, vol);
            if self.drone.is_none() {
                log::warn!("Ambient loop failed to start");
            }
        }

        fn stop_ambient_loop(&mut self) {
            let Some(drone) = self.drone.take() else {
                return;
            };
            let t = self.ctx.as_ref().map_or(0.0, |ctx| ctx.current_time());
            drone
                .gain
                .gain()
                .exponential_ramp_to_value_at_time(0.001, t + 0.2)
                .ok();
            for osc in drone.oscillators {
                osc.stop_with_when(t + 0.25).ok();
            }
        }

        fn is_ambient_playing(&self) -> bool {
            self.drone.is_some()
        }

        fn volume(&self) -> &VolumeControl {
            &self.volume
        }

        fn volume_mut(&mut self) -> &mut VolumeControl {
            &mut self.volume
        }

        fn set_music_volume(&mut self, vol: f32) {
            self.volume.set_music_volume(vol);
            if let (Some(drone), Some(ctx)) = (&self.drone, &self.ctx) {
                drone
                    .gain
                    .gain()
                    .set_value_at_time(self.volume.effective_music() * 0.15, ctx.current_time())
                    .ok();
            }
        }

        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }
    }
}
