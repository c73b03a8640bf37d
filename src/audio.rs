//! Audio system using Web Audio API
//!
//! Cues are synthesized, so the game never waits on or fails over a sound
//! file.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::Settings;
use crate::sim::{Cue, GameEvent};

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    /// Running music voice, kept so it can be stopped
    music: Option<(OscillatorNode, GainNode)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            music: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Pick up volumes from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.master_volume = settings.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = settings.music_volume.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some((_, gain)) = &self.music {
            gain.gain().set_value(self.music_level());
        }
    }

    fn sfx_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume * 0.15
        }
    }

    /// React to a run event
    pub fn handle(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayCue(cue) => self.play(*cue),
            GameEvent::StopCue(cue) => self.stop(*cue),
            _ => {}
        }
    }

    /// Play a cue
    pub fn play(&mut self, cue: Cue) {
        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.sfx_level();
        match cue {
            Cue::Jump => self.play_jump(&ctx, vol),
            Cue::Collect => self.play_collect(&ctx, vol),
            Cue::Hit => self.play_hit(&ctx, vol),
            Cue::Music => self.start_music(&ctx),
        }
    }

    /// Stop a cue (only the looping music lasts long enough to matter)
    pub fn stop(&mut self, cue: Cue) {
        if cue == Cue::Music {
            if let Some((osc, _)) = self.music.take() {
                osc.stop().ok();
            }
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
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

    /// Jump - quick rising chirp
    fn play_jump(&self, ctx: &AudioContext, vol: f32) {
        if vol <= 0.0 {
            return;
        }
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.15)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(700.0, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.18).ok();
    }

    /// Collect - bright two-note blip
    fn play_collect(&self, ctx: &AudioContext, vol: f32) {
        if vol <= 0.0 {
            return;
        }
        for (i, freq) in [880.0, 1320.0].iter().enumerate() {
            let delay = i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
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

    /// Hit - sad descending
    fn play_hit(&self, ctx: &AudioContext, vol: f32) {
        if vol <= 0.0 {
            return;
        }
        for (i, freq) in [400.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.18;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sawtooth) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.2, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.35).ok();
            }
        }
    }

    /// Music - low sustained drone until stopped
    fn start_music(&mut self, ctx: &AudioContext) {
        if self.music.is_some() {
            return;
        }
        let Some((osc, gain)) = self.create_osc(ctx, 110.0, OscillatorType::Triangle) else {
            return;
        };
        gain.gain().set_value(self.music_level());
        osc.start().ok();
        self.music = Some((osc, gain));
    }
}
