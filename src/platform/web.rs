//! Browser bindings
//!
//! `WebMatch` wraps a `MatchState` for the JS frame loop: JS samples input, calls
//! `advance`, then reads the getters to draw. Cues are synthesized with Web Audio.

use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use super::codes::{event_code, phase_code};
use crate::audio::{AudioManager, AudioSink, SoundEffect};
use crate::sim::{FieldGeometry, MatchPhase, MatchState, TickInput};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Fronton starting...");
}

/// Procedural tones, one per cue
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
}

impl WebAudioSink {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

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

    /// Single tone with an exponential fade, optionally sliding to `end_freq`
    fn tone(
        ctx: &AudioContext,
        vol: f32,
        (freq, end_freq): (f32, f32),
        secs: f64,
        osc_type: OscillatorType,
    ) {
        let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs)
            .ok();
        osc.frequency().set_value_at_time(freq, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(end_freq, t + secs)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + secs + 0.05).ok();
    }
}

impl Default for WebAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for WebAudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            // Rising blip
            SoundEffect::Start => {
                Self::tone(ctx, volume * 0.4, (330.0, 660.0), 0.3, OscillatorType::Square)
            }
            SoundEffect::Hit => Self::tone(ctx, volume * 0.5, (880.0, 880.0), 0.08, OscillatorType::Sine),
            // Coin-like chirp
            SoundEffect::Miss => {
                Self::tone(ctx, volume * 0.4, (600.0, 1200.0), 0.15, OscillatorType::Square)
            }
            SoundEffect::Over => {
                Self::tone(ctx, volume * 0.5, (440.0, 110.0), 0.6, OscillatorType::Triangle)
            }
        }
    }
}

/// A match driven from JavaScript
#[wasm_bindgen]
pub struct WebMatch {
    state: MatchState,
    audio: AudioManager<WebAudioSink>,
}

#[wasm_bindgen]
impl WebMatch {
    /// Build a match for the display surface, with the starting ball in place
    #[wasm_bindgen(constructor)]
    pub fn new(display_width: i32, display_height: i32, seed: u64) -> Result<WebMatch, JsError> {
        let field = FieldGeometry::from_display(display_width, display_height)?;
        let mut state = MatchState::new(field.width, field.height, seed)?;
        state.spawn_canonical_ball();
        Ok(Self {
            state,
            audio: AudioManager::new(WebAudioSink::new()),
        })
    }

    /// Step one frame; returns the event codes in order
    pub fn advance(
        &mut self,
        move_left: bool,
        move_right: bool,
        confirm: bool,
        dt: f32,
    ) -> Vec<u8> {
        let input = TickInput {
            move_left,
            move_right,
            confirm,
        };
        let was = self.state.phase;
        let events = self.state.advance(&input, dt);
        if was != MatchPhase::InPlay && self.state.phase == MatchPhase::InPlay {
            self.audio.match_started();
        }
        self.audio.dispatch(&events);
        events.iter().map(event_code).collect()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    pub fn phase(&self) -> u8 {
        phase_code(self.state.phase)
    }

    pub fn player_score(&self) -> u32 {
        self.state.score.player
    }

    pub fn opponent_score(&self) -> u32 {
        self.state.score.opponent
    }

    /// `PP:OO`
    pub fn score_text(&self) -> String {
        self.state.score.to_string()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.state.timing.elapsed_secs
    }

    pub fn field_width(&self) -> i32 {
        self.state.field.width
    }

    pub fn field_height(&self) -> i32 {
        self.state.field.height
    }

    /// `[x, y, width, height]`
    pub fn paddle(&self) -> Vec<i32> {
        let p = &self.state.paddle;
        vec![p.x, p.y, p.width, p.height]
    }

    /// `[x, y, radius]` per ball
    pub fn balls(&self) -> Vec<i32> {
        self.state
            .balls
            .iter()
            .flat_map(|b| [b.pos.x, b.pos.y, b.radius])
            .collect()
    }

    /// `0xRRGGBBAA` per ball
    pub fn ball_colors(&self) -> Vec<u32> {
        self.state.balls.iter().map(|b| b.color.to_u32()).collect()
    }
}
