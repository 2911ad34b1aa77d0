//! Sound cues for simulation events
//!
//! The simulation never plays audio itself. The host hands the events returned by
//! `advance` to an [`AudioManager`], which picks one cue per event and forwards it
//! to whatever [`AudioSink`] the platform provides.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// A match begins
    Start,
    /// Ball bounced off the paddle
    Hit,
    /// Ball got past the paddle
    Miss,
    /// Match ended
    Over,
}

impl SoundEffect {
    /// Exactly one cue per event kind
    pub fn for_event(event: &GameEvent) -> Self {
        match event {
            GameEvent::BallHit { .. } => SoundEffect::Hit,
            GameEvent::BallMiss { .. } => SoundEffect::Miss,
            GameEvent::MatchOver { .. } => SoundEffect::Over,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Start => "start",
            SoundEffect::Hit => "hit",
            SoundEffect::Miss => "miss",
            SoundEffect::Over => "over",
        }
    }
}

/// Something that can actually make noise
pub trait AudioSink {
    /// Start playing `effect` at `volume` (0.0 - 1.0). Must not block.
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless hosts
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("♪ {} (vol {:.2})", effect.as_str(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with the volume settings applied
    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        let mut manager = Self::new(sink);
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Play the cue of every event, in order
    pub fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            self.play(SoundEffect::for_event(event));
        }
    }

    /// Call when a match goes in play
    pub fn match_started(&mut self) {
        self.play(SoundEffect::Start);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
