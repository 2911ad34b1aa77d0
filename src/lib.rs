//! Fronton - a multi-ball Pong variant played against a wall
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (phases, physics, scoring, escalation)
//! - `audio`: Maps simulation events to sound cues
//! - `settings`: Host configuration
//! - `platform`: Browser bindings (wasm32 only)

pub mod audio;
pub mod platform;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, AudioSink, SoundEffect};
pub use settings::Settings;
pub use sim::{GameEvent, MatchPhase, MatchState, TickInput};

/// Game rule constants
pub mod consts {
    use std::ops::RangeInclusive;

    /// Display height reserved at the bottom for score and arrows
    pub const HUD_MARGIN: i32 = 64;

    /// Paddle width is the field width divided by this
    pub const PADDLE_WIDTH_DIVISOR: i32 = 4;
    pub const PADDLE_HEIGHT: i32 = 5;
    /// Space between the paddle's bottom edge and the floor
    pub const PADDLE_FLOOR_GAP: i32 = 5;
    /// Units per frame
    pub const PADDLE_SPEED: i32 = 8;

    /// Smallest field that still has a paddle on it
    pub const MIN_FIELD_WIDTH: i32 = PADDLE_WIDTH_DIVISOR;
    pub const MIN_FIELD_HEIGHT: i32 = PADDLE_FLOOR_GAP + PADDLE_HEIGHT + 2;

    /// First side to this many points ends the match
    pub const WINNER_SCORE: u32 = 21;
    /// Restart input is ignored this long after the match ends
    pub const RESTART_COOLDOWN_SECS: f64 = 2.0;

    /// Starting ball
    pub const CANONICAL_BALL_RADIUS: i32 = 5;
    pub const CANONICAL_BALL_SPEED: i32 = 5;

    /// A ball is added whenever player points == balls * this
    pub const ESCALATION_POINTS_PER_BALL: usize = 3;
    pub const ESCALATION_RADIUS: RangeInclusive<i32> = 4..=10;
    /// Used for both axes
    pub const ESCALATION_SPEED: RangeInclusive<i32> = 3..=6;
}
