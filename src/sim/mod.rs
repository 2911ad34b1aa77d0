//! Deterministic match simulation
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Seeded RNG only
//! - Time only through the `dt` handed to `tick`
//! - Stable iteration order (ball insertion order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod error;
pub mod state;
pub mod tick;

pub use collision::{RowContact, reflect_off_field, row_contact};
pub use error::SimError;
pub use state::{
    Ball, CANONICAL_BALL_COLOR, FieldGeometry, GameEvent, MatchPhase, MatchState, MatchTiming,
    Outcome, Paddle, Rgba, Score,
};
pub use tick::{TickInput, tick};
