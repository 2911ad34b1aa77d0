//! Match state and core simulation types
//!
//! Everything the renderer reads and everything a snapshot must carry lives here.

use std::fmt;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::SimError;
use crate::consts::*;

/// Lifecycle of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Waiting for the first tap
    #[default]
    NotStarted,
    /// Active gameplay
    InPlay,
    /// Someone reached the winner score
    Over,
}

/// Who reached the winner score first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    PlayerWon,
    OpponentWon,
}

/// Events emitted by a single `advance` call, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ball at index `ball` bounced off the paddle
    BallHit { ball: usize },
    /// Ball at index `ball` got past the paddle and was respawned
    BallMiss { ball: usize },
    /// The match ended this frame
    MatchOver { outcome: Outcome, elapsed_secs: f64 },
}

/// Player points vs. misses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub player: u32,
    /// Miss counter, shown as the machine's score
    pub opponent: u32,
}

impl Score {
    /// Who has `target` points, the player taking precedence
    pub fn winner(&self, target: u32) -> Option<Outcome> {
        if self.player >= target {
            Some(Outcome::PlayerWon)
        } else if self.opponent >= target {
            Some(Outcome::OpponentWon)
        } else {
            None
        }
    }
}

/// HUD format, e.g. `07:03`
impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.player, self.opponent)
    }
}

/// 8-bit RGBA color, passed through untouched to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Pack as `0xRRGGBBAA`
    pub fn to_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }
}

/// Color of the ball every match starts with
pub const CANONICAL_BALL_COLOR: Rgba = Rgba::new(0, 255, 0, 0);

/// Playing field, in display units. The HUD strip is already excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGeometry {
    pub width: i32,
    pub height: i32,
}

impl FieldGeometry {
    pub fn new(width: i32, height: i32) -> Result<Self, SimError> {
        if width < MIN_FIELD_WIDTH || height < MIN_FIELD_HEIGHT {
            return Err(SimError::InvalidField { width, height });
        }
        Ok(Self { width, height })
    }

    /// Field for a display surface, reserving the bottom HUD strip
    pub fn from_display(display_width: i32, display_height: i32) -> Result<Self, SimError> {
        Self::new(display_width, display_height.saturating_sub(HUD_MARGIN))
    }

    pub fn paddle_width(&self) -> i32 {
        self.width / PADDLE_WIDTH_DIVISOR
    }

    /// Top edge of the paddle, a fixed gap above the floor
    pub fn paddle_y(&self) -> i32 {
        self.height - 1 - PADDLE_FLOOR_GAP - PADDLE_HEIGHT
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left edge
    pub x: i32,
    /// Top edge, fixed for the whole match
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub speed: i32,
}

impl Paddle {
    /// Centered paddle for a field
    pub fn for_field(field: &FieldGeometry) -> Self {
        let width = field.paddle_width();
        Self {
            x: field.width / 2 - width / 2,
            y: field.paddle_y(),
            width,
            height: PADDLE_HEIGHT,
            speed: PADDLE_SPEED,
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Shift horizontally. There is no field clamp, only the integer range.
    pub fn shift(&mut self, dx: i32) {
        self.x = self.x.saturating_add(dx);
    }

    /// Whether `x` lies on the paddle span, both edges included
    pub fn covers(&self, x: i32) -> bool {
        x >= self.x && x <= self.right()
    }
}

/// A ball entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ball {
    pub radius: i32,
    pub color: Rgba,
    /// Center
    pub pos: IVec2,
    /// Displacement per frame
    pub vel: IVec2,
}

impl Ball {
    pub fn left(&self) -> i32 {
        self.pos.x - self.radius
    }

    pub fn right(&self) -> i32 {
        self.pos.x + self.radius
    }

    pub fn top(&self) -> i32 {
        self.pos.y - self.radius
    }

    pub fn bottom(&self) -> i32 {
        self.pos.y + self.radius
    }

    /// Integrate one frame
    pub fn step(&mut self) {
        self.pos += self.vel;
    }

    /// Back to the ceiling at a random column; speed, radius and color are kept
    pub fn reset(&mut self, field_width: i32, rng: &mut Pcg32) {
        self.pos = IVec2::new(rng.random_range(0..field_width), self.radius);
    }
}

/// Timestamps on the state's simulated clock, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchTiming {
    pub started_at: f64,
    pub ended_at: Option<f64>,
    pub elapsed_secs: f64,
}

/// Complete match state (deterministic for a given seed, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    /// Seed the RNG was created from, for reproducing a run
    pub seed: u64,
    pub field: FieldGeometry,
    pub phase: MatchPhase,
    pub score: Score,
    pub paddle: Paddle,
    /// Insertion ordered; only `initialize` removes balls
    pub balls: Vec<Ball>,
    pub timing: MatchTiming,
    pub(crate) rng: Pcg32,
    /// Sum of every `dt` passed to `advance`
    pub(crate) clock_secs: f64,
    /// Clock reading when the phase became `Over`
    pub(crate) over_at: Option<f64>,
}

impl MatchState {
    /// Create and initialize a match. No balls exist until one is spawned.
    pub fn new(width: i32, height: i32, seed: u64) -> Result<Self, SimError> {
        let field = FieldGeometry::new(width, height)?;
        let mut state = Self {
            seed,
            field,
            phase: MatchPhase::NotStarted,
            score: Score::default(),
            paddle: Paddle::for_field(&field),
            balls: Vec::new(),
            timing: MatchTiming::default(),
            rng: Pcg32::seed_from_u64(seed),
            clock_secs: 0.0,
            over_at: None,
        };
        state.reset();
        log::info!("Match created: field {}x{}, seed {}", width, height, seed);
        Ok(state)
    }

    /// Like `new`, seeded from the OS
    pub fn from_entropy(width: i32, height: i32) -> Result<Self, SimError> {
        Self::new(width, height, rand::random())
    }

    /// Reset geometry, score, paddle and timing, and drop every ball.
    /// Safe to call repeatedly.
    pub fn initialize(&mut self, width: i32, height: i32) -> Result<(), SimError> {
        self.field = FieldGeometry::new(width, height)?;
        self.reset();
        Ok(())
    }

    /// `initialize` with the current field, which is already validated
    pub(crate) fn reset(&mut self) {
        self.phase = MatchPhase::NotStarted;
        self.score = Score::default();
        self.paddle = Paddle::for_field(&self.field);
        self.balls.clear();
        self.timing = MatchTiming {
            started_at: self.clock_secs,
            ended_at: None,
            elapsed_secs: 0.0,
        };
        self.over_at = None;
    }

    /// Append a ball at a random column touching the ceiling.
    /// Returns its index.
    pub fn spawn_ball(
        &mut self,
        radius: i32,
        color: Rgba,
        speed_x: i32,
        speed_y: i32,
    ) -> Result<usize, SimError> {
        // A ball must fit between the ceiling and the paddle row
        if radius <= 0 || radius >= self.field.height / 2 {
            return Err(SimError::InvalidRadius(radius));
        }
        // One frame may not jump across the whole field
        let max_speed = self.field.width.min(self.field.height).unsigned_abs();
        if speed_x.unsigned_abs() >= max_speed || speed_y.unsigned_abs() >= max_speed {
            return Err(SimError::InvalidSpeed { speed_x, speed_y });
        }
        Ok(self.push_ball(radius, color, IVec2::new(speed_x, speed_y)))
    }

    /// The ball every match starts with
    pub fn spawn_canonical_ball(&mut self) -> usize {
        self.push_ball(
            CANONICAL_BALL_RADIUS,
            CANONICAL_BALL_COLOR,
            IVec2::splat(CANONICAL_BALL_SPEED),
        )
    }

    pub(crate) fn push_ball(&mut self, radius: i32, color: Rgba, vel: IVec2) -> usize {
        let x = self.rng.random_range(0..self.field.width);
        self.balls.push(Ball {
            radius,
            color,
            pos: IVec2::new(x, radius),
            vel,
        });
        log::debug!(
            "Ball {} spawned at x={} (radius {}, speed {:?})",
            self.balls.len() - 1,
            x,
            radius,
            vel
        );
        self.balls.len() - 1
    }

    /// Respawn the ball at `index`; out of range indices are ignored
    pub fn reset_ball(&mut self, index: usize) {
        let width = self.field.width;
        if let Some(ball) = self.balls.get_mut(index) {
            ball.reset(width, &mut self.rng);
        }
    }

    /// Winner, once the match is over
    pub fn outcome(&self) -> Option<Outcome> {
        if self.phase != MatchPhase::Over {
            return None;
        }
        self.score.winner(WINNER_SCORE)
    }

    /// Simulated seconds since the state was created
    pub fn clock_secs(&self) -> f64 {
        self.clock_secs
    }

    /// Whether a confirm would restart the match right now
    pub fn restart_ready(&self) -> bool {
        match self.over_at {
            Some(at) => {
                self.phase == MatchPhase::Over && self.clock_secs - at > RESTART_COOLDOWN_SECS
            }
            None => false,
        }
    }

    /// JSON snapshot of the whole state, RNG included
    pub fn snapshot(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Restore a snapshot taken with `snapshot`
    pub fn from_snapshot(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
