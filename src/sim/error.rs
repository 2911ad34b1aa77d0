//! Construction errors
//!
//! `advance` never fails; only building geometry and balls can. Anything that could
//! overflow the integer physics is refused here.

use std::fmt;

use crate::consts::{MIN_FIELD_HEIGHT, MIN_FIELD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// Field too small to hold a paddle
    InvalidField { width: i32, height: i32 },
    /// Ball radius must be positive and fit above the paddle row
    InvalidRadius(i32),
    /// Per-frame speed must be smaller than the field
    InvalidSpeed { speed_x: i32, speed_y: i32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidField { width, height } => write!(
                f,
                "invalid field {}x{} (minimum {}x{})",
                width, height, MIN_FIELD_WIDTH, MIN_FIELD_HEIGHT
            ),
            SimError::InvalidRadius(r) => write!(f, "invalid ball radius {}", r),
            SimError::InvalidSpeed { speed_x, speed_y } => {
                write!(f, "invalid ball speed ({}, {})", speed_x, speed_y)
            }
        }
    }
}

impl std::error::Error for SimError {}
