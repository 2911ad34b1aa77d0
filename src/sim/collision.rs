//! Contact tests between balls, the field edges and the paddle
//!
//! All integer, all pure. The tick decides what to do with the answers.

use super::state::{Ball, Paddle};

/// Where a ball stands relative to the paddle row after integration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowContact {
    /// Still in open field, walls and ceiling apply
    Above,
    /// At or past the row, inside the paddle span
    Hit,
    /// At or past the row, outside the paddle span
    Miss,
}

/// Touching or beyond the left or right field edge
pub fn touches_side_wall(ball: &Ball, field_width: i32) -> bool {
    ball.left() <= 0 || ball.right() >= field_width - 1
}

/// Touching or beyond the ceiling
pub fn touches_ceiling(ball: &Ball) -> bool {
    ball.top() <= 0
}

/// Bottom edge has reached the paddle's top edge
pub fn reached_paddle_row(ball: &Ball, paddle: &Paddle) -> bool {
    ball.bottom() >= paddle.y
}

/// Classify a ball against the paddle row. Only the ball center counts
/// for the span test, the radius does not widen the paddle.
pub fn row_contact(ball: &Ball, paddle: &Paddle) -> RowContact {
    if !reached_paddle_row(ball, paddle) {
        RowContact::Above
    } else if paddle.covers(ball.pos.x) {
        RowContact::Hit
    } else {
        RowContact::Miss
    }
}

/// Flip velocity components for wall and ceiling contact.
/// Returns true if anything was reflected.
pub fn reflect_off_field(ball: &mut Ball, field_width: i32) -> bool {
    let mut reflected = false;
    if touches_side_wall(ball, field_width) {
        ball.vel.x = -ball.vel.x;
        reflected = true;
    }
    if touches_ceiling(ball) {
        ball.vel.y = -ball.vel.y;
        reflected = true;
    }
    reflected
}
