//! Collision detection and response
//!
//! Walls reflect only the vertical velocity. Paddles reflect the horizontal
//! velocity, speed it up, and set the vertical velocity from where the ball
//! struck the paddle: center hits go straight, edge hits deflect hardest.

use glam::Vec2;

use super::params::SimParams;
use super::rect::Rect;
use super::state::{Ball, Side};
use crate::sign;

/// Keep the ball between the top and bottom walls.
///
/// Returns true if the ball bounced. Horizontal velocity is untouched.
pub fn resolve_wall_collision(ball: &mut Ball, height: f32) -> bool {
    let top = ball.radius;
    let bottom = height - ball.radius;

    if ball.pos.y < top {
        ball.pos.y = top;
        ball.vel.y = ball.vel.y.abs();
        return true;
    }
    if ball.pos.y > bottom {
        ball.pos.y = bottom;
        ball.vel.y = -ball.vel.y.abs();
        return true;
    }
    false
}

/// Whether the ball is heading toward the paddle on `side`
#[inline]
pub fn moving_toward(ball: &Ball, side: Side) -> bool {
    match side {
        Side::A => ball.vel.x < 0.0,
        Side::B => ball.vel.x > 0.0,
    }
}

/// Check ball/paddle overlap, only counting it while the ball approaches
pub fn ball_paddle_collision(ball: &Ball, paddle: &Rect, side: Side) -> bool {
    moving_toward(ball, side) && paddle.overlaps_circle(ball.pos, ball.radius)
}

/// Compute the post-hit velocity.
///
/// The horizontal component flips and grows by the paddle boost, never
/// falling under the horizontal floor. The vertical component is the
/// normalized contact offset times the max deflection speed. Total speed is
/// then capped.
pub fn paddle_bounce_velocity(vel: Vec2, contact_offset: f32, params: &SimParams) -> Vec2 {
    let mut vx = -vel.x * params.paddle_boost;
    if vx.abs() < params.min_speed_x {
        // A dead-stopped ball leaves in the direction it would have bounced
        let dir = if vel.x == 0.0 { 1.0 } else { -sign(vel.x) };
        vx = params.min_speed_x * dir;
    }
    let vy = contact_offset.clamp(-1.0, 1.0) * params.max_deflection_speed;

    let out = Vec2::new(vx, vy);
    let speed = out.length();
    if speed > params.max_speed {
        out * (params.max_speed / speed)
    } else {
        out
    }
}

/// Bounce the ball off a paddle it is known to overlap.
///
/// Returns the multiplier by which horizontal speed grew, for bookkeeping.
pub fn resolve_paddle_hit(ball: &mut Ball, paddle: &Rect, params: &SimParams) -> f32 {
    let before = ball.vel.x.abs();
    let contact = paddle.closest_point(ball.pos);
    let offset = paddle.normalized_offset(contact.y);

    ball.vel = paddle_bounce_velocity(ball.vel, offset, params);
    ball.pos.x += sign(ball.vel.x) * params.nudge;

    if before > 0.0 {
        ball.vel.x.abs() / before
    } else {
        1.0
    }
}

/// Which side, if any, the ball has scored on.
///
/// Returns the side that earns the point.
pub fn check_score(ball: &Ball, params: &SimParams) -> Option<Side> {
    if ball.pos.x < -params.score_margin {
        Some(Side::B)
    } else if ball.pos.x > params.width + params.score_margin {
        Some(Side::A)
    } else {
        None
    }
}
