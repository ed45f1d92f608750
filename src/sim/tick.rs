//! Fixed timestep simulation tick
//!
//! Advances one match deterministically. Every tick takes the same `dt` and
//! samples input exactly once.

use glam::Vec2;
use rand::Rng;

use super::collision::{
    ball_paddle_collision, check_score, resolve_paddle_hit, resolve_wall_collision,
};
use super::params::SimParams;
use super::state::{SimEvent, SimPhase, SimulationState, Side};

/// Paddle intent for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub a_up: bool,
    pub a_down: bool,
    pub b_up: bool,
    pub b_down: bool,
}

impl TickInput {
    /// Movement direction for a side: -1 up, 1 down, 0 when both or neither
    pub fn direction(&self, side: Side) -> f32 {
        let (up, down) = match side {
            Side::A => (self.a_up, self.a_down),
            Side::B => (self.b_up, self.b_down),
        };
        (down as i8 - up as i8) as f32
    }
}

/// Launch the ball from the center. Only valid while waiting.
///
/// Returns true if a serve happened.
pub fn serve(state: &mut SimulationState, params: &SimParams) -> bool {
    if state.phase != SimPhase::Waiting {
        return false;
    }

    let mut rng = state.rng_state.next_rng();
    let dir_x = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let dir_y = if rng.random_bool(0.5) { 1.0 } else { -1.0 };

    state.ball.pos = Vec2::new(params.width / 2.0, params.height / 2.0);
    state.ball.vel = Vec2::new(params.serve_speed_x * dir_x, params.serve_speed_y * dir_y);
    state.speed_multiplier = 1.0;
    state.phase = SimPhase::Running;
    state.serve_pending = true;
    true
}

/// Advance the match by one fixed timestep
pub fn tick(
    state: &mut SimulationState,
    input: &TickInput,
    params: &SimParams,
    dt: f32,
) -> Vec<SimEvent> {
    let mut events = Vec::new();

    if state.phase != SimPhase::Running {
        return events;
    }

    state.time_ticks += 1;
    if std::mem::take(&mut state.serve_pending) {
        events.push(SimEvent::Served);
    }

    // Paddles
    state.paddle_a.step(input.direction(Side::A), dt, params);
    state.paddle_b.step(input.direction(Side::B), dt, params);

    // Ball
    state.ball.pos += state.ball.vel * dt;

    if resolve_wall_collision(&mut state.ball, params.height) {
        events.push(SimEvent::WallBounce);
    }

    for side in [Side::A, Side::B] {
        let rect = state.paddle(side).rect(params);
        if ball_paddle_collision(&state.ball, &rect, side) {
            let boost = resolve_paddle_hit(&mut state.ball, &rect, params);
            state.speed_multiplier =
                (state.speed_multiplier * boost.max(1.0)).min(params.max_multiplier());
            log::trace!(
                "paddle {:?} hit, vel=({:.1}, {:.1}) x{:.2}",
                side,
                state.ball.vel.x,
                state.ball.vel.y,
                state.speed_multiplier
            );
            events.push(SimEvent::PaddleHit { side });
            // The ball now moves away from this paddle and cannot reach the other
            break;
        }
    }

    if let Some(scorer) = check_score(&state.ball, params) {
        match scorer {
            Side::A => state.score_a += 1,
            Side::B => state.score_b += 1,
        }
        log::debug!(
            "{:?} scores ({} - {})",
            scorer,
            state.score_a,
            state.score_b
        );
        events.push(SimEvent::Scored { side: scorer });

        state.reset_ball(params);

        if state.score(scorer) >= params.win_score {
            state.phase = SimPhase::Finished;
            state.winner = Some(scorer);
            events.push(SimEvent::Won { side: scorer });
        }
    }

    events
}
