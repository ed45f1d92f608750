//! Match simulation state and core types
//!
//! Everything one rally-by-rally match needs lives in `SimulationState`.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::params::SimParams;
use super::rect::Rect;

/// Which end of the field (A plays on the left, B on the right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    /// Ball centered and still, waiting for a serve
    Waiting,
    /// Rally in progress
    Running,
    /// Someone reached the win score; terminal
    Finished,
}

/// Something notable that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    Served,
    WallBounce,
    PaddleHit { side: Side },
    Scored { side: Side },
    Won { side: Side },
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// A still ball at the center of the field
    pub fn centered(params: &SimParams) -> Self {
        Self {
            pos: Vec2::new(params.width / 2.0, params.height / 2.0),
            vel: Vec2::ZERO,
            radius: params.ball_radius,
        }
    }
}

/// A paddle; only the vertical position moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    /// Left face x (fixed per side)
    pub x: f32,
    /// Top edge y
    pub y: f32,
}

impl Paddle {
    /// Paddle vertically centered at the given x
    pub fn centered(x: f32, params: &SimParams) -> Self {
        Self {
            x,
            y: params.height / 2.0 - params.paddle_height / 2.0,
        }
    }

    pub fn rect(&self, params: &SimParams) -> Rect {
        Rect::new(self.x, self.y, params.paddle_width, params.paddle_height)
    }

    /// Move by `dir` (-1 up, 0 still, 1 down) for one tick, clamped to the field
    pub fn step(&mut self, dir: f32, dt: f32, params: &SimParams) {
        self.y = crate::clamp_range(
            self.y + dir * params.paddle_speed * dt,
            0.0,
            params.paddle_max_y(),
        );
    }
}

/// RNG state wrapper for serialization; each serve draws from its own stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Hand out a generator for the next stream and advance
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}

/// Complete match simulation state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    pub ball: Ball,
    pub paddle_a: Paddle,
    pub paddle_b: Paddle,
    pub score_a: u32,
    pub score_b: u32,
    /// Accumulated paddle boost for the current rally (1.0 at serve)
    pub speed_multiplier: f32,
    pub phase: SimPhase,
    /// Set once the match is decided
    pub winner: Option<Side>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Serve direction RNG
    pub rng_state: RngState,
    /// Set by a serve, reported by the next tick
    #[serde(default)]
    pub serve_pending: bool,
}

impl SimulationState {
    /// Fresh match: centered ball and paddles, zero score, waiting for serve
    pub fn new(params: &SimParams, seed: u64) -> Self {
        Self {
            ball: Ball::centered(params),
            paddle_a: Paddle::centered(params.paddle_a_x(), params),
            paddle_b: Paddle::centered(params.paddle_b_x(), params),
            score_a: 0,
            score_b: 0,
            speed_multiplier: 1.0,
            phase: SimPhase::Waiting,
            winner: None,
            time_ticks: 0,
            rng_state: RngState::new(seed),
            serve_pending: false,
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::A => self.score_a,
            Side::B => self.score_b,
        }
    }

    pub fn paddle(&self, side: Side) -> &Paddle {
        match side {
            Side::A => &self.paddle_a,
            Side::B => &self.paddle_b,
        }
    }

    /// Return the ball to center and wait for the next serve.
    /// Scores survive; the rally's speed boost does not.
    pub fn reset_ball(&mut self, params: &SimParams) {
        self.ball = Ball::centered(params);
        self.speed_multiplier = 1.0;
        if self.phase != SimPhase::Finished {
            self.phase = SimPhase::Waiting;
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SimPhase::Finished
    }

    /// Renderer-agnostic view of the current state
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            ball: BallSnapshot {
                x: self.ball.pos.x,
                y: self.ball.pos.y,
                vx: self.ball.vel.x,
                vy: self.ball.vel.y,
            },
            paddle_a: self.paddle_a.y,
            paddle_b: self.paddle_b.y,
            score_a: self.score_a,
            score_b: self.score_b,
            phase: self.phase,
        }
    }
}

/// Ball position and velocity as plain numbers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
}

/// Plain-data copy of a match for any kind of renderer (2D, 3D, headless)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub ball: BallSnapshot,
    /// Paddle top edges
    pub paddle_a: f32,
    pub paddle_b: f32,
    pub score_a: u32,
    pub score_b: u32,
    pub phase: SimPhase,
}
