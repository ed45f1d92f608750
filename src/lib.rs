//! Bracket Pong - an eight-player Pong knockout tournament
//!
//! Core modules:
//! - `sim`: Deterministic match simulation (physics, collisions, scoring)
//! - `tournament`: Bracket graph, entrants, matches and the scheduler
//! - `fixed_loop`: Fixed-timestep driver decoupled from frame delivery
//! - `input`: Paddle input state sampled once per tick
//! - `platform`: Host frame-scheduling abstraction
//! - `settings`: Data-driven configuration

pub mod fixed_loop;
pub mod input;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tournament;

pub use fixed_loop::{FixedLoop, FrameStats};
pub use input::{InputAction, InputState};
pub use settings::{ControlMode, Settings};
pub use tournament::{Tournament, TournamentError, TournamentStatus};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;

    /// Playfield dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 500.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 12.0;
    pub const PADDLE_HEIGHT: f32 = 90.0;
    /// Gap between the field edge and the paddle's outer face
    pub const PADDLE_INSET: f32 = 20.0;
    /// Paddle travel speed (pixels/s)
    pub const PADDLE_SPEED: f32 = 320.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Serve velocity components (pixels/s), signs picked per serve
    pub const SERVE_SPEED_X: f32 = 360.0;
    pub const SERVE_SPEED_Y: f32 = 60.0;
    /// Horizontal speed floor after a paddle hit
    pub const BALL_MIN_SPEED_X: f32 = 240.0;
    /// Maximum ball speed
    pub const BALL_MAX_SPEED: f32 = 800.0;

    /// Horizontal speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_BOOST: f32 = 1.15;
    /// Vertical speed at the very edge of a paddle
    pub const MAX_DEFLECTION_SPEED: f32 = 240.0;
    /// Push applied along the new direction after a paddle hit
    pub const PADDLE_NUDGE: f32 = 2.0;

    /// How far past the field edge the ball must travel to score
    pub const SCORE_MARGIN: f32 = 30.0;
    /// First side to this many points wins the match
    pub const WIN_SCORE: u32 = 5;

    /// Entrants in a standard bracket
    pub const BRACKET_SIZE: usize = 8;
}

/// Clamp a value into `[min, max]`, tolerating `min > max` by pinning to `min`
#[inline]
pub fn clamp_range(value: f32, min: f32, max: f32) -> f32 {
    value.min(max).max(min)
}

/// Sign of `v` as -1.0 or 1.0 (zero counts as positive)
#[inline]
pub fn sign(v: f32) -> f32 {
    if v < 0.0 { -1.0 } else { 1.0 }
}
