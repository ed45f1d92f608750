//! Deterministic match simulation module
//!
//! All gameplay physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod params;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{ball_paddle_collision, paddle_bounce_velocity, resolve_wall_collision};
pub use params::SimParams;
pub use rect::Rect;
pub use state::{
    Ball, BallSnapshot, Paddle, RngState, Side, SimEvent, SimPhase, SimSnapshot, SimulationState,
};
pub use tick::{TickInput, serve, tick};
