//! Tunable physics parameters
//!
//! Every magic number the simulation uses lives here so it can be loaded from
//! settings. Defaults come from `crate::consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Physics and rules tuning for one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    /// Playfield width (pixels)
    pub width: f32,
    /// Playfield height (pixels)
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Distance from the field edge to each paddle's outer face
    pub paddle_inset: f32,
    /// Paddle travel speed (pixels/s)
    pub paddle_speed: f32,
    pub ball_radius: f32,
    /// Serve velocity magnitudes; direction signs are random per serve
    pub serve_speed_x: f32,
    pub serve_speed_y: f32,
    /// Multiplier on horizontal speed for every paddle hit (> 1)
    pub paddle_boost: f32,
    /// Vertical speed produced by a hit on the paddle's very edge
    pub max_deflection_speed: f32,
    /// Horizontal speed never drops below this after a paddle hit
    pub min_speed_x: f32,
    /// Total ball speed cap
    pub max_speed: f32,
    /// Post-hit push along the new horizontal direction
    pub nudge: f32,
    /// Distance past the field edge that counts as a point
    pub score_margin: f32,
    /// Points needed to win
    pub win_score: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_inset: PADDLE_INSET,
            paddle_speed: PADDLE_SPEED,
            ball_radius: BALL_RADIUS,
            serve_speed_x: SERVE_SPEED_X,
            serve_speed_y: SERVE_SPEED_Y,
            paddle_boost: PADDLE_BOOST,
            max_deflection_speed: MAX_DEFLECTION_SPEED,
            min_speed_x: BALL_MIN_SPEED_X,
            max_speed: BALL_MAX_SPEED,
            nudge: PADDLE_NUDGE,
            score_margin: SCORE_MARGIN,
            win_score: WIN_SCORE,
        }
    }
}

impl SimParams {
    /// X coordinate of paddle A's left face
    #[inline]
    pub fn paddle_a_x(&self) -> f32 {
        self.paddle_inset
    }

    /// X coordinate of paddle B's left face
    #[inline]
    pub fn paddle_b_x(&self) -> f32 {
        self.width - self.paddle_inset - self.paddle_width
    }

    /// Highest allowed paddle top (paddles are clamped to `[0, this]`)
    #[inline]
    pub fn paddle_max_y(&self) -> f32 {
        (self.height - self.paddle_height).max(0.0)
    }

    /// Upper bound for the speed multiplier given the speed cap
    pub fn max_multiplier(&self) -> f32 {
        if self.serve_speed_x > 0.0 {
            (self.max_speed / self.serve_speed_x).max(1.0)
        } else {
            1.0
        }
    }

    /// Replace out-of-range values with defaults.
    ///
    /// Returns the names of any fields that were reset.
    pub fn sanitize(&mut self) -> Vec<&'static str> {
        let defaults = Self::default();
        let mut reset = Vec::new();

        let mut positive = |value: &mut f32, default: f32, name: &'static str| {
            if !(value.is_finite() && *value > 0.0) {
                *value = default;
                reset.push(name);
            }
        };
        positive(&mut self.width, defaults.width, "width");
        positive(&mut self.height, defaults.height, "height");
        positive(&mut self.paddle_width, defaults.paddle_width, "paddle_width");
        positive(&mut self.paddle_height, defaults.paddle_height, "paddle_height");
        positive(&mut self.paddle_speed, defaults.paddle_speed, "paddle_speed");
        positive(&mut self.ball_radius, defaults.ball_radius, "ball_radius");
        positive(&mut self.serve_speed_x, defaults.serve_speed_x, "serve_speed_x");
        positive(&mut self.max_speed, defaults.max_speed, "max_speed");
        positive(&mut self.min_speed_x, defaults.min_speed_x, "min_speed_x");
        positive(&mut self.score_margin, defaults.score_margin, "score_margin");

        if !(self.paddle_boost.is_finite() && self.paddle_boost > 1.0) {
            self.paddle_boost = defaults.paddle_boost;
            reset.push("paddle_boost");
        }
        if !(self.serve_speed_y.is_finite() && self.serve_speed_y >= 0.0) {
            self.serve_speed_y = defaults.serve_speed_y;
            reset.push("serve_speed_y");
        }
        if !(self.max_deflection_speed.is_finite() && self.max_deflection_speed >= 0.0) {
            self.max_deflection_speed = defaults.max_deflection_speed;
            reset.push("max_deflection_speed");
        }
        if !(self.paddle_inset.is_finite() && self.paddle_inset >= 0.0) {
            self.paddle_inset = defaults.paddle_inset;
            reset.push("paddle_inset");
        }
        if !(self.nudge.is_finite() && self.nudge >= 0.0) {
            self.nudge = defaults.nudge;
            reset.push("nudge");
        }
        if self.win_score == 0 {
            self.win_score = defaults.win_score;
            reset.push("win_score");
        }

        reset
    }
}
