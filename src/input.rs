//! Paddle input state
//!
//! Holds the pressed state of the four paddle actions. The host flips bits on
//! key press/release; the simulation reads a `TickInput` copy once per tick,
//! so an edge only counts for ticks that start after it was recorded.

use serde::{Deserialize, Serialize};

use crate::sim::TickInput;

/// The four logical paddle actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    AUp,
    ADown,
    BUp,
    BDown,
}

impl InputAction {
    pub const ALL: [InputAction; 4] = [
        InputAction::AUp,
        InputAction::ADown,
        InputAction::BUp,
        InputAction::BDown,
    ];

    /// Default keyboard layout: W/S for the left paddle, arrows for the right
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(InputAction::BUp),
            "ArrowDown" => Some(InputAction::BDown),
            _ => match key.to_lowercase().as_str() {
                "w" => Some(InputAction::AUp),
                "s" => Some(InputAction::ADown),
                _ => None,
            },
        }
    }
}

/// Current pressed state of all paddle actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pressed: [bool; 4],
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    fn index(action: InputAction) -> usize {
        match action {
            InputAction::AUp => 0,
            InputAction::ADown => 1,
            InputAction::BUp => 2,
            InputAction::BDown => 3,
        }
    }

    pub fn set(&mut self, action: InputAction, pressed: bool) {
        self.pressed[Self::index(action)] = pressed;
    }

    pub fn press(&mut self, action: InputAction) {
        self.set(action, true);
    }

    pub fn release(&mut self, action: InputAction) {
        self.set(action, false);
    }

    pub fn is_pressed(&self, action: InputAction) -> bool {
        self.pressed[Self::index(action)]
    }

    /// Key-down edge by key name. Returns false for unbound keys.
    pub fn key_down(&mut self, key: &str) -> bool {
        match InputAction::from_key(key) {
            Some(action) => {
                self.press(action);
                true
            }
            None => false,
        }
    }

    /// Key-up edge by key name. Returns false for unbound keys.
    pub fn key_up(&mut self, key: &str) -> bool {
        match InputAction::from_key(key) {
            Some(action) => {
                self.release(action);
                true
            }
            None => false,
        }
    }

    /// Drop every held action (e.g. on window blur)
    pub fn clear(&mut self) {
        self.pressed = [false; 4];
    }

    /// Copy of the current state for one tick
    pub fn sample(&self) -> TickInput {
        TickInput {
            a_up: self.is_pressed(InputAction::AUp),
            a_down: self.is_pressed(InputAction::ADown),
            b_up: self.is_pressed(InputAction::BUp),
            b_down: self.is_pressed(InputAction::BDown),
        }
    }
}
