//! Lid (door, hood, trunk, window) models

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Keys of the closable body elements reported by the backend
pub const LID_KEYS: &[&str] = &[
    "door_driver_front",
    "door_driver_rear",
    "door_passenger_front",
    "door_passenger_rear",
    "hood_state",
    "trunk_state",
];

/// Keys of the windows (including the sunroof) reported by the backend
pub const WINDOW_KEYS: &[&str] = &[
    "window_driver_front",
    "window_driver_rear",
    "window_passenger_front",
    "window_passenger_rear",
    "sunroof_state",
];

/// Closure state of a door, hood, trunk or window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LidState {
    Closed,
    Open,
    /// Partially open (windows, sunroof)
    Intermediate,
    /// Sensor reports no usable value
    Invalid,
}

impl LidState {
    /// Wire representation used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            LidState::Closed => "CLOSED",
            LidState::Open => "OPEN",
            LidState::Intermediate => "INTERMEDIATE",
            LidState::Invalid => "INVALID",
        }
    }
}

impl std::fmt::Display for LidState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LidState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLOSED" => Ok(LidState::Closed),
            "OPEN" => Ok(LidState::Open),
            "INTERMEDIATE" => Ok(LidState::Intermediate),
            "INVALID" => Ok(LidState::Invalid),
            _ => Err(StateError::invalid(
                "LidState",
                format!("unknown lid state '{}'", s),
            )),
        }
    }
}

/// A named closable element and its state.
///
/// Computed on demand from the attribute mapping, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lid {
    /// Backend key of the element (e.g. `door_driver_front`)
    pub name: &'static str,
    /// Current closure state
    pub state: LidState,
}

impl Lid {
    pub fn new(name: &'static str, state: LidState) -> Self {
        Self { name, state }
    }

    /// Anything other than fully closed counts as open
    pub fn is_closed(&self) -> bool {
        self.state == LidState::Closed
    }
}

/// Windows share the lid representation
pub type Window = Lid;
