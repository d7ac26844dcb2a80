//! Parking light models

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Which parking lights are switched on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParkingLightState {
    Left,
    Right,
    Both,
    Off,
}

impl ParkingLightState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParkingLightState::Left => "LEFT",
            ParkingLightState::Right => "RIGHT",
            ParkingLightState::Both => "BOTH",
            ParkingLightState::Off => "OFF",
        }
    }
}

impl std::fmt::Display for ParkingLightState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParkingLightState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LEFT" => Ok(ParkingLightState::Left),
            "RIGHT" => Ok(ParkingLightState::Right),
            "BOTH" => Ok(ParkingLightState::Both),
            "OFF" => Ok(ParkingLightState::Off),
            _ => Err(StateError::invalid(
                "ParkingLightState",
                format!("unknown parking light state '{}'", s),
            )),
        }
    }
}
