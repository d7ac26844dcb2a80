//! High-voltage battery charging models

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Charging state of the high-voltage battery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargingState {
    #[serde(rename = "CHARGINGACTIVE")]
    ChargingActive,
    #[serde(rename = "CHARGINGENDED")]
    ChargingEnded,
    #[serde(rename = "CHARGINGPAUSED")]
    ChargingPaused,
    #[serde(rename = "CHARGINGERROR")]
    ChargingError,
    #[serde(rename = "FINISHED_FULLY_CHARGED")]
    ChargingFinished,
    #[serde(rename = "NOCHARGING")]
    NoCharging,
    /// Vehicles without a high-voltage battery report this
    #[serde(rename = "INVALID")]
    Invalid,
}

impl ChargingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargingState::ChargingActive => "CHARGINGACTIVE",
            ChargingState::ChargingEnded => "CHARGINGENDED",
            ChargingState::ChargingPaused => "CHARGINGPAUSED",
            ChargingState::ChargingError => "CHARGINGERROR",
            ChargingState::ChargingFinished => "FINISHED_FULLY_CHARGED",
            ChargingState::NoCharging => "NOCHARGING",
            ChargingState::Invalid => "INVALID",
        }
    }

    pub fn is_charging(&self) -> bool {
        *self == ChargingState::ChargingActive
    }
}

impl std::fmt::Display for ChargingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChargingState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CHARGINGACTIVE" => Ok(ChargingState::ChargingActive),
            "CHARGINGENDED" => Ok(ChargingState::ChargingEnded),
            "CHARGINGPAUSED" => Ok(ChargingState::ChargingPaused),
            "CHARGINGERROR" => Ok(ChargingState::ChargingError),
            "FINISHED_FULLY_CHARGED" => Ok(ChargingState::ChargingFinished),
            "NOCHARGING" => Ok(ChargingState::NoCharging),
            "INVALID" => Ok(ChargingState::Invalid),
            _ => Err(StateError::invalid(
                "ChargingState",
                format!("unknown charging state '{}'", s),
            )),
        }
    }
}
