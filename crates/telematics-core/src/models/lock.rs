//! Central locking models

use serde::{Deserialize, Serialize};

use crate::error::StateError;

/// Central locking state of the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LockState {
    #[serde(rename = "LOCKED")]
    Locked,
    /// Locked with the anti-theft system armed
    #[serde(rename = "SECURED")]
    Secured,
    /// Only some doors locked
    #[serde(rename = "SELECTIVELOCKED")]
    SelectiveLocked,
    #[serde(rename = "UNLOCKED")]
    Unlocked,
}

impl LockState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Locked => "LOCKED",
            LockState::Secured => "SECURED",
            LockState::SelectiveLocked => "SELECTIVELOCKED",
            LockState::Unlocked => "UNLOCKED",
        }
    }

    /// Whether every door is locked
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked | LockState::Secured)
    }
}

impl std::fmt::Display for LockState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LockState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCKED" => Ok(LockState::Locked),
            "SECURED" => Ok(LockState::Secured),
            "SELECTIVELOCKED" => Ok(LockState::SelectiveLocked),
            "UNLOCKED" => Ok(LockState::Unlocked),
            _ => Err(StateError::invalid(
                "LockState",
                format!("unknown lock state '{}'", s),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_lock_semantics() {
        assert_eq!("SECURED".parse::<LockState>().unwrap(), LockState::Secured);
        assert_eq!(
            "SELECTIVELOCKED".parse::<LockState>().unwrap(),
            LockState::SelectiveLocked
        );
        assert!(LockState::Secured.is_locked());
        assert!(!LockState::SelectiveLocked.is_locked());
        assert!("OPEN".parse::<LockState>().is_err());
    }
}
