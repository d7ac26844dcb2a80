//! Error types for vehicle state access and backend fetches

use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Result type for state accessors
pub type StateResult<T> = Result<T, StateError>;

/// I/O-level failures reported by a [`VehicleBackend`](crate::VehicleBackend)
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend could not be reached (DNS, connect, TLS, timeout)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Backend answered with a non-success status
    #[error("Backend returned status {status}: {message}")]
    Status { status: u16, message: String },

    /// Credentials were rejected (401 or 403)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// The request was rejected before being sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Response body did not have the expected shape
    #[error("Protocol error: {0}")]
    Protocol(String),
}

impl BackendError {
    /// Returns the HTTP status code for this error, if the backend produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BackendError::Status { status, .. } | BackendError::Unauthorized { status, .. } => {
                Some(*status)
            }
            BackendError::Transport(_)
            | BackendError::Protocol(_)
            | BackendError::InvalidRequest(_) => None,
        }
    }
}

/// Validation failures raised when a state accessor is read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// No attribute mapping has been loaded yet
    #[error("No vehicle data loaded, call refresh() first")]
    NotLoaded,

    /// The mapping does not contain the requested key
    #[error("Attribute missing: {0}")]
    MissingAttribute(String),

    /// The key is present but its value cannot be interpreted
    #[error("Invalid value for attribute {key}: {reason}")]
    InvalidAttribute { key: String, reason: String },
}

impl StateError {
    /// Create an invalid-attribute error
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        let err = BackendError::Status {
            status: 503,
            message: "maintenance".into(),
        };
        assert_eq!(err.status_code(), Some(503));
        let err = BackendError::Unauthorized {
            status: 403,
            message: "forbidden".into(),
        };
        assert_eq!(err.status_code(), Some(403));
        assert_eq!(BackendError::Transport("refused".into()).status_code(), None);
    }

    #[test]
    fn test_invalid_display() {
        let err = StateError::invalid("mileage", "not a number");
        assert_eq!(
            err.to_string(),
            "Invalid value for attribute mileage: not a number"
        );
    }
}
