//! Error types for telematics client operations

use telematics_core::BackendError;
use thiserror::Error;

/// Result type alias for telematics client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur during telematics client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Server returned an error response
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Credentials missing, expired or rejected (401 or 403)
    #[error("Unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// VIN cannot be used as a path segment
    #[error("Invalid VIN: {0:?}")]
    InvalidVin(String),

    /// The backend does not know the requested vehicle
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create a server error from status code and message
    pub fn server_error(status: u16, message: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }
}

impl From<ClientError> for BackendError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::HttpError(e) => BackendError::Transport(e.to_string()),
            ClientError::InvalidUrl(e) => BackendError::Transport(e.to_string()),
            ClientError::IoError(e) => BackendError::Transport(e.to_string()),
            ClientError::ServerError { status, message } => {
                BackendError::Status { status, message }
            }
            ClientError::Unauthorized { status, message } => {
                BackendError::Unauthorized { status, message }
            }
            ClientError::InvalidVin(vin) => {
                BackendError::InvalidRequest(format!("Invalid VIN: {:?}", vin))
            }
            ClientError::VehicleNotFound(vin) => BackendError::Status {
                status: 404,
                message: format!("Vehicle not found: {}", vin),
            },
            ClientError::ParseError(message) => BackendError::Protocol(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_backend_error() {
        let err: BackendError = ClientError::server_error(502, "bad gateway").into();
        assert_eq!(err.status_code(), Some(502));

        let err: BackendError = ClientError::Unauthorized {
            status: 403,
            message: "forbidden".into(),
        }
        .into();
        assert!(matches!(err, BackendError::Unauthorized { status: 403, .. }));

        let err: BackendError = ClientError::InvalidVin("../admin".into()).into();
        assert!(matches!(err, BackendError::InvalidRequest(_)));
        assert_eq!(err.status_code(), None);

        let err: BackendError = ClientError::ParseError("missing attributesMap".into()).into();
        assert!(matches!(err, BackendError::Protocol(_)));

        let err: BackendError = ClientError::VehicleNotFound("WBA123".into()).into();
        assert_eq!(err.status_code(), Some(404));
    }
}
