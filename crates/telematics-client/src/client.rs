//! Telematics backend HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use telematics_core::{AttributeMap, BackendResult, VehicleBackend};
use tracing::{debug, instrument};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{DynamicStateResponse, ErrorResponse};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a telematics backend
#[derive(Debug, Clone)]
pub struct TelematicsClient {
    client: Client,
    base_url: Url,
}

impl TelematicsClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the backend (e.g., "https://backend.example.com")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(base_url, DEFAULT_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    /// Create a new client with custom timeouts
    pub fn with_config(
        base_url: &str,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        Self::build(base_url, None, timeout, connect_timeout)
    }

    /// Create a new client that sends a bearer token with every request.
    ///
    /// The token is set as a default `Authorization: Bearer <token>` header.
    pub fn with_bearer_token(base_url: &str, token: &str) -> Result<Self> {
        Self::build(
            base_url,
            Some(token),
            DEFAULT_TIMEOUT,
            DEFAULT_CONNECT_TIMEOUT,
        )
    }

    /// Create a client from a loaded [`ClientConfig`]
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::build(
            &config.base_url,
            config.token.as_deref(),
            config.timeout(),
            config.connect_timeout(),
        )
    }

    fn build(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout);

        if let Some(token) = token {
            let mut headers = reqwest::header::HeaderMap::new();
            let header_value =
                reqwest::header::HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| ClientError::ParseError(format!("Invalid auth token: {}", e)))?;
            headers.insert(reqwest::header::AUTHORIZATION, header_value);
            builder = builder.default_headers(headers);
        }

        let client = builder.build()?;
        let base_url = Url::parse(base_url)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the dynamic state document (attributes and messages) of a vehicle
    #[instrument(skip(self))]
    pub async fn dynamic_state(&self, vin: &str) -> Result<DynamicStateResponse> {
        let url = self.vehicle_url("/api/vehicle/dynamic/v1/", vin)?;
        debug!("Fetching dynamic state from {}", url);

        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::VehicleNotFound(vin.to_string()));
        }
        self.handle_response(response).await
    }

    // =========================================================================
    // Helper Methods
    // =========================================================================

    /// Build `{base}{prefix}{vin}` with the VIN as a single escaped path segment
    fn vehicle_url(&self, prefix: &str, vin: &str) -> Result<Url> {
        if !is_valid_vin(vin) {
            return Err(ClientError::InvalidVin(vin.to_string()));
        }

        let mut url = self.base_url.join(prefix)?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .push(vin);
        Ok(url)
    }

    /// Handle response and parse JSON
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| ClientError::ParseError(e.to_string()))
        } else {
            Err(self.extract_error(response, status).await)
        }
    }

    async fn extract_error(&self, response: reqwest::Response, status: StatusCode) -> ClientError {
        // Try to parse error response body
        let message = match response.json::<ErrorResponse>().await {
            Ok(err) => err.error,
            Err(_) => format!("HTTP {}", status),
        };

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => ClientError::server_error(status.as_u16(), message),
        }
    }
}

/// VINs are plain alphanumeric identifiers; anything else would change the request path
fn is_valid_vin(vin: &str) -> bool {
    !vin.is_empty() && vin.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[async_trait]
impl VehicleBackend for TelematicsClient {
    async fn fetch_dynamic_state(&self, vin: &str) -> BackendResult<AttributeMap> {
        let response = self.dynamic_state(vin).await?;
        Ok(response.attributes_map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = TelematicsClient::new("http://localhost:9080");
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = TelematicsClient::new("not a valid url");
        assert!(matches!(client, Err(ClientError::InvalidUrl(_))));
    }

    #[test]
    fn test_invalid_token() {
        let client = TelematicsClient::with_bearer_token("http://localhost:9080", "bad\ntoken");
        assert!(matches!(client, Err(ClientError::ParseError(_))));
    }

    #[test]
    fn test_vehicle_url() {
        let client = TelematicsClient::new("http://localhost:9080/ignored/path").unwrap();
        let url = client
            .vehicle_url("/api/vehicle/dynamic/v1/", "WBA123")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9080/api/vehicle/dynamic/v1/WBA123"
        );
    }

    #[test]
    fn test_vehicle_url_rejects_path_tricks() {
        let client = TelematicsClient::new("http://localhost:9080").unwrap();
        for vin in ["", "../../admin", "WBA?x=1", "WBA#frag", "WBA/123", "WBA 123", "WBÄ123"] {
            let err = client
                .vehicle_url("/api/vehicle/dynamic/v1/", vin)
                .unwrap_err();
            assert!(matches!(err, ClientError::InvalidVin(_)), "accepted {:?}", vin);
        }
    }

    #[test]
    fn test_from_config() {
        let config = ClientConfig::new("http://localhost:9080").with_token("secret");
        let client = TelematicsClient::from_config(&config).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:9080/");
    }
}
