//! Request and response types for the telematics backend

use serde::{Deserialize, Serialize};
use telematics_core::AttributeMap;

/// Response of the dynamic vehicle state endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DynamicStateResponse {
    /// Flat attribute mapping for the vehicle
    #[serde(rename = "attributesMap")]
    pub attributes_map: AttributeMap,
    /// Check-control and service messages
    #[serde(default, rename = "vehicleMessages")]
    pub vehicle_messages: Option<VehicleMessages>,
}

/// Messages the vehicle reports alongside its state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleMessages {
    /// Check-control messages (warning lights)
    #[serde(default, rename = "ccmMessages")]
    pub ccm_messages: Vec<serde_json::Value>,
    /// Condition-based service messages
    #[serde(default, rename = "cbsMessages")]
    pub cbs_messages: Vec<serde_json::Value>,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(alias = "message", alias = "error_description")]
    pub error: String,
}
