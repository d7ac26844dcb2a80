//! VehicleBackend trait - the capability a vehicle state refreshes through

use async_trait::async_trait;

use crate::attributes::AttributeMap;
use crate::error::BackendResult;

/// Source of raw vehicle telemetry.
///
/// Implementations perform whatever authenticated transport the backend
/// needs and hand back the flat attribute mapping for one vehicle. The HTTP
/// implementation lives in `telematics-client`; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait VehicleBackend: Send + Sync {
    /// Fetch the current dynamic state (doors, fuel, position, ...) of a vehicle
    async fn fetch_dynamic_state(&self, vin: &str) -> BackendResult<AttributeMap>;
}
