//! telematics-core - Vehicle state model for telematics clients
//!
//! This crate turns the flat attribute mapping a telematics backend reports
//! for a vehicle into typed properties (mileage, fuel, position, lid and lock
//! states). The transport is abstracted behind [`VehicleBackend`] so the HTTP
//! client can be swapped for an in-memory one in tests.

pub mod attributes;
pub mod backend;
pub mod error;
pub mod models;
pub mod state;

pub use attributes::AttributeMap;
pub use backend::VehicleBackend;
pub use error::{BackendError, BackendResult, StateError, StateResult};
pub use models::*;
pub use state::{LidIter, VehicleState, TIMESTAMP_FORMAT};
