//! Telematics Client Library
//!
//! HTTP implementation of [`VehicleBackend`] for a connected-vehicle
//! telematics backend, plus re-exports of the vehicle state model.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use telematics_client::{TelematicsClient, VehicleState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = TelematicsClient::with_bearer_token("https://backend.example.com", "token")?;
//!
//!     let mut state = VehicleState::new(Arc::new(client), "WBAJC51070G123456");
//!     state.refresh().await?;
//!
//!     println!("{} {}", state.mileage()?, state.unit_of_length()?);
//!     println!("locked: {}", state.door_lock_state()?.is_locked());
//!     println!("all closed: {}", state.all_lids_closed()? && state.all_windows_closed()?);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! The `testing` module runs an in-process stand-in for the backend:
//!
//! ```rust,ignore
//! use telematics_client::testing::{dynamic_state_router, TestServer};
//!
//! let server = TestServer::start(dynamic_state_router("WBA123", body)).await?;
//! let response = server.client.dynamic_state("WBA123").await?;
//! ```

mod client;
pub mod config;
mod error;
pub mod testing;
mod types;

pub use client::TelematicsClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use types::*;

// Re-export core types for convenience
pub use telematics_core::{
    AttributeMap, BackendError, LidState, LockState, StateError, VehicleBackend, VehicleState,
};
