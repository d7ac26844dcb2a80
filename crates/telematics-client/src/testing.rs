//! Test utilities for telematics-client
//!
//! Provides an in-process HTTP server standing in for the telematics backend.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::{Result, TelematicsClient};

/// A test server that automatically shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: TelematicsClient,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Start serving an axum Router on an ephemeral port
    ///
    /// # Example
    ///
    /// ```ignore
    /// use telematics_client::testing::{dynamic_state_router, TestServer};
    ///
    /// let server = TestServer::start(dynamic_state_router("WBA123", body)).await?;
    /// let state = server.client.dynamic_state("WBA123").await?;
    /// ```
    pub async fn start(router: Router) -> Result<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    /// Start a test server with custom client timeouts
    pub async fn start_with_timeout(
        router: Router,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> Result<Self> {
        // Bind to any available port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        let base_url = format!("http://{}", addr);
        let client = TelematicsClient::with_config(&base_url, timeout, connect_timeout)?;

        Ok(Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Get the base URL of the test server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Shutdown the server gracefully
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Router serving `body` on the dynamic state endpoint of one vehicle.
///
/// Requests for any other VIN get a 404.
pub fn dynamic_state_router(vin: impl Into<String>, body: serde_json::Value) -> Router {
    let vin = vin.into();
    Router::new().route(
        "/api/vehicle/dynamic/v1/{vin}",
        get(move |Path(requested): Path<String>| {
            let vin = vin.clone();
            let body = body.clone();
            async move {
                if requested == vin {
                    Ok(Json(body))
                } else {
                    Err(StatusCode::NOT_FOUND)
                }
            }
        }),
    )
}

/// Bind and immediately release a port, returning a URL nothing listens on
pub async fn unreachable_url() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{}", addr))
}
