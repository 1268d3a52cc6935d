//! HTTP client construction and server factory
//!
//! The `reqwest::Client` is built once by the caller and handed to the adapter,
//! so connection pools are shared and nothing is global.

use super::rest::RestFhirServer;
use super::server::FhirServer;
use crate::config::FhirConfig;
use crate::domain::{BridgeError, Result};
use reqwest::{Client, ClientBuilder};
use std::sync::Arc;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Builds the HTTP client used for every FHIR request
///
/// # Errors
///
/// Returns [`BridgeError::Configuration`] if the TLS backend cannot be set up.
pub fn build_http_client(config: &FhirConfig) -> Result<Client> {
    let mut builder = ClientBuilder::new()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .connect_timeout(Duration::from_secs(
            CONNECT_TIMEOUT_SECS.min(config.timeout_seconds),
        ))
        .user_agent(concat!("hl7bridge/", env!("CARGO_PKG_VERSION")));

    if !config.tls_verify {
        tracing::warn!(
            base_url = %config.base_url,
            "TLS certificate verification is disabled"
        );
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder
        .build()
        .map_err(|e| BridgeError::Configuration(format!("Failed to build HTTP client: {e}")))
}

/// Creates the FHIR server adapter for a configuration
///
/// # Example
///
/// ```no_run
/// use hl7bridge::adapters::fhir::connect;
/// use hl7bridge::config::FhirConfig;
///
/// # async fn example() -> hl7bridge::domain::Result<()> {
/// let server = connect(&FhirConfig::default())?;
/// server.health_check().await?;
/// # Ok(())
/// # }
/// ```
pub fn connect(config: &FhirConfig) -> Result<Arc<dyn FhirServer>> {
    let client = build_http_client(config)?;
    let server = RestFhirServer::new(client, config)?;
    Ok(Arc::new(server))
}

/// Runs a health check and logs its outcome
pub async fn check_connection(server: &dyn FhirServer) -> Result<()> {
    match server.health_check().await {
        Ok(()) => {
            tracing::info!(base_url = server.base_url(), "FHIR server health check passed");
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                base_url = server.base_url(),
                error = %e,
                "FHIR server health check failed"
            );
            Err(e.into())
        }
    }
}
