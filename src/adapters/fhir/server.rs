//! FHIR server trait definition
//!
//! This module defines the `FhirServer` trait that abstracts the remote FHIR
//! store: posting converted resources and listing stored ones. The submission
//! coordinator depends only on this trait, so tests can swap in an in-memory
//! server.

use crate::domain::FhirServerError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Outcome of posting a resource
///
/// A server that answers, whatever the status, yields a `SubmissionStatus`.
/// Only failures to get an answer at all are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionStatus {
    /// Whether the server accepted the resource (2xx)
    pub success: bool,

    /// HTTP status code
    pub status_code: u16,

    /// `Location` of the created resource, if returned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Server diagnostics for rejected resources
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmissionStatus {
    pub fn accepted(status_code: u16, location: Option<String>) -> Self {
        Self {
            success: true,
            status_code,
            location,
            message: None,
        }
    }

    pub fn rejected(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status_code,
            location: None,
            message: Some(message.into()),
        }
    }
}

/// Trait for FHIR server implementations
///
/// # Example
///
/// ```no_run
/// use hl7bridge::adapters::fhir::{build_http_client, FhirServer, RestFhirServer};
/// use hl7bridge::config::FhirConfig;
///
/// # async fn example() -> hl7bridge::domain::Result<()> {
/// let config = FhirConfig::default();
/// let client = build_http_client(&config)?;
/// let server = RestFhirServer::new(client, &config)?;
///
/// let status = server
///     .submit("Patient", r#"{"resourceType":"Patient"}"#)
///     .await?;
/// println!("HTTP {}", status.status_code);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FhirServer: Send + Sync {
    /// Posts a serialized resource to `{base_url}/{resource_type}`
    ///
    /// # Errors
    ///
    /// Returns an error only when no HTTP response was obtained.
    async fn submit(
        &self,
        resource_type: &str,
        body: &str,
    ) -> Result<SubmissionStatus, FhirServerError>;

    /// Lists stored resources of a type, following Bundle paging
    ///
    /// # Errors
    ///
    /// Returns an error if any page cannot be fetched or parsed.
    async fn search(&self, resource_type: &str) -> Result<Vec<Value>, FhirServerError>;

    /// Checks that the server answers its capability statement
    async fn health_check(&self) -> Result<(), FhirServerError>;

    /// Get the base URL of the FHIR server
    fn base_url(&self) -> &str;
}
