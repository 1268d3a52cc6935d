//! Submission summary and reporting
//!
//! This module defines structures for tracking and reporting batch results.

use crate::domain::{ConversionError, FhirServerError};
use serde::Serialize;
use std::time::Duration;

/// Information about a resource the server accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedResource {
    /// Where the message came from (file path or label)
    pub source: String,

    /// `MSH-10` of the source message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_id: Option<String>,

    /// HTTP status returned by the server
    pub status_code: u16,

    /// `Location` of the created resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Summary of a conversion and submission run
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionSummary {
    /// Total number of messages processed
    pub total_messages: usize,

    /// Messages converted to FHIR resources
    pub converted: usize,

    /// Messages that failed to convert
    pub conversion_failures: usize,

    /// Resources accepted by the server
    pub submitted: usize,

    /// Resources the server answered with a non-2xx status
    pub rejected: usize,

    /// Resources that never reached the server
    pub transport_failures: usize,

    /// Resources not posted because of dry-run mode
    pub dry_run_skipped: usize,

    /// Duration of the run
    #[serde(with = "duration_millis")]
    pub duration: Duration,

    /// Errors encountered during the run
    pub errors: Vec<SubmissionError>,

    /// Resources the server accepted
    pub submitted_resources: Vec<SubmittedResource>,
}

impl SubmissionSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self {
            total_messages: 0,
            converted: 0,
            conversion_failures: 0,
            submitted: 0,
            rejected: 0,
            transport_failures: 0,
            dry_run_skipped: 0,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            submitted_resources: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add an error
    pub fn add_error(&mut self, error: SubmissionError) {
        self.errors.push(error);
    }

    /// Record an accepted resource
    pub fn add_submitted_resource(&mut self, resource: SubmittedResource) {
        self.submitted_resources.push(resource);
    }

    /// Whether every message converted and every attempted post was accepted
    pub fn is_successful(&self) -> bool {
        self.conversion_failures == 0
            && self.rejected == 0
            && self.transport_failures == 0
            && self.errors.is_empty()
    }

    /// Whether any post failed for lack of a server response
    pub fn has_transport_failures(&self) -> bool {
        self.transport_failures > 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_messages == 0 {
            return 100.0;
        }
        let failures = self.conversion_failures + self.rejected + self.transport_failures;
        let succeeded = self.total_messages.saturating_sub(failures);
        (succeeded as f64 / self.total_messages as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_messages = self.total_messages,
            converted = self.converted,
            conversion_failures = self.conversion_failures,
            submitted = self.submitted,
            rejected = self.rejected,
            transport_failures = self.transport_failures,
            dry_run_skipped = self.dry_run_skipped,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Run completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Run completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    source = %error.source,
                    message = %error.message,
                    "Submission error"
                );
            }
        }
    }
}

impl Default for SubmissionSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Type of submission error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionErrorType {
    /// The message could not be converted
    Conversion,
    /// No response from the FHIR server
    Connection,
    /// The FHIR server refused the resource
    Rejected,
}

/// Submission error with the message it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionError {
    /// Type of error
    pub error_type: SubmissionErrorType,

    /// Message source (file path or label)
    pub source: String,

    /// Error message
    pub message: String,

    /// Conversion error kind or HTTP status, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl SubmissionError {
    /// Create a new submission error
    pub fn new(error_type: SubmissionErrorType, source: impl Into<String>, message: String) -> Self {
        Self {
            error_type,
            source: source.into(),
            message,
            detail: None,
        }
    }

    /// Add detail to the error
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn conversion(source: &str, error: &ConversionError) -> Self {
        Self::new(SubmissionErrorType::Conversion, source, error.to_string()).with_detail(error.kind())
    }

    pub fn connection(source: &str, error: &FhirServerError) -> Self {
        Self::new(SubmissionErrorType::Connection, source, error.to_string())
    }

    pub fn rejected(source: &str, status_code: u16, message: Option<&str>) -> Self {
        Self::new(
            SubmissionErrorType::Rejected,
            source,
            message.unwrap_or("resource rejected").to_string(),
        )
        .with_detail(status_code.to_string())
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
