//! Domain error types
//!
//! This module defines the error hierarchy for hl7bridge. Conversion errors are
//! produced by the pure parse/map/serialize pipeline; transport errors come from
//! FHIR server adapters. Neither exposes third-party types.

use thiserror::Error;

/// Main hl7bridge error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// HL7v2 to FHIR conversion errors
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// FHIR server errors
    #[error("FHIR server error: {0}")]
    FhirServer(#[from] FhirServerError),

    /// Submission process errors
    #[error("Submission error: {0}")]
    Submission(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors raised while turning an HL7v2 message into a FHIR resource
///
/// The conversion core never retries and never logs; these values are returned
/// to the caller, which decides how to surface them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The message header could not be identified, so no delimiters are known
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// A date-shaped field does not match the expected calendar format
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// A resource attribute could not be rendered as JSON
    #[error("Attribute '{attribute}' cannot be serialized: {reason}")]
    UnserializableValue { attribute: String, reason: String },

    /// A source field required by the active mapping is missing
    #[error("Incomplete source data: {0}")]
    IncompleteSourceData(String),
}

impl ConversionError {
    /// Short machine-friendly name of the error kind, used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::MalformedMessage(_) => "malformed_message",
            ConversionError::InvalidDate { .. } => "invalid_date",
            ConversionError::UnserializableValue { .. } => "unserializable_value",
            ConversionError::IncompleteSourceData(_) => "incomplete_source_data",
        }
    }
}

/// FHIR server errors
///
/// Errors that occur when talking to a remote FHIR server.
/// These errors don't expose third-party HTTP client types.
#[derive(Debug, Error)]
pub enum FhirServerError {
    /// Failed to connect to the FHIR server
    #[error("Failed to connect to FHIR server: {0}")]
    ConnectionFailed(String),

    /// Invalid response from server
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Search request failed
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// Server error (5xx)
    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    /// Client error (4xx)
    #[error("Client error: {status} - {message}")]
    ClientError { status: u16, message: String },

    /// Timeout
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The connection broke after the request was sent; the server may have acted on it
    #[error("Request interrupted: {0}")]
    Interrupted(String),
}

impl FhirServerError {
    /// Whether repeating the request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FhirServerError::ConnectionFailed(_)
                | FhirServerError::Timeout(_)
                | FhirServerError::Interrupted(_)
                | FhirServerError::ServerError { .. }
        )
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        BridgeError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for BridgeError {
    fn from(err: toml::de::Error) -> Self {
        BridgeError::Configuration(format!("TOML parse error: {err}"))
    }
}
