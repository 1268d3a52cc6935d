//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output
//! - JSON-formatted log files with rotation
//! - `RUST_LOG` overrides of the configured level
//!
//! The conversion core never logs; adapters, the coordinator and the CLI do.
//!
//! # Example
//!
//! ```no_run
//! use hl7bridge::logging::init_logging;
//! use hl7bridge::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use hl7bridge::log_error_with_context;
/// use hl7bridge::domain::BridgeError;
///
/// let error = BridgeError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use hl7bridge::log_retry_attempt;
///
/// log_retry_attempt!(2, 3, "Connection refused");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($attempt:expr, $max_retries:expr, $reason:expr) => {
        tracing::warn!(
            attempt = $attempt,
            max_retries = $max_retries,
            reason = %$reason,
            "Retrying request"
        );
    };
}

/// Log the server's answer to a posted resource
///
/// # Example
///
/// ```no_run
/// use hl7bridge::log_submission_result;
/// use hl7bridge::adapters::fhir::SubmissionStatus;
///
/// let status = SubmissionStatus::accepted(201, None);
/// log_submission_result!("adt_a01.hl7", &status);
/// ```
#[macro_export]
macro_rules! log_submission_result {
    ($source:expr, $status:expr) => {
        if $status.success {
            tracing::info!(
                source = %$source,
                status = $status.status_code,
                location = ?$status.location,
                "Resource submitted"
            );
        } else {
            tracing::warn!(
                source = %$source,
                status = $status.status_code,
                message = ?$status.message,
                "Resource rejected by server"
            );
        }
    };
}
