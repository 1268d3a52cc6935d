//! CLI command implementations
//!
//! Commands return an exit code: 0 success, 1 conversion or submission
//! failures, 2 configuration error, 4 connection error, 5 fatal error.

pub mod convert;
pub mod init;
pub mod patients;
pub mod validate;

/// Everything succeeded
pub const EXIT_OK: i32 = 0;
/// Some messages failed to convert or were rejected
pub const EXIT_FAILURES: i32 = 1;
/// Configuration could not be loaded or is invalid
pub const EXIT_CONFIG: i32 = 2;
/// The FHIR server could not be reached
pub const EXIT_CONNECTION: i32 = 4;
/// Unexpected error
pub const EXIT_FATAL: i32 = 5;
