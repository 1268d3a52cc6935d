//! Domain models and types for hl7bridge.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **The target resource** ([`Patient`] and its attribute types)
//! - **Error types** ([`BridgeError`], [`ConversionError`], [`FhirServerError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Application-level fallible operations return [`Result<T, BridgeError>`]; the
//! pure conversion pipeline returns [`ConversionError`], which converts into
//! [`BridgeError`] with the `?` operator:
//!
//! ```rust
//! use hl7bridge::domain::Result;
//!
//! fn example(raw: &str) -> Result<()> {
//!     let patient = hl7bridge::core::convert::convert(raw)?;
//!     println!("{}", patient.gender());
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod patient;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BridgeError, ConversionError, FhirServerError};
pub use patient::{
    AdministrativeGender, HumanName, Identifier, NameUse, Patient, PatientBuilder,
    PATIENT_RESOURCE_TYPE,
};
pub use result::Result;
