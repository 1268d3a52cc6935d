//! Configuration management for hl7bridge.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! hl7bridge uses a TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `HL7BRIDGE_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hl7bridge::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hl7bridge.toml")?;
//!
//! println!("FHIR server: {}", config.fhir.base_url);
//! println!("Identifier strategy: {}", config.conversion.identifier_strategy);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`FhirConfig`] - FHIR server connection, authentication, retries and paging
//! - [`ConversionConfig`] - Identifier synthesis and JSON layout
//! - [`SubmitConfig`] - Submission concurrency
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "development"
//!
//! [application]
//! log_level = "info"
//!
//! [fhir]
//! base_url = "https://hapi.fhir.org/baseR4/"
//! auth_type = "bearer"
//! token = "${FHIR_TOKEN}"
//!
//! [conversion]
//! identifier_strategy = "source"
//! identifier_system = "https://fhir.nhs.uk/Id/nhs-number"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_str};
pub use schema::{
    ApplicationConfig, BridgeConfig, ConversionConfig, Environment, FhirConfig, LoggingConfig,
    RetryConfig, SearchConfig, SubmitConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
