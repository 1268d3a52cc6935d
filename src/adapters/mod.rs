//! External system integrations for hl7bridge.
//!
//! - [`fhir`] - FHIR server integration (posting resources, paged searches)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the submission
//! coordinator can be tested with in-memory implementations. The HTTP client is
//! built once and passed in explicitly:
//!
//! ```rust,no_run
//! use hl7bridge::adapters::fhir::{build_http_client, FhirServer, RestFhirServer};
//! use hl7bridge::config::FhirConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FhirConfig {
//!     base_url: "https://fhir.example.com/r4".to_string(),
//!     ..Default::default()
//! };
//!
//! let client = build_http_client(&config)?;
//! let server = RestFhirServer::new(client, &config)?;
//! let patients = server.search("Patient").await?;
//! println!("{} patients", patients.len());
//! # Ok(())
//! # }
//! ```

pub mod fhir;
