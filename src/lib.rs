// hl7bridge - HL7v2 to FHIR Patient Converter
// Copyright (c) 2025 hl7bridge Contributors
// Licensed under the MIT License

//! # hl7bridge - HL7v2 to FHIR Patient Converter
//!
//! hl7bridge reads pipe-delimited HL7v2 messages, maps their patient
//! demographics onto a FHIR R4 `Patient` resource and renders canonical FHIR
//! JSON. Converted resources can be posted to a FHIR server, and patients
//! already stored there can be retrieved and filtered by age.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Tokenizer, mapper, serializer, age filter and submission
//! - [`adapters`] - FHIR REST transport
//! - [`domain`] - The `Patient` resource and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! The conversion core is synchronous and pure: no I/O, no logging, no retries.
//! Everything that talks to a network lives in [`adapters`].
//!
//! ## Quick Start
//!
//! ```rust
//! use hl7bridge::core::convert::convert;
//! use hl7bridge::core::serialize::serialize;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let raw = "MSH|^~\\&|SendingApp|SendingFacility|HL7API|PKB|20160102101112||ADT^A01|ABC0000000001|P|2.5\r\
//!            PID|||1111111111^^^NHS^NH||Langworth^^Shaun^^Sir||19260508|M\r";
//!
//! let patient = convert(raw)?;
//! println!("{}", serialize(&patient)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Submitting Resources
//!
//! ```rust,no_run
//! use hl7bridge::adapters::fhir::connect;
//! use hl7bridge::config::load_config;
//! use hl7bridge::core::submit::{SourceMessage, SubmissionCoordinator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("hl7bridge.toml")?;
//! let server = connect(&config.fhir)?;
//! let coordinator = SubmissionCoordinator::from_config(&config, Some(server))?;
//!
//! let report = coordinator
//!     .execute(vec![SourceMessage::new("adt.hl7", std::fs::read_to_string("adt.hl7")?)])
//!     .await;
//!
//! println!("Submitted {} resources", report.summary.submitted);
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Conversion returns [`domain::ConversionError`]; transports return
//! [`domain::FhirServerError`]. Both convert into [`domain::BridgeError`]
//! with the `?` operator.
//!
//! ## Logging
//!
//! Adapters and the coordinator log with the `tracing` crate; see
//! [`logging::init_logging`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
