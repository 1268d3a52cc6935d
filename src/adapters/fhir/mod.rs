//! FHIR server integration
//!
//! - [`server`] - the [`FhirServer`] trait and [`SubmissionStatus`]
//! - [`rest`] - REST implementation over a shared `reqwest::Client`
//! - [`client`] - HTTP client construction and the server factory
//! - [`models`] - Bundle and OperationOutcome wire types

pub mod client;
pub mod models;
pub mod rest;
pub mod server;

pub use client::{build_http_client, check_connection, connect};
pub use models::{Bundle, BundleEntry, BundleLink, OperationOutcome};
pub use rest::{FhirAuth, RestFhirServer};
pub use server::{FhirServer, SubmissionStatus};
