//! Core business logic for hl7bridge.
//!
//! # Modules
//!
//! - [`hl7`] - Delimiter grammar, message model and typed field addresses
//! - [`transform`] - HL7v2 to FHIR `Patient` mapping
//! - [`serialize`] - Canonical FHIR JSON rendering
//! - [`convert`] - The raw-text conversion boundary
//! - [`filter`] - Age filtering over retrieved resources
//! - [`submit`] - Batch conversion and submission to a FHIR server
//!
//! # Conversion Pipeline
//!
//! 1. **Tokenize**: detect delimiters from the `MSH` header and split the text
//!    into segments, fields, repetitions and components
//! 2. **Map**: read PID fields through the address table and build a `Patient`
//! 3. **Serialize**: render the resource as FHIR JSON with a stable key order
//!
//! The pipeline is synchronous and holds no shared state; every call parses
//! its own message.
//!
//! # Example
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
//! let json = serialize(&patient)?;
//!
//! assert!(json.contains("\"birthDate\": \"1926-05-08\""));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod convert;
pub mod filter;
pub mod hl7;
pub mod serialize;
pub mod submit;
pub mod transform;
