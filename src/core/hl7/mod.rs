//! HL7v2 parsing
//!
//! - [`delimiters`] - delimiter grammar declared by the `MSH` header
//! - [`message`] - message model, tokenizer and field extractor
//! - [`address`] - named segment/field positions used by the mapper

pub mod address;
pub mod delimiters;
pub mod message;

pub use address::FieldAddress;
pub use delimiters::Delimiters;
pub use message::{tokenize, Field, Message, Segment};
