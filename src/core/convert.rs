//! Conversion boundary
//!
//! [`convert`] is the input boundary of the conversion core: raw HL7v2 text in,
//! `Patient` out. [`Converter`] bundles a configured mapper and serializer for
//! callers that also need the rendered JSON.

use crate::config::ConversionConfig;
use crate::core::hl7::tokenize;
use crate::core::serialize::ResourceSerializer;
use crate::core::transform::PatientMapper;
use crate::domain::{ConversionError, Patient, Result};

/// A converted message ready for handoff to a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedResource {
    /// The mapped resource
    pub patient: Patient,

    /// Serialized FHIR JSON
    pub body: String,

    /// `MSH-10` of the source message, when present
    pub control_id: Option<String>,

    /// `MSH-9` of the source message, when present
    pub message_type: Option<String>,
}

/// Parse, map and serialize pipeline
#[derive(Debug, Clone, Default)]
pub struct Converter {
    mapper: PatientMapper,
    serializer: ResourceSerializer,
}

impl Converter {
    pub fn new(mapper: PatientMapper, serializer: ResourceSerializer) -> Self {
        Self { mapper, serializer }
    }

    /// Creates a converter from the `[conversion]` configuration section
    pub fn from_config(config: &ConversionConfig) -> Result<Self> {
        Ok(Self::new(
            PatientMapper::from_config(config)?,
            ResourceSerializer::new(config.pretty),
        ))
    }

    /// Converts a raw message into a Patient
    pub fn convert(&self, raw: &str) -> std::result::Result<Patient, ConversionError> {
        let message = tokenize(raw)?;
        self.mapper.map(&message)
    }

    /// Converts a raw message and renders the result
    pub fn convert_to_json(
        &self,
        raw: &str,
    ) -> std::result::Result<ConvertedResource, ConversionError> {
        let message = tokenize(raw)?;
        let patient = self.mapper.map(&message)?;
        let body = self.serializer.serialize(&patient)?;

        Ok(ConvertedResource {
            patient,
            body,
            control_id: message.control_id().map(str::to_string),
            message_type: message.message_type().map(str::to_string),
        })
    }
}

/// Converts a raw HL7v2 message into a Patient with default settings
///
/// # Examples
///
/// ```
/// use hl7bridge::core::convert::convert;
/// use hl7bridge::domain::AdministrativeGender;
///
/// let raw = "MSH|^~\\&|App\rPID|||1111111111^^^NHS^NH||Langworth^^Shaun^^Sir||19260508|M\r";
/// let patient = convert(raw).unwrap();
/// assert_eq!(patient.gender(), AdministrativeGender::Male);
/// ```
pub fn convert(raw: &str) -> std::result::Result<Patient, ConversionError> {
    Converter::default().convert(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_to_json_carries_header_metadata() {
        let raw = "MSH|^~\\&|App|Fac|Recv|RecvFac|20160102101112||ADT^A01|CTRL42|P|2.5\rPID|||1||Doe^John||19700101|M\r";
        let converted = Converter::default().convert_to_json(raw).unwrap();

        assert_eq!(converted.control_id.as_deref(), Some("CTRL42"));
        assert_eq!(converted.message_type.as_deref(), Some("ADT^A01"));
        assert!(converted.body.contains("\"birthDate\": \"1970-01-01\""));
    }

    #[test]
    fn test_convert_surfaces_malformed_message() {
        let result = convert("hello world");
        assert!(matches!(result, Err(ConversionError::MalformedMessage(_))));
    }

    #[test]
    fn test_convert_never_masks_failures() {
        let result = convert("MSH|^~\\&\rPID|||||Doe||notadate\r");
        assert!(matches!(result, Err(ConversionError::InvalidDate { .. })));
    }

    #[test]
    fn test_converter_from_config_compact() {
        let config = ConversionConfig {
            pretty: false,
            ..Default::default()
        };
        let converter = Converter::from_config(&config).unwrap();
        let converted = converter.convert_to_json("MSH|^~\\&\r").unwrap();
        assert!(!converted.body.contains('\n'));
    }
}
