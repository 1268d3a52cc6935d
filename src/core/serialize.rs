//! Canonical FHIR JSON rendering
//!
//! Resources are rendered attribute by attribute so that a value the JSON format
//! cannot carry is reported by attribute name. Keys appear in declaration order:
//! `resourceType`, `name`, `gender`, `birthDate`, `identifier`. Unset optional
//! attributes and empty lists are left out entirely, never written as `null`.

use crate::domain::{ConversionError, Patient};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};

/// Content type of serialized resources
pub const FHIR_JSON_CONTENT_TYPE: &str = "application/fhir+json";

/// Renders resources as FHIR JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSerializer {
    pretty: bool,
}

impl Default for ResourceSerializer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl ResourceSerializer {
    /// Creates a serializer; `pretty` selects 2-space indented output
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes a patient to JSON text
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::UnserializableValue`] naming the attribute that
    /// cannot be rendered.
    pub fn serialize(&self, patient: &Patient) -> Result<String, ConversionError> {
        let document = to_json(patient)?;
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&document)
        } else {
            serde_json::to_string(&document)
        };

        rendered.map_err(|e| ConversionError::UnserializableValue {
            attribute: patient.resource_type().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Serializes a patient to indented JSON text
///
/// # Examples
///
/// ```
/// use hl7bridge::core::serialize::serialize;
/// use hl7bridge::domain::{AdministrativeGender, Patient};
///
/// let patient = Patient::builder().gender(AdministrativeGender::Female).build();
/// let json = serialize(&patient).unwrap();
/// assert!(json.contains("\"gender\": \"female\""));
/// assert!(!json.contains("birthDate"));
/// ```
pub fn serialize(patient: &Patient) -> Result<String, ConversionError> {
    ResourceSerializer::default().serialize(patient)
}

/// Builds the canonical JSON document of a patient
pub fn to_json(patient: &Patient) -> Result<Value, ConversionError> {
    let mut document = Map::new();
    document.insert(
        "resourceType".to_string(),
        Value::String(patient.resource_type().to_string()),
    );

    if !patient.name().is_empty() {
        document.insert("name".to_string(), render_attribute("name", patient.name())?);
    }

    document.insert(
        "gender".to_string(),
        render_attribute("gender", &patient.gender())?,
    );

    if let Some(birth_date) = patient.birth_date() {
        document.insert(
            "birthDate".to_string(),
            Value::String(format_fhir_date("birthDate", birth_date)?),
        );
    }

    if !patient.identifier().is_empty() {
        document.insert(
            "identifier".to_string(),
            render_attribute("identifier", patient.identifier())?,
        );
    }

    Ok(Value::Object(document))
}

/// Renders one attribute value, naming it on failure
pub fn render_attribute<T>(attribute: &str, value: &T) -> Result<Value, ConversionError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(value).map_err(|e| ConversionError::UnserializableValue {
        attribute: attribute.to_string(),
        reason: e.to_string(),
    })
}

/// Formats a calendar date as an ISO-8601 FHIR `date`
///
/// FHIR dates carry a four-digit year between 0001 and 9999; other years have no
/// representation.
pub fn format_fhir_date(attribute: &str, date: NaiveDate) -> Result<String, ConversionError> {
    if !(1..=9999).contains(&date.year()) {
        return Err(ConversionError::UnserializableValue {
            attribute: attribute.to_string(),
            reason: format!("year {} is outside the FHIR date range 0001-9999", date.year()),
        });
    }

    Ok(date.format("%Y-%m-%d").to_string())
}
