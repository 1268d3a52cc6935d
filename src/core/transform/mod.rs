//! HL7v2 to FHIR semantic mapping
//!
//! This module turns a tokenized HL7v2 message into a FHIR `Patient`:
//!
//! | Patient attribute | Source | Transform |
//! |---|---|---|
//! | `name[0].text` | PID-5 | raw text, verbatim |
//! | `name[0].use` | | `official` |
//! | `gender` | PID-8 | `M`→male, `F`→female, otherwise unknown |
//! | `birthDate` | PID-7.1 | `YYYYMMDD`; omitted when absent or empty |
//! | `identifier[0]` | | configured system + [`IdentifierStrategy`] value |

pub mod birth_date;
pub mod gender;
pub mod identifier;

pub use birth_date::{parse_birth_date, parse_hl7_date};
pub use gender::translate_gender;
pub use identifier::{
    IdentifierStrategy, DEFAULT_IDENTIFIER_SYSTEM, DEFAULT_IDENTIFIER_VALUE,
};

use crate::config::ConversionConfig;
use crate::core::hl7::{address, Message};
use crate::domain::{ConversionError, HumanName, Identifier, Patient, Result};

/// Maps tokenized messages to Patient resources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientMapper {
    identifier_system: String,
    identifier_strategy: IdentifierStrategy,
}

impl Default for PatientMapper {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER_SYSTEM, IdentifierStrategy::default())
    }
}

impl PatientMapper {
    /// Creates a mapper with an identifier namespace and synthesis strategy
    pub fn new(identifier_system: impl Into<String>, identifier_strategy: IdentifierStrategy) -> Self {
        Self {
            identifier_system: identifier_system.into(),
            identifier_strategy,
        }
    }

    /// Creates a mapper from the `[conversion]` configuration section
    pub fn from_config(config: &ConversionConfig) -> Result<Self> {
        let strategy =
            IdentifierStrategy::from_config(&config.identifier_strategy, &config.identifier_value)?;
        Ok(Self::new(config.identifier_system.clone(), strategy))
    }

    pub fn identifier_strategy(&self) -> &IdentifierStrategy {
        &self.identifier_strategy
    }

    /// Maps a message to a Patient
    ///
    /// Every attribute is filled best-effort; a missing PID segment yields a
    /// patient with unknown gender and the synthesized identifier only.
    ///
    /// # Errors
    ///
    /// - [`ConversionError::InvalidDate`] when PID-7.1 is present but malformed
    /// - [`ConversionError::IncompleteSourceData`] when the identifier strategy
    ///   needs a source field that is missing
    ///
    /// # Examples
    ///
    /// ```
    /// use hl7bridge::core::hl7::tokenize;
    /// use hl7bridge::core::transform::PatientMapper;
    ///
    /// let message = tokenize("MSH|^~\\&\rPID|||||Doe^Jane||19800131|F\r").unwrap();
    /// let patient = PatientMapper::default().map(&message).unwrap();
    /// assert_eq!(patient.name()[0].text, "Doe^Jane");
    /// ```
    pub fn map(&self, message: &Message) -> std::result::Result<Patient, ConversionError> {
        let name = message
            .value_at(address::PATIENT_NAME)
            .filter(|text| !text.is_empty())
            .map(HumanName::official);
        let gender = translate_gender(message.value_at(address::ADMINISTRATIVE_SEX));
        let birth_date = parse_birth_date(message.value_at(address::DATE_OF_BIRTH))?;
        let identifier = Identifier::new(
            self.identifier_system.clone(),
            self.identifier_strategy.synthesize(message)?,
        );

        let mut builder = Patient::builder()
            .gender(gender)
            .maybe_birth_date(birth_date)
            .identifier(identifier);
        if let Some(name) = name {
            builder = builder.name(name);
        }

        Ok(builder.build())
    }
}

/// Maps a message with the default identifier settings
pub fn map(message: &Message) -> std::result::Result<Patient, ConversionError> {
    PatientMapper::default().map(message)
}
