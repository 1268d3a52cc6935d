//! Patient identifier synthesis
//!
//! The identifier value attached to a converted patient comes from a configurable
//! strategy. The default is a fixed placeholder value, which keeps mapping a pure
//! function of the message.

use crate::core::hl7::{address, Message};
use crate::domain::{BridgeError, ConversionError, Result};
use std::str::FromStr;

/// Default namespace URI for synthesized identifiers
pub const DEFAULT_IDENTIFIER_SYSTEM: &str = "urn:example:patient-identifier";

/// Default fixed identifier value
pub const DEFAULT_IDENTIFIER_VALUE: &str = "1111111111";

/// How the patient identifier value is produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierStrategy {
    /// Always the same configured value
    Fixed(String),
    /// The first patient identifier in the message (PID-3.1)
    Source,
    /// A random UUID per conversion; mapping is then no longer deterministic
    Uuid,
}

impl Default for IdentifierStrategy {
    fn default() -> Self {
        Self::Fixed(DEFAULT_IDENTIFIER_VALUE.to_string())
    }
}

/// Strategy names accepted in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierStrategyKind {
    Fixed,
    Source,
    Uuid,
}

impl FromStr for IdentifierStrategyKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "source" => Ok(Self::Source),
            "uuid" => Ok(Self::Uuid),
            _ => Err(BridgeError::Configuration(format!(
                "Invalid identifier strategy: {s}. Expected 'fixed', 'source' or 'uuid'"
            ))),
        }
    }
}

impl IdentifierStrategy {
    /// Builds a strategy from its configured name and fixed value
    pub fn from_config(strategy: &str, fixed_value: &str) -> Result<Self> {
        Ok(match IdentifierStrategyKind::from_str(strategy)? {
            IdentifierStrategyKind::Fixed => Self::Fixed(fixed_value.to_string()),
            IdentifierStrategyKind::Source => Self::Source,
            IdentifierStrategyKind::Uuid => Self::Uuid,
        })
    }

    /// Produces the identifier value for a message
    ///
    /// # Errors
    ///
    /// The source strategy fails with [`ConversionError::IncompleteSourceData`]
    /// when the message carries no patient identifier.
    pub fn synthesize(&self, message: &Message) -> std::result::Result<String, ConversionError> {
        match self {
            Self::Fixed(value) => Ok(value.clone()),
            Self::Source => message
                .value_at(address::PATIENT_IDENTIFIER)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ConversionError::IncompleteSourceData(format!(
                        "{} patient identifier is missing",
                        address::PATIENT_IDENTIFIER
                    ))
                }),
            Self::Uuid => Ok(uuid::Uuid::new_v4().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hl7::tokenize;

    #[test]
    fn test_fixed_strategy() {
        let message = tokenize("MSH|^~\\&\rPID|||999\r").unwrap();
        let value = IdentifierStrategy::default().synthesize(&message).unwrap();
        assert_eq!(value, "1111111111");
    }

    #[test]
    fn test_source_strategy_reads_pid_3() {
        let message = tokenize("MSH|^~\\&\rPID|||1111111111^^^NHS^NH\r").unwrap();
        let value = IdentifierStrategy::Source.synthesize(&message).unwrap();
        assert_eq!(value, "1111111111");
    }

    #[test]
    fn test_source_strategy_missing_identifier() {
        let message = tokenize("MSH|^~\\&\rPID||\r").unwrap();
        let result = IdentifierStrategy::Source.synthesize(&message);
        assert!(matches!(
            result,
            Err(ConversionError::IncompleteSourceData(_))
        ));
    }

    #[test]
    fn test_uuid_strategy_is_random() {
        let message = tokenize("MSH|^~\\&\r").unwrap();
        let first = IdentifierStrategy::Uuid.synthesize(&message).unwrap();
        let second = IdentifierStrategy::Uuid.synthesize(&message).unwrap();
        assert_ne!(first, second);
        assert!(uuid::Uuid::parse_str(&first).is_ok());
    }

    #[test]
    fn test_from_config() {
        assert_eq!(
            IdentifierStrategy::from_config("fixed", "42").unwrap(),
            IdentifierStrategy::Fixed("42".to_string())
        );
        assert_eq!(
            IdentifierStrategy::from_config("Source", "").unwrap(),
            IdentifierStrategy::Source
        );
        assert_eq!(
            IdentifierStrategy::from_config("uuid", "").unwrap(),
            IdentifierStrategy::Uuid
        );
        assert!(IdentifierStrategy::from_config("random", "").is_err());
    }
}
