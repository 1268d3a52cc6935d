//! Patient resource domain model
//!
//! A plain value type holding the demographic subset of the FHIR R4 `Patient`
//! resource that hl7bridge produces: name, administrative gender, birth date and
//! identifiers. Only the attributes the conversion fills are represented.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FHIR resource type name of [`Patient`]
pub const PATIENT_RESOURCE_TYPE: &str = "Patient";

/// Administrative gender value set (`http://hl7.org/fhir/administrative-gender`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdministrativeGender {
    Male,
    Female,
    Other,
    #[default]
    Unknown,
}

impl AdministrativeGender {
    /// Returns the FHIR code
    pub fn as_str(&self) -> &'static str {
        match self {
            AdministrativeGender::Male => "male",
            AdministrativeGender::Female => "female",
            AdministrativeGender::Other => "other",
            AdministrativeGender::Unknown => "unknown",
        }
    }
}

impl fmt::Display for AdministrativeGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdministrativeGender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!(
                "Invalid administrative gender '{s}'. Expected male, female, other or unknown"
            )),
        }
    }
}

/// Name use code (`http://hl7.org/fhir/name-use`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameUse {
    Usual,
    Official,
    Temp,
    Nickname,
    Anonymous,
    Old,
    Maiden,
}

/// A human name with its use code and display text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    /// Purpose of this name
    #[serde(rename = "use")]
    pub name_use: NameUse,

    /// Full name as it should be displayed
    pub text: String,
}

impl HumanName {
    /// Creates an official name
    pub fn official(text: impl Into<String>) -> Self {
        Self {
            name_use: NameUse::Official,
            text: text.into(),
        }
    }
}

/// An identifier scoped by the URI of the system that issued it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    /// Namespace URI of the identifier value
    pub system: String,

    /// The identifier value, unique within `system`
    pub value: String,
}

impl Identifier {
    /// Creates a new identifier
    pub fn new(system: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            value: value.into(),
        }
    }
}

/// Patient demographics resource
///
/// Built once by the mapper (or [`PatientBuilder`]) and read-only afterwards.
///
/// # Examples
///
/// ```
/// use hl7bridge::domain::patient::{AdministrativeGender, HumanName, Identifier, Patient};
/// use chrono::NaiveDate;
///
/// let patient = Patient::builder()
///     .name(HumanName::official("Langworth^^Shaun^^Sir"))
///     .gender(AdministrativeGender::Male)
///     .birth_date(NaiveDate::from_ymd_opt(1926, 5, 8).unwrap())
///     .identifier(Identifier::new("urn:example:patient-identifier", "1111111111"))
///     .build();
///
/// assert_eq!(patient.gender(), AdministrativeGender::Male);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patient {
    name: Vec<HumanName>,
    gender: AdministrativeGender,
    birth_date: Option<NaiveDate>,
    identifier: Vec<Identifier>,
}

impl Patient {
    /// Creates a new builder for constructing a Patient
    pub fn builder() -> PatientBuilder {
        PatientBuilder::default()
    }

    /// FHIR resource type name
    pub fn resource_type(&self) -> &'static str {
        PATIENT_RESOURCE_TYPE
    }

    pub fn name(&self) -> &[HumanName] {
        &self.name
    }

    pub fn gender(&self) -> AdministrativeGender {
        self.gender
    }

    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.birth_date
    }

    pub fn identifier(&self) -> &[Identifier] {
        &self.identifier
    }
}

/// Builder for constructing Patient instances
#[derive(Debug, Default)]
pub struct PatientBuilder {
    name: Vec<HumanName>,
    gender: AdministrativeGender,
    birth_date: Option<NaiveDate>,
    identifier: Vec<Identifier>,
}

impl PatientBuilder {
    /// Creates a new PatientBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a name
    pub fn name(mut self, name: HumanName) -> Self {
        self.name.push(name);
        self
    }

    /// Sets the administrative gender (defaults to unknown)
    pub fn gender(mut self, gender: AdministrativeGender) -> Self {
        self.gender = gender;
        self
    }

    /// Sets the birth date
    pub fn birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Sets or clears the birth date
    pub fn maybe_birth_date(mut self, birth_date: Option<NaiveDate>) -> Self {
        self.birth_date = birth_date;
        self
    }

    /// Appends an identifier
    pub fn identifier(mut self, identifier: Identifier) -> Self {
        self.identifier.push(identifier);
        self
    }

    /// Builds the Patient
    pub fn build(self) -> Patient {
        Patient {
            name: self.name,
            gender: self.gender,
            birth_date: self.birth_date,
            identifier: self.identifier,
        }
    }
}
