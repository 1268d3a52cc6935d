//! HL7v2 administrative sex to FHIR administrative gender

use crate::domain::AdministrativeGender;

/// Translates an HL7v2 administrative sex code (table 0001)
///
/// Total over its input: `M` and `F` map to male and female, every other code,
/// an empty value and an absent field all map to unknown.
pub fn translate_gender(code: Option<&str>) -> AdministrativeGender {
    match code {
        Some("M") => AdministrativeGender::Male,
        Some("F") => AdministrativeGender::Female,
        _ => AdministrativeGender::Unknown,
    }
}
