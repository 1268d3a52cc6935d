//! Typed HL7v2 address table
//!
//! Every segment and field position the mapper reads is named here, so changing
//! a mapping source is a one-line edit.

use std::fmt;

/// Message header segment
pub const MSH: &str = "MSH";

/// Patient identification segment
pub const PID: &str = "PID";

/// Position of a field, or of one component within it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldAddress {
    pub segment: &'static str,
    pub field: usize,
    pub component: Option<usize>,
}

impl FieldAddress {
    /// Addresses a whole field
    pub const fn field(segment: &'static str, field: usize) -> Self {
        Self {
            segment,
            field,
            component: None,
        }
    }

    /// Addresses a component of a field
    pub const fn component(segment: &'static str, field: usize, component: usize) -> Self {
        Self {
            segment,
            field,
            component: Some(component),
        }
    }
}

impl fmt::Display for FieldAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.component {
            Some(component) => write!(f, "{}-{}.{}", self.segment, self.field, component),
            None => write!(f, "{}-{}", self.segment, self.field),
        }
    }
}

/// MSH-9 message type
pub const MESSAGE_TYPE: FieldAddress = FieldAddress::field(MSH, 9);

/// MSH-10 message control ID
pub const MESSAGE_CONTROL_ID: FieldAddress = FieldAddress::field(MSH, 10);

/// MSH-12 version ID
pub const VERSION_ID: FieldAddress = FieldAddress::field(MSH, 12);

/// PID-3.1 patient identifier (ID number of the first repetition)
pub const PATIENT_IDENTIFIER: FieldAddress = FieldAddress::component(PID, 3, 1);

/// PID-5 patient name
pub const PATIENT_NAME: FieldAddress = FieldAddress::field(PID, 5);

/// PID-7.1 date/time of birth
pub const DATE_OF_BIRTH: FieldAddress = FieldAddress::component(PID, 7, 1);

/// PID-8 administrative sex
pub const ADMINISTRATIVE_SEX: FieldAddress = FieldAddress::field(PID, 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_display() {
        assert_eq!(PATIENT_NAME.to_string(), "PID-5");
        assert_eq!(DATE_OF_BIRTH.to_string(), "PID-7.1");
        assert_eq!(MESSAGE_TYPE.to_string(), "MSH-9");
    }
}
