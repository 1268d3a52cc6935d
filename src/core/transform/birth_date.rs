//! HL7v2 date of birth parsing

use crate::domain::ConversionError;
use chrono::NaiveDate;

/// Parses the date-of-birth source value
///
/// Returns `Ok(None)` when the value is absent or empty, so the birth date is
/// omitted rather than defaulted.
///
/// # Errors
///
/// Returns [`ConversionError::InvalidDate`] for any other value that is not an
/// 8-digit `YYYYMMDD` calendar date.
pub fn parse_birth_date(value: Option<&str>) -> Result<Option<NaiveDate>, ConversionError> {
    match value {
        None | Some("") => Ok(None),
        Some(value) => parse_hl7_date(value).map(Some),
    }
}

/// Parses a strict `YYYYMMDD` date
pub fn parse_hl7_date(value: &str) -> Result<NaiveDate, ConversionError> {
    let invalid = |reason: &str| ConversionError::InvalidDate {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("expected 8 digits in YYYYMMDD format"));
    }

    let year: i32 = value[0..4].parse().map_err(|_| invalid("invalid year"))?;
    let month: u32 = value[4..6].parse().map_err(|_| invalid("invalid month"))?;
    let day: u32 = value[6..8].parse().map_err(|_| invalid("invalid day"))?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| invalid("not a valid calendar date"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_parse_valid_date() {
        assert_eq!(
            parse_birth_date(Some("19260508")).unwrap(),
            NaiveDate::from_ymd_opt(1926, 5, 8)
        );
    }

    #[test]
    fn test_parse_leap_day() {
        assert_eq!(
            parse_hl7_date("20000229").unwrap(),
            NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()
        );
    }

    #[test]
    fn test_absent_or_empty_is_omitted() {
        assert_eq!(parse_birth_date(None).unwrap(), None);
        assert_eq!(parse_birth_date(Some("")).unwrap(), None);
    }

    #[test_case("19260532" ; "day out of range")]
    #[test_case("19261301" ; "month out of range")]
    #[test_case("19010229" ; "not a leap year")]
    #[test_case("1926058" ; "too short")]
    #[test_case("192605081200" ; "timestamp precision")]
    #[test_case("1926-05-08" ; "iso format")]
    #[test_case("abcdefgh" ; "letters")]
    #[test_case(" 9260508" ; "leading space")]
    fn test_invalid_dates(value: &str) {
        let result = parse_birth_date(Some(value));
        match result {
            Err(ConversionError::InvalidDate { value: v, .. }) => assert_eq!(v, value),
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }
}
