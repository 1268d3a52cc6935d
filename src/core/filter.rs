//! Age filtering over retrieved Patient resources
//!
//! Age is whole years elapsed computed as the day count divided by 365, floored.
//! The approximation drifts near leap years; listings depend on it, so it stays.

use crate::domain::{BridgeError, Result};
use chrono::NaiveDate;
use serde_json::Value;

/// Lower bound applied when none is given
pub const DEFAULT_MIN_AGE: i64 = 0;

/// Upper bound applied when none is given
pub const DEFAULT_MAX_AGE: i64 = 1000;

/// Inclusive age range in whole years
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    min_age: i64,
    max_age: i64,
}

impl Default for AgeRange {
    fn default() -> Self {
        Self {
            min_age: DEFAULT_MIN_AGE,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl AgeRange {
    /// Creates a range, rejecting inverted bounds
    pub fn new(min_age: i64, max_age: i64) -> Result<Self> {
        if min_age > max_age {
            return Err(BridgeError::Validation(format!(
                "min_age ({min_age}) must not exceed max_age ({max_age})"
            )));
        }
        Ok(Self { min_age, max_age })
    }

    /// Creates a range from optional bounds, defaulting each side
    pub fn from_bounds(min_age: Option<i64>, max_age: Option<i64>) -> Result<Self> {
        Self::new(
            min_age.unwrap_or(DEFAULT_MIN_AGE),
            max_age.unwrap_or(DEFAULT_MAX_AGE),
        )
    }

    pub fn min_age(&self) -> i64 {
        self.min_age
    }

    pub fn max_age(&self) -> i64 {
        self.max_age
    }

    /// Whether an age falls within the range, both ends inclusive
    pub fn contains(&self, age: i64) -> bool {
        self.min_age <= age && age <= self.max_age
    }
}

/// Whole years between `birth_date` and `today` as `floor(days / 365)`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use hl7bridge::core::filter::age_in_years;
///
/// let birth = NaiveDate::from_ymd_opt(1994, 6, 14).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// assert_eq!(age_in_years(birth, today), 30);
/// ```
pub fn age_in_years(birth_date: NaiveDate, today: NaiveDate) -> i64 {
    (today - birth_date).num_days().div_euclid(365)
}

/// Reads a full `YYYY-MM-DD` birth date from a Patient JSON resource
///
/// Partial FHIR dates (`1926` or `1926-05`) and missing values yield `None`.
pub fn resource_birth_date(resource: &Value) -> Option<NaiveDate> {
    let text = resource.get("birthDate")?.as_str()?;
    if text.len() != 10 {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Keeps the resources whose age on `today` lies within `range`
///
/// Resources without a full birth date are dropped.
pub fn filter_by_age<I>(resources: I, range: AgeRange, today: NaiveDate) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    resources
        .into_iter()
        .filter(|resource| {
            resource_birth_date(resource)
                .map(|birth_date| range.contains(age_in_years(birth_date, today)))
                .unwrap_or(false)
        })
        .collect()
}
