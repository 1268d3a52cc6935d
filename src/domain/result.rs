//! Result type alias for hl7bridge
//!
//! This module provides a convenient Result type alias that uses BridgeError
//! as the error type.

use super::errors::BridgeError;

/// Result type alias for hl7bridge operations
///
/// # Examples
///
/// ```
/// use hl7bridge::domain::result::Result;
/// use hl7bridge::domain::errors::BridgeError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(BridgeError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::{BridgeError, ConversionError};

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(BridgeError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> std::result::Result<i32, ConversionError> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
