//! Result type alias for SecurePaste

use super::errors::SecurePasteError;

/// Result type alias for SecurePaste operations
///
/// # Examples
///
/// ```
/// use securepaste::domain::result::Result;
/// use securepaste::domain::errors::SecurePasteError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SecurePasteError::DetectionFailure("detector crashed".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SecurePasteError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ValidationError;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> std::result::Result<i32, ValidationError> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ValidationError::MissingEntities.into());
        assert!(result.is_err());
    }
}
