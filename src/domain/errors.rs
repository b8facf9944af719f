//! Domain error types
//!
//! This module defines the error hierarchy for SecurePaste. Configuration problems
//! are caught by the request validator and never reach detection; runtime problems
//! are split between an unavailable semantic detector and failures while detecting
//! or transforming spans. None of these types expose third-party error types.

use thiserror::Error;

/// Main SecurePaste error type
#[derive(Debug, Error)]
pub enum SecurePasteError {
    /// The anonymization request failed validation
    #[error("Configuration error: {0}")]
    Configuration(#[from] ValidationError),

    /// Engine settings (TOML file, environment overrides) are invalid
    #[error("Settings error: {0}")]
    Settings(String),

    /// The semantic entity detector could not be initialized
    #[error("Semantic detector unavailable: {0}")]
    DetectorUnavailable(String),

    /// A detector failed while scanning the text
    #[error("Detection failed: {0}")]
    DetectionFailure(String),

    /// An operator could not transform a span (e.g. encryption failure)
    #[error("Operator failed: {0}")]
    Operator(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl SecurePasteError {
    /// Check whether this error was raised by request validation
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Request validation errors
///
/// The validator is fail-fast: only the first problem found is reported.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// `entities` is absent or not a list
    #[error("Invalid config: missing 'entities' list.")]
    MissingEntities,

    /// An entity entry has an empty `type`
    #[error("Invalid config: entities[{index}] has an empty 'type'")]
    EmptyEntityType { index: usize },

    /// A custom pattern is missing a required field
    #[error("Invalid config: custom_patterns[{index}] is missing '{field}'")]
    MissingPatternField { index: usize, field: &'static str },

    /// A custom pattern regex does not compile
    #[error("Invalid regex in custom pattern '{name}': {message}")]
    InvalidRegex { name: String, message: String },

    /// A rule score is outside `[0.1, 1.0]`
    #[error("Invalid confidence_score {value} for custom pattern '{name}': must be between 0.1 and 1.0")]
    ScoreOutOfRange { name: String, value: f32 },

    /// The request threshold is outside `[0.0, 1.0]`
    #[error("Invalid confidence_threshold {0}: must be between 0.0 and 1.0")]
    ThresholdOutOfRange(f32),

    /// The request language is an empty string
    #[error("Invalid config: 'language' must not be empty")]
    EmptyLanguage,

    /// An unknown `anonymization_method`
    #[error("Invalid anonymization_method '{method}' for {context}: must be one of redact, replace, mask, hash, encrypt")]
    InvalidOperator { context: String, method: String },

    /// The request is not valid JSON or has the wrong shape
    #[error("Invalid config: {0}")]
    Malformed(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SecurePasteError {
    fn from(err: std::io::Error) -> Self {
        SecurePasteError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SecurePasteError {
    fn from(err: serde_json::Error) -> Self {
        SecurePasteError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SecurePasteError {
    fn from(err: toml::de::Error) -> Self {
        SecurePasteError::Settings(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SecurePasteError::DetectionFailure("backtrack limit exceeded".to_string());
        assert_eq!(err.to_string(), "Detection failed: backtrack limit exceeded");
    }

    #[test]
    fn test_validation_error_conversion() {
        let err: SecurePasteError = ValidationError::MissingEntities.into();
        assert!(err.is_configuration());
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid config: missing 'entities' list."
        );
    }

    #[test]
    fn test_invalid_operator_message() {
        let err = ValidationError::InvalidOperator {
            context: "entity 'EMAIL_ADDRESS'".to_string(),
            method: "scramble".to_string(),
        };
        assert!(err.to_string().contains("'scramble'"));
        assert!(err.to_string().contains("redact, replace, mask, hash, encrypt"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SecurePasteError = io_err.into();
        assert!(matches!(err, SecurePasteError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: SecurePasteError = json_err.into();
        assert!(matches!(err, SecurePasteError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: SecurePasteError = toml_err.into();
        assert!(matches!(err, SecurePasteError::Settings(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = SecurePasteError::Operator("Test error".to_string());
        let _: &dyn std::error::Error = &err;
        let _: &dyn std::error::Error = &ValidationError::EmptyLanguage;
    }
}
