//! Configuration schema types
//!
//! Every section and field has a default, so an empty file is a valid
//! configuration.

use crate::anonymization::detector::DetectorPolicy;
use crate::anonymization::models::MaskAnchor;
use crate::anonymization::resolver::{
    MaskDefaults, OperatorDefaults, DEFAULT_MASK_CHAR, DEFAULT_MASK_COUNT, REDACTION_MARKER,
};
use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main SecurePaste configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurePasteConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Detection and rewrite settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Key for the `encrypt` operator
    #[serde(default)]
    pub encryption: EncryptionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Audit log configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl SecurePasteConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.engine.validate()?;
        self.encryption.validate()?;
        self.logging.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Marker for `replace` without a custom replacement and for the implicit `DEFAULT`
    #[serde(default = "default_replacement")]
    pub default_replacement: String,

    /// Behaviour when the semantic detector is unavailable
    #[serde(default)]
    pub detector_policy: DetectorPolicy,

    /// Pattern library for the built-in semantic detector (embedded library if unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_library: Option<PathBuf>,

    /// Mask operator parameters
    #[serde(default)]
    pub mask: MaskConfig,
}

impl EngineConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref path) = self.pattern_library {
            if path.as_os_str().is_empty() {
                return Err("engine.pattern_library cannot be empty".to_string());
            }
        }
        self.mask.validate()
    }

    /// Operator parameters derived from this section
    pub fn operator_defaults(&self) -> OperatorDefaults {
        OperatorDefaults {
            replacement: self.default_replacement.clone(),
            mask: MaskDefaults {
                mask_char: self.mask.masking_char,
                count: self.mask.chars_to_mask,
                anchor: if self.mask.from_end {
                    MaskAnchor::End
                } else {
                    MaskAnchor::Start
                },
            },
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_replacement: default_replacement(),
            detector_policy: DetectorPolicy::default(),
            pattern_library: None,
            mask: MaskConfig::default(),
        }
    }
}

/// Mask operator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Character written over masked characters
    #[serde(default = "default_masking_char")]
    pub masking_char: char,

    /// Number of characters to mask
    #[serde(default = "default_chars_to_mask")]
    pub chars_to_mask: usize,

    /// Mask the trailing characters instead of the leading ones
    #[serde(default)]
    pub from_end: bool,
}

impl MaskConfig {
    fn validate(&self) -> Result<(), String> {
        if self.chars_to_mask == 0 {
            return Err("engine.mask.chars_to_mask must be > 0".to_string());
        }
        if self.masking_char.is_control() {
            return Err("engine.mask.masking_char cannot be a control character".to_string());
        }
        Ok(())
    }
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            masking_char: default_masking_char(),
            chars_to_mask: default_chars_to_mask(),
            from_end: false,
        }
    }
}

/// Encryption configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EncryptionConfig {
    /// Base64-encoded 32-byte AES key
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<SecretString>,
}

impl EncryptionConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if let Some(ref key) = self.key {
            let key = key.expose_secret();
            if key.is_blank() {
                return Err("encryption.key cannot be empty".to_string());
            }
            if key.is_placeholder() {
                return Err(
                    "encryption.key references an unset environment variable".to_string(),
                );
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

/// Audit log configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Append one entry per successful request
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// JSON lines instead of plain text
    #[serde(default = "default_true")]
    pub json_format: bool,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err("audit.log_path cannot be empty when audit is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: true,
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_replacement() -> String {
    REDACTION_MARKER.to_string()
}

fn default_masking_char() -> char {
    DEFAULT_MASK_CHAR
}

fn default_chars_to_mask() -> usize {
    DEFAULT_MASK_COUNT
}

fn default_true() -> bool {
    true
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}
