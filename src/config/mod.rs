//! Engine settings for SecurePaste.
//!
//! Settings are distinct from the per-request JSON configuration: they fix the
//! operator parameters, the semantic detector policy, the encryption key, and
//! the logging and audit sinks for the lifetime of an engine.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use securepaste::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("securepaste.toml")?;
//! println!("Detector policy: {}", config.engine.detector_policy);
//! # Ok(())
//! # }
//! ```
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [engine]
//! default_replacement = "[REDACTED]"
//! detector_policy = "fail"
//!
//! [engine.mask]
//! masking_char = "*"
//! chars_to_mask = 7
//!
//! [encryption]
//! key = "${SECUREPASTE_ENCRYPTION_KEY}"
//! ```
//!
//! `${VAR_NAME}` placeholders are substituted from the environment before
//! parsing, and `SECUREPASTE_<SECTION>_<KEY>` variables override parsed values.

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, AuditConfig, EncryptionConfig, EngineConfig, LoggingConfig, MaskConfig,
    SecurePasteConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
