//! Anonymization module for SecurePaste
//!
//! This module detects sensitive spans in free text (credentials, contact
//! details, identifiers, caller-supplied patterns) and rewrites them with a
//! per-category operator.
//!
//! # Architecture
//!
//! A request flows through:
//! - **Validation**: the JSON request becomes an [`AnonymizationConfig`]
//! - **Detection**: built-in credential rules, custom patterns and the semantic detector
//! - **Resolution**: each category is mapped to an operator
//! - **Rewrite**: overlaps are resolved and spans are replaced in one pass
//! - **Audit**: applied spans are logged with hashed values
//!
//! # Usage
//!
//! ```rust,no_run
//! use securepaste::anonymization::AnonymizationEngine;
//! use securepaste::config::SecurePasteConfig;
//!
//! # fn example() -> securepaste::domain::Result<()> {
//! let engine = AnonymizationEngine::new(&SecurePasteConfig::default())?;
//! let config = engine.validate_request(r#"{"entities":[{"type":"PASSWORD"}]}"#)?;
//! let report = engine.anonymize("password: mySecretPass123", &config)?;
//! assert_eq!(report.anonymized_text, "password: [REDACTED]");
//! # Ok(())
//! # }
//! ```

pub mod anonymizer;
pub mod audit;
pub mod config;
pub mod detector;
pub mod engine;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod response;
pub mod rewrite;
pub mod validator;

// Re-export main types
pub use config::{AnonymizationConfig, AnonymizationRequest};
pub use engine::AnonymizationEngine;
pub use models::{DetectionSpan, OperatorKind, OperatorSpec};
pub use report::{AnonymizationReport, BatchReport};
pub use response::AnonymizationResponse;
