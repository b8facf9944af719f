// SecurePaste - redaction of secrets and personal data in free text
// Copyright (c) 2025 SecurePaste Contributors
// Licensed under the MIT License

//! # SecurePaste - redaction of secrets and personal data
//!
//! SecurePaste finds sensitive spans in free text (passwords, e-mail
//! addresses, card numbers, caller-defined patterns) and rewrites each one with
//! a per-category operator before the text reaches a clipboard, chat or log.
//!
//! ## Overview
//!
//! This library provides:
//! - **Detection** with built-in credential rules, per-request custom patterns
//!   and a pluggable semantic entity detector
//! - **Operators**: redact, replace, mask, hash (SHA-256) and encrypt (AES-256-GCM)
//! - **Rewriting** of overlapping, length-changing spans in one pass over the
//!   original text
//! - **Audit** entries that record what was rewritten without the plaintext
//!
//! ## Architecture
//!
//! - [`anonymization`] - Detection, operator resolution and rewriting
//! - [`config`] - Engine settings (TOML + environment overrides)
//! - [`domain`] - Error types
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use securepaste::anonymization::AnonymizationEngine;
//! use securepaste::config::load_config_or_default;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let settings = load_config_or_default("securepaste.toml")?;
//!     let engine = AnonymizationEngine::new(&settings)?;
//!
//!     let response = engine.anonymize_text(
//!         r#"login: alice password="quotedPassword123""#,
//!         r#"{"entities":[{"type":"PASSWORD","anonymization_method":"mask"}]}"#,
//!     );
//!     println!("{response}");
//!     Ok(())
//! }
//! ```
//!
//! ## Request Format
//!
//! ```json
//! {
//!   "entities": [
//!     {"type": "PASSWORD", "anonymization_method": "redact"},
//!     {"type": "EMAIL_ADDRESS", "anonymization_method": "replace", "custom_replacement": "<email>"},
//!     {"type": "DEFAULT", "anonymization_method": "hash"}
//!   ],
//!   "custom_patterns": [
//!     {"name": "ticket", "pattern": "TCK-\\d{6}", "entity_type": "TICKET", "confidence_score": 0.9}
//!   ],
//!   "confidence_threshold": 0.35,
//!   "language": "en"
//! }
//! ```
//!
//! ## Error Handling
//!
//! Errors are [`domain::SecurePasteError`]. [`anonymization::AnonymizationEngine::anonymize_text`]
//! never fails: errors become a failure response that echoes the original text.
//!
//! ## Logging
//!
//! SecurePaste uses structured logging with the `tracing` crate. Log events
//! carry categories, counts and offsets, never matched text.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
