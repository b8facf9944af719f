//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that owns everything shared
//! between requests and runs each request through detection, operator
//! resolution and rewriting.
//!
//! # Architecture
//!
//! The engine holds:
//! - **Built-in rules**: the credential rules, compiled once
//! - **Semantic backend**: the entity detector, or why it is unavailable
//! - **Operator defaults and cipher**: parameters for `replace`, `mask` and `encrypt`
//! - **Audit Logger**: records applied spans with hashed values
//!
//! Per-request state (custom rules, spans) is built inside each call and
//! dropped before it returns.
//!
//! # Examples
//!
//! ```no_run
//! use securepaste::anonymization::AnonymizationEngine;
//! use securepaste::config::SecurePasteConfig;
//!
//! # fn example() -> securepaste::domain::Result<()> {
//! let engine = AnonymizationEngine::new(&SecurePasteConfig::default())?;
//!
//! let response = engine.anonymize_text(
//!     "password: mySecretPass123",
//!     r#"{"entities":[{"type":"PASSWORD","anonymization_method":"redact"}]}"#,
//! );
//! println!("{response}");
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    anonymizer::encryption::SpanCipher,
    audit::AuditLogger,
    config::{AnonymizationConfig, AnonymizationRequest},
    detector::{
        patterns::{credentials::builtin_rules, library::PatternLibrary, PatternRule},
        semantic::PatternSemanticDetector,
        DetectorPolicy, SemanticBackend, SemanticDetector,
    },
    models::DetectionSpan,
    pipeline::DetectionPipeline,
    report::AnonymizationReport,
    resolver::{OperatorDefaults, OperatorResolver},
    response::AnonymizationResponse,
    rewrite,
    validator::validate,
};
use crate::config::SecurePasteConfig;
use crate::domain::{Result, SecurePasteError};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Main anonymization engine
///
/// # Thread Safety
///
/// The engine is immutable after construction and can be shared across threads
/// and async tasks using `Arc`. The semantic detector must itself be safe for
/// concurrent calls.
#[derive(Debug)]
pub struct AnonymizationEngine {
    builtin_rules: Arc<[PatternRule]>,
    semantic: SemanticBackend,
    policy: DetectorPolicy,
    defaults: OperatorDefaults,
    cipher: SpanCipher,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine from settings
    ///
    /// A semantic detector that fails to load does not fail construction; the
    /// engine records it as unavailable and applies `engine.detector_policy`
    /// per request.
    ///
    /// # Errors
    ///
    /// Returns [`SecurePasteError::Settings`] if:
    /// - The encryption key is not a base64-encoded 32-byte key
    /// - The audit log directory cannot be created
    pub fn new(config: &SecurePasteConfig) -> Result<Self> {
        let builtin_rules: Arc<[PatternRule]> = builtin_rules()
            .map_err(|e| {
                SecurePasteError::Settings(format!("Built-in credential rules failed to compile: {e}"))
            })?
            .into();

        let semantic = Self::load_semantic_backend(config);

        let cipher = match config.encryption.key {
            Some(ref key) => SpanCipher::from_base64_key(key)?,
            None => {
                tracing::info!("No encryption key configured, encrypt tokens are only reversible by this process");
                SpanCipher::generate()
            }
        };

        let audit_logger = if config.audit.enabled {
            Some(
                AuditLogger::new(config.audit.log_path.clone(), config.audit.json_format)
                    .map_err(|e| SecurePasteError::Settings(format!("{e:#}")))?,
            )
        } else {
            None
        };

        tracing::debug!(
            builtin_rules = builtin_rules.len(),
            semantic_available = semantic.is_available(),
            policy = %config.engine.detector_policy,
            audit = audit_logger.is_some(),
            "Anonymization engine created"
        );

        Ok(Self {
            builtin_rules,
            semantic,
            policy: config.engine.detector_policy,
            defaults: config.engine.operator_defaults(),
            cipher,
            audit_logger,
        })
    }

    fn load_semantic_backend(config: &SecurePasteConfig) -> SemanticBackend {
        let library = match config.engine.pattern_library {
            Some(ref path) => PatternLibrary::from_file(path),
            None => PatternLibrary::embedded(),
        };

        match library {
            Ok(library) => SemanticBackend::Available(Arc::new(PatternSemanticDetector::new(library))),
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::warn!(error = %reason, "Semantic detector failed to initialize");
                SemanticBackend::Unavailable(reason)
            }
        }
    }

    /// Replace the semantic detector
    pub fn with_semantic_detector(mut self, detector: Arc<dyn SemanticDetector>) -> Self {
        self.semantic = SemanticBackend::Available(detector);
        self
    }

    /// Mark the semantic detector as failed to initialize
    pub fn with_unavailable_semantic_detector(mut self, reason: impl Into<String>) -> Self {
        self.semantic = SemanticBackend::Unavailable(reason.into());
        self
    }

    /// Whether the semantic detector can be called
    pub fn semantic_available(&self) -> bool {
        self.semantic.is_available()
    }

    /// Parse and validate a JSON request
    pub fn validate_request(&self, config_json: &str) -> Result<AnonymizationConfig> {
        let request = AnonymizationRequest::from_json(config_json)?;
        Ok(validate(&request)?)
    }

    /// Run detection only
    ///
    /// Spans are filtered by the threshold and sorted, but overlaps are kept.
    pub fn detect(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<DetectionSpan>> {
        self.pipeline().run_validated(text, config)
    }

    /// Anonymize `text` with a validated configuration
    ///
    /// # Errors
    ///
    /// Returns the detection, operator or audit error; the text is never
    /// partially rewritten.
    pub fn anonymize(&self, text: &str, config: &AnonymizationConfig) -> Result<AnonymizationReport> {
        let start = Instant::now();
        let request_id = Uuid::new_v4();

        let spans = self.detect(text, config)?;
        let resolver = OperatorResolver::new(config, &self.defaults);
        let report = rewrite::apply(text, spans, &resolver, &self.cipher)?;

        if let Some(ref logger) = self.audit_logger {
            logger
                .log_anonymization(request_id, &report)
                .map_err(|e| SecurePasteError::Io(format!("{e:#}")))?;
        }

        tracing::info!(
            request_id = %request_id,
            total_entities = report.total(),
            categories = report.counts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Anonymization completed"
        );

        Ok(report)
    }

    /// Validate `request` and anonymize `text`
    pub fn anonymize_request(&self, text: &str, request: &AnonymizationRequest) -> Result<AnonymizationReport> {
        let config = validate(request)?;
        self.anonymize(text, &config)
    }

    /// Anonymize `text` and build the response for the host application
    ///
    /// Never fails: errors become a failure response that echoes `text`.
    pub fn respond(&self, text: &str, config_json: &str) -> AnonymizationResponse {
        let result = self
            .validate_request(config_json)
            .and_then(|config| self.anonymize(text, &config));

        match result {
            Ok(report) => AnonymizationResponse::success(text, report),
            Err(e) => {
                tracing::warn!(error = %e, configuration = e.is_configuration(), "Anonymization failed");
                AnonymizationResponse::failure(text, error_message(&e))
            }
        }
    }

    /// Anonymize `text` and return the response as JSON
    pub fn anonymize_text(&self, text: &str, config_json: &str) -> String {
        self.respond(text, config_json).to_json()
    }

    /// Decrypt a token produced by the `encrypt` operator of this engine's key
    pub fn decrypt(&self, token: &str) -> Result<String> {
        self.cipher.decrypt(token)
    }

    fn pipeline(&self) -> DetectionPipeline<'_> {
        DetectionPipeline::new(&self.builtin_rules, &self.semantic, self.policy)
    }
}

/// Message put in a failure response
///
/// Validation errors are reported as-is so callers see the specific problem.
pub fn error_message(error: &SecurePasteError) -> String {
    match error {
        SecurePasteError::Configuration(validation) => validation.to_string(),
        other => other.to_string(),
    }
}
