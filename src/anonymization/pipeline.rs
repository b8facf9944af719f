//! Detection pipeline
//!
//! Validates a request, runs the detector registry for the requested
//! categories and returns the spans above the confidence threshold in rewrite
//! order. Overlapping spans are kept; the rewrite stage decides between them.

use crate::anonymization::config::{AnonymizationConfig, AnonymizationRequest};
use crate::anonymization::detector::patterns::PatternRule;
use crate::anonymization::detector::{DetectorPolicy, DetectorRegistry, SemanticBackend};
use crate::anonymization::models::DetectionSpan;
use crate::anonymization::validator::validate;
use crate::domain::Result;
use std::cmp::Ordering;

/// Detection pipeline over the engine's shared detectors
#[derive(Debug, Clone, Copy)]
pub struct DetectionPipeline<'a> {
    builtin: &'a [PatternRule],
    semantic: &'a SemanticBackend,
    policy: DetectorPolicy,
}

impl<'a> DetectionPipeline<'a> {
    /// Create a pipeline
    pub fn new(builtin: &'a [PatternRule], semantic: &'a SemanticBackend, policy: DetectorPolicy) -> Self {
        Self {
            builtin,
            semantic,
            policy,
        }
    }

    /// Validate `request` and detect spans in `text`
    ///
    /// # Errors
    ///
    /// Returns the first validation failure without running any detector, or
    /// the detection error reported by the registry.
    pub fn run(&self, text: &str, request: &AnonymizationRequest) -> Result<Vec<DetectionSpan>> {
        let config = validate(request)?;
        self.run_validated(text, &config)
    }

    /// Detect spans in `text` for an already validated configuration
    pub fn run_validated(&self, text: &str, config: &AnonymizationConfig) -> Result<Vec<DetectionSpan>> {
        let requested = config.requested_categories();
        let registry = DetectorRegistry::build(self.builtin, &config.custom_patterns, self.semantic, self.policy);

        let mut spans = registry.detect(text, &config.language, &requested, config.confidence_threshold)?;
        let detected = spans.len();
        spans.retain(|span| span.score >= config.confidence_threshold);
        spans.sort_by(rewrite_order);

        tracing::debug!(
            categories = requested.len(),
            detected,
            kept = spans.len(),
            threshold = config.confidence_threshold,
            "Detection finished"
        );

        Ok(spans)
    }
}

/// Ascending start, then descending score, then longer span first
pub fn rewrite_order(a: &DetectionSpan, b: &DetectionSpan) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| b.len().cmp(&a.len()))
}
