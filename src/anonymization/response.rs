//! JSON responses returned to host applications
//!
//! Offsets in `analyzer_results` are character offsets into the original text.

use crate::anonymization::models::DetectionSpan;
use crate::anonymization::report::AnonymizationReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One reported span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerResult {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
    pub score: f32,
    pub text: String,
}

/// Response to an anonymization request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnonymizationResponse {
    Success {
        success: bool,
        anonymized_text: String,
        entities_found: BTreeMap<String, usize>,
        total_entities: usize,
        analyzer_results: Vec<AnalyzerResult>,
    },
    Failure {
        success: bool,
        error: String,
        /// The original text, not anonymized
        anonymized_text: String,
    },
}

impl AnonymizationResponse {
    /// Build a success response from a report over `original`
    pub fn success(original: &str, report: AnonymizationReport) -> Self {
        Self::Success {
            success: true,
            total_entities: report.total(),
            analyzer_results: analyzer_results(original, &report.spans),
            entities_found: report.counts,
            anonymized_text: report.anonymized_text,
        }
    }

    /// Build a failure response echoing `original` unmodified
    pub fn failure(original: &str, error: impl ToString) -> Self {
        Self::Failure {
            success: false,
            error: error.to_string(),
            anonymized_text: original.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> String {
        // every map key is a string
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"Failed to serialize response: {e}"}}"#)
        })
    }
}

/// Convert spans to analyzer results with character offsets
pub fn analyzer_results(original: &str, spans: &[DetectionSpan]) -> Vec<AnalyzerResult> {
    spans
        .iter()
        .map(|span| AnalyzerResult {
            entity_type: span.category.clone(),
            start: char_offset(original, span.start),
            end: char_offset(original, span.end),
            score: span.score,
            text: span.matched_text.clone(),
        })
        .collect()
}

/// Character offset of a byte offset on a `char` boundary
fn char_offset(text: &str, byte_offset: usize) -> usize {
    text.get(..byte_offset)
        .map(|prefix| prefix.chars().count())
        .unwrap_or_else(|| text.chars().count())
}
