//! Pattern-library semantic detector
//!
//! Stands in for an entity-recognition model: it recognizes the categories of a
//! [`PatternLibrary`] and refuses languages the library does not declare, the
//! same way a model without a loaded language would.

use super::patterns::library::PatternLibrary;
use super::regex::scan_rule;
use super::{SemanticDetector, SemanticSpan};
use crate::domain::{Result, SecurePasteError};

/// Semantic detector driven by a TOML pattern library
#[derive(Debug, Clone)]
pub struct PatternSemanticDetector {
    library: PatternLibrary,
}

impl PatternSemanticDetector {
    /// Create a detector over a compiled library
    pub fn new(library: PatternLibrary) -> Self {
        Self { library }
    }

    /// Create a detector over the embedded library
    pub fn embedded() -> anyhow::Result<Self> {
        Ok(Self::new(PatternLibrary::embedded()?))
    }
}

impl SemanticDetector for PatternSemanticDetector {
    fn supported_categories(&self) -> Vec<String> {
        self.library.categories()
    }

    fn analyze(
        &self,
        text: &str,
        categories: &[String],
        language: &str,
        score_threshold: f32,
    ) -> Result<Vec<SemanticSpan>> {
        if !self.library.languages().iter().any(|l| l == language) {
            return Err(SecurePasteError::DetectionFailure(format!(
                "No semantic patterns for language '{language}' (supported: {})",
                self.library.languages().join(", ")
            )));
        }

        let mut spans = Vec::new();
        for entry in self.library.rules() {
            if !categories.iter().any(|c| c == entry.rule.category()) {
                continue;
            }

            for span in scan_rule(&entry.rule, text)? {
                if span.score < score_threshold {
                    continue;
                }
                if let Some(validator) = entry.validator {
                    if !validator.accepts(&span.matched_text) {
                        continue;
                    }
                }
                spans.push(SemanticSpan {
                    category: span.category,
                    start: span.start,
                    end: span.end,
                    score: span.score,
                });
            }
        }

        Ok(spans)
    }
}
