//! Detector registry
//!
//! Composes the pattern catalogue and the semantic detector into one logical
//! detector for a request.

use super::patterns::{compile, PatternRule};
use super::regex::RegexDetector;
use super::{is_semantic_category, DetectorPolicy, SemanticBackend};
use crate::anonymization::config::PatternDescriptor;
use crate::anonymization::models::{DetectionMethod, DetectionSpan};
use crate::domain::{Result, SecurePasteError};
use std::collections::BTreeSet;

/// Detector for one request
///
/// Holds the per-request custom rules; built-in rules and the semantic backend
/// are borrowed from the engine and shared between requests.
#[derive(Debug)]
pub struct DetectorRegistry<'a> {
    builtin: &'a [PatternRule],
    custom: Vec<PatternRule>,
    semantic: &'a SemanticBackend,
    policy: DetectorPolicy,
}

impl<'a> DetectorRegistry<'a> {
    /// Build a detector from the built-in rules and a request's custom patterns
    pub fn build(
        builtin: &'a [PatternRule],
        custom_patterns: &[PatternDescriptor],
        semantic: &'a SemanticBackend,
        policy: DetectorPolicy,
    ) -> Self {
        Self {
            builtin,
            custom: compile(custom_patterns).rules,
            semantic,
            policy,
        }
    }

    /// Detect every span of the requested categories
    ///
    /// Pattern rules run first; the semantic detector is then called once with
    /// the requested categories it supports. Categories no detector knows yield
    /// no spans. Spans are returned unfiltered and unsorted.
    ///
    /// # Errors
    ///
    /// - [`SecurePasteError::DetectorUnavailable`] when the semantic detector
    ///   failed to initialize, the policy is [`DetectorPolicy::Fail`], and a
    ///   requested semantic category has no pattern rule
    /// - [`SecurePasteError::DetectionFailure`] when a detector fails or the
    ///   semantic detector reports a span outside the text
    pub fn detect(
        &self,
        text: &str,
        language: &str,
        requested: &BTreeSet<String>,
        score_threshold: f32,
    ) -> Result<Vec<DetectionSpan>> {
        let regex = RegexDetector::new(self.builtin.iter().chain(self.custom.iter()));
        let mut spans = regex.detect(text, requested)?;

        match self.semantic {
            SemanticBackend::Available(detector) => {
                let supported = detector.supported_categories();
                let categories: Vec<String> = requested
                    .iter()
                    .filter(|c| supported.contains(*c))
                    .cloned()
                    .collect();
                if categories.is_empty() {
                    return Ok(spans);
                }

                let found = detector.analyze(text, &categories, language, score_threshold)?;
                tracing::debug!(
                    categories = categories.len(),
                    spans = found.len(),
                    "Semantic detector finished"
                );

                for span in found {
                    if !categories.contains(&span.category) {
                        tracing::debug!(category = %span.category, "Ignoring unrequested semantic span");
                        continue;
                    }
                    let converted = DetectionSpan::from_text(
                        span.category.as_str(),
                        text,
                        span.start,
                        span.end,
                        span.score,
                        DetectionMethod::Semantic,
                    )
                    .ok_or_else(|| {
                        SecurePasteError::DetectionFailure(format!(
                            "Semantic detector returned invalid span {}..{} for {} in text of {} bytes",
                            span.start,
                            span.end,
                            span.category,
                            text.len()
                        ))
                    })?;
                    spans.push(converted);
                }
            }
            SemanticBackend::Unavailable(reason) => {
                let uncovered: Vec<&str> = requested
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !regex.covers(c) && is_semantic_category(c))
                    .collect();
                if !uncovered.is_empty() {
                    match self.policy {
                        DetectorPolicy::Fail => {
                            return Err(SecurePasteError::DetectorUnavailable(format!(
                                "{reason} (needed for {})",
                                uncovered.join(", ")
                            )));
                        }
                        DetectorPolicy::RegexOnly => {
                            tracing::warn!(
                                reason = %reason,
                                categories = %uncovered.join(", "),
                                "Semantic detector unavailable, running pattern rules only"
                            );
                        }
                    }
                }
            }
        }

        Ok(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::detector::patterns::credentials::builtin_rules;
    use crate::anonymization::detector::semantic::PatternSemanticDetector;
    use crate::anonymization::detector::{SemanticDetector, SemanticSpan};
    use std::sync::Arc;

    struct FixedDetector(Vec<SemanticSpan>);

    impl SemanticDetector for FixedDetector {
        fn supported_categories(&self) -> Vec<String> {
            vec!["EMAIL_ADDRESS".to_string()]
        }

        fn analyze(&self, _: &str, _: &[String], _: &str, _: f32) -> Result<Vec<SemanticSpan>> {
            Ok(self.0.clone())
        }
    }

    fn categories(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn embedded_backend() -> SemanticBackend {
        SemanticBackend::Available(Arc::new(PatternSemanticDetector::embedded().unwrap()))
    }

    fn custom(name: &str, regex: &str, category: &str) -> PatternDescriptor {
        PatternDescriptor {
            name: name.to_string(),
            regex_source: regex.to_string(),
            category: category.to_string(),
            score: None,
            enabled: true,
            context_hints: Vec::new(),
            method: None,
            custom_replacement: None,
        }
    }

    #[test]
    fn test_pattern_and_semantic_spans() {
        let builtin = builtin_rules().unwrap();
        let backend = embedded_backend();
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::Fail);

        let spans = registry
            .detect(
                "password: hunter2000 mail bob@example.com",
                "en",
                &categories(&["PASSWORD", "EMAIL_ADDRESS"]),
                0.0,
            )
            .unwrap();

        assert!(spans.iter().any(|s| s.category == "PASSWORD"));
        assert!(spans
            .iter()
            .any(|s| s.category == "EMAIL_ADDRESS" && s.detection_method == DetectionMethod::Semantic));
    }

    #[test]
    fn test_custom_rule_runs() {
        let builtin = builtin_rules().unwrap();
        let backend = embedded_backend();
        let registry = DetectorRegistry::build(
            &builtin,
            &[custom("ticket", r"TCK-\d+", "TICKET")],
            &backend,
            DetectorPolicy::Fail,
        );

        let spans = registry
            .detect("see TCK-42", "en", &categories(&["TICKET"]), 0.0)
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(
            spans[0].detection_method,
            DetectionMethod::Pattern {
                rule: "ticket".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_category_yields_nothing() {
        let builtin = builtin_rules().unwrap();
        let backend = embedded_backend();
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::Fail);
        let spans = registry
            .detect("anything at all", "en", &categories(&["NOT_A_CATEGORY"]), 0.0)
            .unwrap();
        assert!(spans.is_empty());
    }

    #[test]
    fn test_unavailable_fails_for_uncovered_category() {
        let builtin = builtin_rules().unwrap();
        let backend = SemanticBackend::Unavailable("model not loaded".to_string());
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::Fail);

        let result = registry.detect("x", "en", &categories(&["EMAIL_ADDRESS"]), 0.0);
        assert!(matches!(result, Err(SecurePasteError::DetectorUnavailable(_))));

        // password is covered by pattern rules
        let spans = registry
            .detect("pwd=abcdefgh", "en", &categories(&["PASSWORD"]), 0.0)
            .unwrap();
        assert_eq!(spans.len(), 1);
    }

    #[test]
    fn test_unavailable_ignores_unknown_category() {
        let builtin = builtin_rules().unwrap();
        let backend = SemanticBackend::Unavailable("model not loaded".to_string());
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::Fail);

        let spans = registry
            .detect(
                "pwd=abcdefgh NCC-1701",
                "en",
                &categories(&["PASSWORD", "STARSHIP_REGISTRY"]),
                0.0,
            )
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].category, "PASSWORD");
    }

    #[test]
    fn test_unavailable_regex_only() {
        let builtin = builtin_rules().unwrap();
        let backend = SemanticBackend::Unavailable("model not loaded".to_string());
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::RegexOnly);

        let spans = registry
            .detect(
                "pwd=abcdefgh bob@example.com",
                "en",
                &categories(&["PASSWORD", "EMAIL_ADDRESS"]),
                0.0,
            )
            .unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].category, "PASSWORD");
    }

    #[test]
    fn test_invalid_semantic_span_is_failure() {
        let builtin = builtin_rules().unwrap();
        let backend = SemanticBackend::Available(Arc::new(FixedDetector(vec![SemanticSpan {
            category: "EMAIL_ADDRESS".to_string(),
            start: 2,
            end: 50,
            score: 0.9,
        }])));
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::Fail);

        let result = registry.detect("short", "en", &categories(&["EMAIL_ADDRESS"]), 0.0);
        assert!(matches!(result, Err(SecurePasteError::DetectionFailure(_))));
    }

    #[test]
    fn test_semantic_not_called_without_supported_categories() {
        let builtin = builtin_rules().unwrap();
        let backend = SemanticBackend::Available(Arc::new(FixedDetector(vec![SemanticSpan {
            category: "EMAIL_ADDRESS".to_string(),
            start: 0,
            end: 99,
            score: 0.9,
        }])));
        let registry = DetectorRegistry::build(&builtin, &[], &backend, DetectorPolicy::Fail);

        // the bogus span would fail if the detector were called
        let spans = registry
            .detect("pwd=abcdefgh", "en", &categories(&["PASSWORD"]), 0.0)
            .unwrap();
        assert_eq!(spans.len(), 1);
    }
}
