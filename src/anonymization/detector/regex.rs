//! Regex-based span detector

use super::patterns::{PatternRule, VALUE_GROUP};
use crate::anonymization::models::{DetectionMethod, DetectionSpan};
use crate::domain::{Result, SecurePasteError};
use std::collections::BTreeSet;

/// Score added when a context word precedes a match
const CONTEXT_SIMILARITY_FACTOR: f32 = 0.35;

/// Floor for a context-boosted score
const MIN_SCORE_WITH_CONTEXT: f32 = 0.4;

/// How many words before a match are searched for context
const CONTEXT_PREFIX_WORDS: usize = 5;

/// Detector over a set of compiled pattern rules
#[derive(Debug, Default)]
pub struct RegexDetector<'a> {
    rules: Vec<&'a PatternRule>,
}

impl<'a> RegexDetector<'a> {
    /// Create a detector over the given rules
    pub fn new(rules: impl IntoIterator<Item = &'a PatternRule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Check whether any rule emits `category`
    pub fn covers(&self, category: &str) -> bool {
        self.rules.iter().any(|r| r.category() == category)
    }

    /// Run every rule whose category is in `categories`
    pub fn detect(&self, text: &str, categories: &BTreeSet<String>) -> Result<Vec<DetectionSpan>> {
        let mut spans = Vec::new();

        for rule in &self.rules {
            if !categories.contains(rule.category()) {
                continue;
            }
            let found = scan_rule(rule, text)?;
            if !found.is_empty() {
                tracing::debug!(rule = rule.name(), matches = found.len(), "Pattern rule matched");
            }
            spans.extend(found);
        }

        Ok(spans)
    }
}

/// Scan `text` for every non-overlapping match of `rule`
///
/// Each match yields one span with the rule's score, narrowed to the `value`
/// group when the regex defines one. Empty matches are skipped.
pub fn scan_rule(rule: &PatternRule, text: &str) -> Result<Vec<DetectionSpan>> {
    let mut spans = Vec::new();

    for captures in rule.regex().captures_iter(text) {
        let captures = captures.map_err(|e| {
            SecurePasteError::DetectionFailure(format!("Pattern '{}' failed: {e}", rule.name()))
        })?;

        let Some(matched) = captures.name(VALUE_GROUP).or_else(|| captures.get(0)) else {
            continue;
        };

        let score = context_boost(text, matched.start(), rule.context_hints(), rule.score());
        let method = DetectionMethod::Pattern {
            rule: rule.name().to_string(),
        };
        if let Some(span) =
            DetectionSpan::from_text(rule.category(), text, matched.start(), matched.end(), score, method)
        {
            spans.push(span);
        }
    }

    Ok(spans)
}

/// Raise `score` if a context word appears among the words preceding `start`
fn context_boost(text: &str, start: usize, hints: &[String], score: f32) -> f32 {
    if hints.is_empty() {
        return score;
    }

    let prefix = &text[..start];
    let found = prefix
        .split_whitespace()
        .rev()
        .take(CONTEXT_PREFIX_WORDS)
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .any(|word| hints.iter().any(|hint| *hint == word));

    if found {
        (score + CONTEXT_SIMILARITY_FACTOR)
            .min(1.0)
            .max(MIN_SCORE_WITH_CONTEXT)
    } else {
        score
    }
}
