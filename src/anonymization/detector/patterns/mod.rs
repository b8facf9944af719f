//! Pattern catalogue for span detection
//!
//! A [`PatternRule`] binds a compiled regex to a category and a fixed score. Rules
//! come from three places: the built-in credential set ([`credentials`]), the
//! custom patterns of a request ([`compile`]), and the TOML pattern library used by
//! the built-in semantic detector ([`library`]).

pub mod credentials;
pub mod library;

use crate::anonymization::config::PatternDescriptor;
use fancy_regex::Regex;

/// Score given to custom rules that do not specify one
pub const DEFAULT_CUSTOM_SCORE: f32 = 0.8;

/// Name of the capture group that narrows a match to the sensitive value
pub const VALUE_GROUP: &str = "value";

/// Compiled pattern rule
///
/// Immutable once constructed. If the regex defines a capture group named
/// `value`, spans cover that group only; otherwise they cover the whole match.
#[derive(Debug, Clone)]
pub struct PatternRule {
    name: String,
    category: String,
    regex: Regex,
    score: f32,
    context_hints: Vec<String>,
}

impl PatternRule {
    /// Compile a new rule
    ///
    /// # Errors
    ///
    /// Returns the regex compile error if `regex_source` is invalid.
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        regex_source: &str,
        score: f32,
        context_hints: Vec<String>,
    ) -> Result<Self, fancy_regex::Error> {
        Ok(Self {
            name: name.into(),
            category: category.into(),
            regex: Regex::new(regex_source)?,
            score: score.clamp(0.0, 1.0),
            context_hints: context_hints
                .into_iter()
                .map(|hint| hint.to_lowercase())
                .filter(|hint| !hint.is_empty())
                .collect(),
        })
    }

    /// Rule name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category emitted by this rule
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Compiled regex
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Fixed score of every match
    pub fn score(&self) -> f32 {
        self.score
    }

    /// Lowercased context words
    pub fn context_hints(&self) -> &[String] {
        &self.context_hints
    }
}

/// A custom pattern left out of the catalogue
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedPattern {
    /// Rule name
    pub name: String,
    /// Why the rule was skipped
    pub reason: SkipReason,
}

/// Reason a custom pattern was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The descriptor is disabled
    Disabled,
    /// The regex failed to compile
    InvalidRegex(String),
}

/// Result of compiling a batch of descriptors
#[derive(Debug, Default)]
pub struct CompiledPatterns {
    /// Rules that compiled and are enabled, in descriptor order
    pub rules: Vec<PatternRule>,
    /// Descriptors that were skipped
    pub skipped: Vec<SkippedPattern>,
}

/// Compile custom pattern descriptors into rules
///
/// Disabled descriptors and descriptors whose regex fails to compile are
/// skipped and reported in [`CompiledPatterns::skipped`]; the rest of the batch
/// still compiles.
pub fn compile(descriptors: &[PatternDescriptor]) -> CompiledPatterns {
    let mut compiled = CompiledPatterns::default();

    for descriptor in descriptors {
        if !descriptor.enabled {
            tracing::debug!(pattern = %descriptor.name, "Skipping disabled custom pattern");
            compiled.skipped.push(SkippedPattern {
                name: descriptor.name.clone(),
                reason: SkipReason::Disabled,
            });
            continue;
        }

        match PatternRule::new(
            descriptor.name.clone(),
            descriptor.category.clone(),
            &descriptor.regex_source,
            descriptor.score.unwrap_or(DEFAULT_CUSTOM_SCORE),
            descriptor.context_hints.clone(),
        ) {
            Ok(rule) => compiled.rules.push(rule),
            Err(e) => {
                tracing::warn!(
                    pattern = %descriptor.name,
                    error = %e,
                    "Skipping custom pattern with invalid regex"
                );
                compiled.skipped.push(SkippedPattern {
                    name: descriptor.name.clone(),
                    reason: SkipReason::InvalidRegex(e.to_string()),
                });
            }
        }
    }

    compiled
}
