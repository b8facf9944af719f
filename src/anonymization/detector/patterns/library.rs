//! TOML pattern library for the built-in semantic detector

use super::PatternRule;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Pattern definition from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct PatternDefinition {
    /// Regex patterns for this category
    pub patterns: Vec<String>,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
    /// Category label
    pub category: String,
    /// Context words that boost the score
    #[serde(default)]
    pub context: Vec<String>,
    /// Extra check a match must pass
    #[serde(default)]
    pub validator: Option<MatchValidator>,
}

/// Post-match validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchValidator {
    /// Luhn checksum over the digits of the match (card numbers)
    Luhn,
}

impl MatchValidator {
    /// Check a matched value
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Luhn => luhn_valid(value),
        }
    }
}

fn luhn_valid(value: &str) -> bool {
    let digits: Vec<u32> = value.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() < 12 {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

/// Pattern library container
#[derive(Debug, Deserialize)]
struct PatternLibraryFile {
    #[serde(default = "default_languages")]
    languages: Vec<String>,
    patterns: BTreeMap<String, PatternDefinition>,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

/// A library rule together with its validator
#[derive(Debug, Clone)]
pub struct LibraryRule {
    /// Compiled rule
    pub rule: PatternRule,
    /// Optional post-match validator
    pub validator: Option<MatchValidator>,
}

/// Compiled pattern library
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    languages: Vec<String>,
    rules: Vec<LibraryRule>,
}

impl PatternLibrary {
    /// Load a pattern library from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).with_context(|| {
            format!(
                "Failed to read pattern library: {}",
                path.as_ref().display()
            )
        })?;

        Self::from_toml(&content)
    }

    /// Parse a pattern library from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let library: PatternLibraryFile =
            toml::from_str(content).context("Failed to parse pattern library TOML")?;

        let mut rules = Vec::new();
        for (key, def) in library.patterns {
            if def.category.trim().is_empty() {
                anyhow::bail!("Pattern '{key}' has an empty category");
            }
            if !(0.0..=1.0).contains(&def.confidence) {
                anyhow::bail!(
                    "Pattern '{key}' has confidence {} outside 0.0 - 1.0",
                    def.confidence
                );
            }

            for (idx, pattern_str) in def.patterns.iter().enumerate() {
                let name = if def.patterns.len() == 1 {
                    key.clone()
                } else {
                    format!("{key}_{idx}")
                };
                let rule = PatternRule::new(
                    name,
                    def.category.clone(),
                    pattern_str,
                    def.confidence,
                    def.context.clone(),
                )
                .with_context(|| format!("Invalid regex in pattern '{key}': {pattern_str}"))?;

                rules.push(LibraryRule {
                    rule,
                    validator: def.validator,
                });
            }
        }

        Ok(Self {
            languages: library.languages,
            rules,
        })
    }

    /// The library embedded in the binary
    pub fn embedded() -> Result<Self> {
        let default_toml = include_str!("../../../../patterns/entity_patterns.toml");
        Self::from_toml(default_toml)
    }

    /// Languages this library claims to support
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// All compiled rules
    pub fn rules(&self) -> &[LibraryRule] {
        &self.rules
    }

    /// Distinct categories covered by the library
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.rules.iter().map(|r| r.rule.category().to_string()).collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
