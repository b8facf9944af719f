//! Per-request anonymization configuration
//!
//! A request arrives as JSON ([`AnonymizationRequest`]) with free-form strings for
//! operator methods. [`validate`](crate::anonymization::validator::validate) turns it
//! into an [`AnonymizationConfig`] whose operators are closed enums, so nothing
//! downstream of validation has to deal with unknown method names.

use crate::anonymization::models::{OperatorKind, DEFAULT_CATEGORY};
use crate::domain::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Default minimum detection score
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.35;

/// Default request language
pub const DEFAULT_LANGUAGE: &str = "en";

/// Anonymization request as received from the host application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationRequest {
    /// Standard categories to detect, with their operators
    #[serde(default)]
    pub entities: Option<Vec<EntityRequest>>,

    /// Minimum detection score (default 0.35)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f32>,

    /// Language passed to the semantic detector (default "en")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// User-supplied regex rules
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_patterns: Vec<CustomPatternRequest>,
}

/// One entry of the request's `entities` list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityRequest {
    /// Category label
    #[serde(rename = "type", default)]
    pub entity_type: String,

    /// Operator method name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymization_method: Option<String>,

    /// Replacement literal for the `replace` method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_replacement: Option<String>,
}

/// One entry of the request's `custom_patterns` list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomPatternRequest {
    /// Unique rule name
    #[serde(default)]
    pub name: String,

    /// Regex source
    #[serde(default)]
    pub pattern: String,

    /// Category emitted by this rule
    #[serde(default)]
    pub entity_type: String,

    /// Rule score (0.1 - 1.0, default 0.8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_score: Option<f32>,

    /// Operator for this rule's category when no entity entry names it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anonymization_method: Option<String>,

    /// Replacement literal for the `replace` method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_replacement: Option<String>,

    /// Disabled rules are validated but never run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Context words that raise the score when they precede a match
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl AnonymizationRequest {
    /// Parse a request from its JSON form
    ///
    /// `entities` must be present and be a list; any other shape problem is
    /// reported as [`ValidationError::Malformed`].
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| ValidationError::Malformed(e.to_string()))?;

        match value.get("entities") {
            Some(Value::Array(_)) => {}
            _ => return Err(ValidationError::MissingEntities),
        }

        serde_json::from_value(value).map_err(|e| ValidationError::Malformed(e.to_string()))
    }

    /// Create a request for the given categories, all using one method
    pub fn for_categories<I, S>(categories: I, method: OperatorKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entities: Some(
                categories
                    .into_iter()
                    .map(|category| EntityRequest {
                        entity_type: category.into(),
                        anonymization_method: Some(method.to_string()),
                        custom_replacement: None,
                    })
                    .collect(),
            ),
            ..Self::default()
        }
    }
}

/// Validated per-category operator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryConfig {
    /// Category label (may be `DEFAULT`)
    pub category: String,
    /// Operator; `None` means detect only and resolve through the fallback chain
    pub method: Option<OperatorKind>,
    /// Replacement literal for `Replace`
    pub custom_replacement: Option<String>,
}

/// Validated custom pattern descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct PatternDescriptor {
    /// Unique rule name
    pub name: String,
    /// Regex source (known to compile)
    pub regex_source: String,
    /// Category emitted by this rule
    pub category: String,
    /// Rule score, `None` for the catalogue default
    pub score: Option<f32>,
    /// Whether the rule runs
    pub enabled: bool,
    /// Context words
    pub context_hints: Vec<String>,
    /// Operator for this rule's category
    pub method: Option<OperatorKind>,
    /// Replacement literal for `Replace`
    pub custom_replacement: Option<String>,
}

/// Validated anonymization configuration
///
/// Built fresh for every request and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct AnonymizationConfig {
    /// Category entries in request order
    pub categories: Vec<CategoryConfig>,
    /// Minimum detection score
    pub confidence_threshold: f32,
    /// Language passed to the semantic detector
    pub language: String,
    /// Custom pattern descriptors in request order
    pub custom_patterns: Vec<PatternDescriptor>,
}

impl AnonymizationConfig {
    /// Categories to run detectors for
    ///
    /// The union of every listed category (except `DEFAULT`) and every category
    /// named by an enabled custom pattern.
    pub fn requested_categories(&self) -> BTreeSet<String> {
        self.categories
            .iter()
            .map(|c| c.category.as_str())
            .filter(|c| *c != DEFAULT_CATEGORY)
            .chain(
                self.custom_patterns
                    .iter()
                    .filter(|p| p.enabled)
                    .map(|p| p.category.as_str()),
            )
            .map(str::to_string)
            .collect()
    }

    /// Explicit entry for a category, if any
    pub fn category(&self, category: &str) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.category == category)
    }
}
