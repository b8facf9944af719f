//! Operator resolution
//!
//! Lookup order for a category:
//! 1. its entry in the request's `entities` list, if that entry names a method
//! 2. the custom pattern emitting the category (method defaults to `redact`)
//! 3. the `DEFAULT` entry, if it names a method
//! 4. `replace` with the redaction marker
//!
//! Methods are validated before resolution, so resolving never fails.

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::models::{MaskAnchor, OperatorKind, OperatorSpec, DEFAULT_CATEGORY};
use serde::{Deserialize, Serialize};

/// Marker used by `replace` when no replacement is configured
pub const REDACTION_MARKER: &str = "[REDACTED]";

/// Default number of masked characters
pub const DEFAULT_MASK_COUNT: usize = 7;

/// Default mask character
pub const DEFAULT_MASK_CHAR: char = '*';

/// Parameters of the `mask` operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskDefaults {
    /// Character written over masked characters
    pub mask_char: char,
    /// Number of characters to mask
    pub count: usize,
    /// Which end of the value is masked
    pub anchor: MaskAnchor,
}

impl Default for MaskDefaults {
    fn default() -> Self {
        Self {
            mask_char: DEFAULT_MASK_CHAR,
            count: DEFAULT_MASK_COUNT,
            anchor: MaskAnchor::Start,
        }
    }
}

/// Engine-level operator parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorDefaults {
    /// Replacement used by `replace` without `custom_replacement`
    pub replacement: String,
    /// Mask parameters
    pub mask: MaskDefaults,
}

impl Default for OperatorDefaults {
    fn default() -> Self {
        Self {
            replacement: REDACTION_MARKER.to_string(),
            mask: MaskDefaults::default(),
        }
    }
}

/// Resolves the operator for each detected category of one request
#[derive(Debug, Clone, Copy)]
pub struct OperatorResolver<'a> {
    config: &'a AnonymizationConfig,
    defaults: &'a OperatorDefaults,
}

impl<'a> OperatorResolver<'a> {
    pub fn new(config: &'a AnonymizationConfig, defaults: &'a OperatorDefaults) -> Self {
        Self { config, defaults }
    }

    /// Resolve the operator for `category`
    pub fn resolve(&self, category: &str) -> OperatorSpec {
        if let Some(entry) = self.config.category(category) {
            if let Some(method) = entry.method {
                return self.build(method, entry.custom_replacement.as_deref());
            }
        }

        if let Some(pattern) = self
            .config
            .custom_patterns
            .iter()
            .find(|p| p.category == category)
        {
            return self.build(
                pattern.method.unwrap_or(OperatorKind::Redact),
                pattern.custom_replacement.as_deref(),
            );
        }

        if let Some(entry) = self.config.category(DEFAULT_CATEGORY) {
            if let Some(method) = entry.method {
                return self.build(method, entry.custom_replacement.as_deref());
            }
        }

        OperatorSpec::Replace {
            replacement: self.defaults.replacement.clone(),
        }
    }

    fn build(&self, method: OperatorKind, custom_replacement: Option<&str>) -> OperatorSpec {
        match method {
            OperatorKind::Redact => OperatorSpec::Redact,
            OperatorKind::Replace => OperatorSpec::Replace {
                replacement: custom_replacement
                    .unwrap_or(&self.defaults.replacement)
                    .to_string(),
            },
            OperatorKind::Mask => OperatorSpec::Mask {
                mask_char: self.defaults.mask.mask_char,
                count: self.defaults.mask.count,
                anchor: self.defaults.mask.anchor,
            },
            OperatorKind::Hash => OperatorSpec::Hash,
            OperatorKind::Encrypt => OperatorSpec::Encrypt,
        }
    }
}
