//! Span detection module
//!
//! Two kinds of detectors feed the pipeline:
//! - pattern rules ([`patterns`], scanned by [`regex::RegexDetector`]), rebuilt per
//!   request from the built-in credential set plus the request's custom patterns
//! - a [`SemanticDetector`], an external entity-recognition capability consumed
//!   through a narrow trait ([`semantic::PatternSemanticDetector`] is the
//!   stand-in shipped with the crate)
//!
//! [`registry::DetectorRegistry`] composes both into one logical detector.

pub mod patterns;
pub mod regex;
pub mod registry;
pub mod semantic;

use crate::domain::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use registry::DetectorRegistry;

/// Entity categories handled by semantic detectors
///
/// While the semantic detector is unavailable, only these categories need it;
/// any other category without a pattern rule is unknown and yields no spans.
pub const SEMANTIC_CATEGORIES: &[&str] = &[
    "CREDIT_CARD",
    "CRYPTO",
    "DATE_TIME",
    "EMAIL_ADDRESS",
    "IBAN_CODE",
    "IP_ADDRESS",
    "LOCATION",
    "MEDICAL_LICENSE",
    "NRP",
    "PERSON",
    "PHONE_NUMBER",
    "URL",
    "US_BANK_NUMBER",
    "US_DRIVER_LICENSE",
    "US_ITIN",
    "US_PASSPORT",
    "US_SSN",
];

/// Whether `category` is one a semantic detector would be asked for
pub fn is_semantic_category(category: &str) -> bool {
    SEMANTIC_CATEGORIES.contains(&category)
}

/// A span reported by a semantic detector
///
/// Offsets are byte offsets into the analyzed text.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticSpan {
    /// Category label
    pub category: String,
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Detection score (0.0 - 1.0)
    pub score: f32,
}

/// External entity-recognition capability
///
/// Implementations must be safe to call from several requests at once.
/// Calls are blocking; callers that need a deadline impose it themselves.
pub trait SemanticDetector: Send + Sync {
    /// Categories this detector can recognize
    fn supported_categories(&self) -> Vec<String>;

    /// Find spans of `categories` in `text` scoring at least `score_threshold`
    fn analyze(
        &self,
        text: &str,
        categories: &[String],
        language: &str,
        score_threshold: f32,
    ) -> Result<Vec<SemanticSpan>>;
}

/// State of the semantic detector an engine was built with
#[derive(Clone)]
pub enum SemanticBackend {
    /// The detector initialized and can be called
    Available(Arc<dyn SemanticDetector>),
    /// The detector failed to initialize
    Unavailable(String),
}

impl SemanticBackend {
    /// Check whether the detector can be called
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl fmt::Debug for SemanticBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(_) => f.write_str("SemanticBackend::Available"),
            Self::Unavailable(reason) => write!(f, "SemanticBackend::Unavailable({reason})"),
        }
    }
}

/// What to do when the semantic detector is unavailable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorPolicy {
    /// Fail requests that need the semantic detector
    #[default]
    Fail,
    /// Log a warning and run pattern rules only
    RegexOnly,
}

impl fmt::Display for DetectorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fail => write!(f, "fail"),
            Self::RegexOnly => write!(f, "regex_only"),
        }
    }
}
