//! Detection span data models

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved category naming the fallback operator
pub const DEFAULT_CATEGORY: &str = "DEFAULT";

/// Category of the built-in credential detector
pub const PASSWORD_CATEGORY: &str = "PASSWORD";

/// Detection method used to produce a span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectionMethod {
    /// A compiled pattern rule, identified by its name
    Pattern { rule: String },
    /// The semantic entity detector
    Semantic,
}

/// A detected occurrence of a sensitive category
///
/// Offsets are byte offsets into the original text and always fall on `char`
/// boundaries, with `start < end <= text.len()`.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSpan {
    /// Category label (e.g. `PASSWORD`, `EMAIL_ADDRESS`)
    pub category: String,
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Detection score (0.0 - 1.0)
    pub score: f32,
    /// The matched substring of the original text
    pub matched_text: String,
    /// Detector that produced this span
    pub detection_method: DetectionMethod,
}

impl DetectionSpan {
    /// Create a span over `text[start..end]`
    ///
    /// Returns `None` if the range is empty, out of bounds, or does not fall
    /// on `char` boundaries.
    pub fn from_text(
        category: impl Into<String>,
        text: &str,
        start: usize,
        end: usize,
        score: f32,
        detection_method: DetectionMethod,
    ) -> Option<Self> {
        if start >= end {
            return None;
        }
        let matched_text = text.get(start..end)?.to_string();
        Some(Self {
            category: category.into(),
            start,
            end,
            score: score.clamp(0.0, 1.0),
            matched_text,
            detection_method,
        })
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Spans are never empty; provided for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check whether two spans share at least one byte
    pub fn overlaps(&self, other: &DetectionSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

// Matched text is deliberately left out so spans can be logged with `?`.
impl fmt::Debug for DetectionSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DetectionSpan")
            .field("category", &self.category)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("score", &self.score)
            .field("detection_method", &self.detection_method)
            .finish_non_exhaustive()
    }
}
