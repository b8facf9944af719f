//! Anonymization operator models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator method named in a request (`anonymization_method`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// Remove the matched text entirely
    Redact,
    /// Substitute a replacement literal
    Replace,
    /// Hide part of the matched text behind a mask character
    Mask,
    /// Substitute a one-way digest
    Hash,
    /// Substitute a reversible ciphertext
    Encrypt,
}

impl OperatorKind {
    /// All known operator kinds
    pub const ALL: [OperatorKind; 5] = [
        Self::Redact,
        Self::Replace,
        Self::Mask,
        Self::Hash,
        Self::Encrypt,
    ];

    /// Request-level name of this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redact => "redact",
            Self::Replace => "replace",
            Self::Mask => "mask",
            Self::Hash => "hash",
            Self::Encrypt => "encrypt",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown anonymization method: {s}"))
    }
}

/// Which end of the matched text a mask is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskAnchor {
    /// Mask the leading characters
    Start,
    /// Mask the trailing characters
    End,
}

/// A fully resolved operator for one category
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorSpec {
    /// Elide the matched text
    Redact,
    /// Substitute `replacement`
    Replace { replacement: String },
    /// Replace `count` characters at `anchor` with `mask_char`
    Mask {
        mask_char: char,
        count: usize,
        anchor: MaskAnchor,
    },
    /// Substitute the SHA-256 hex digest of the matched text
    Hash,
    /// Substitute the base64 AES-GCM ciphertext of the matched text
    Encrypt,
}

impl OperatorSpec {
    /// The operator kind this spec was built from
    pub fn kind(&self) -> OperatorKind {
        match self {
            Self::Redact => OperatorKind::Redact,
            Self::Replace { .. } => OperatorKind::Replace,
            Self::Mask { .. } => OperatorKind::Mask,
            Self::Hash => OperatorKind::Hash,
            Self::Encrypt => OperatorKind::Encrypt,
        }
    }
}
