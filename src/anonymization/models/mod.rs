//! Data models for detection and anonymization

pub mod operator;
pub mod span;

pub use operator::{MaskAnchor, OperatorKind, OperatorSpec};
pub use span::{DetectionMethod, DetectionSpan, DEFAULT_CATEGORY, PASSWORD_CATEGORY};
