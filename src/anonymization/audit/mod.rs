//! Audit trail of applied rewrites
//!
//! One entry per successful request, with SHA-256 hashes in place of the
//! rewritten values.

pub mod logger;

pub use logger::AuditLogger;
