//! Audit logger for anonymization requests

use crate::anonymization::anonymizer::hash::sha256_hex;
use crate::anonymization::models::{DetectionMethod, DetectionSpan, OperatorKind};
use crate::anonymization::report::AnonymizationReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: DateTime<Utc>,
    request_id: Uuid,
    total_entities: usize,
    entities_found: BTreeMap<String, usize>,
    spans: Vec<AuditSpan>,
}

/// Audit span entry (with hashed value)
#[derive(Debug, Serialize)]
struct AuditSpan {
    category: String,
    start: usize,
    end: usize,
    score: f32,
    method: String,
    operator: Option<OperatorKind>,
    /// SHA-256 hash of the matched text (never log plaintext)
    value_hash: String,
}

/// Audit logger for anonymization requests
///
/// Appends one line per successful request. Writes are serialized so
/// concurrent requests never interleave partial lines.
#[derive(Debug)]
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Log a completed anonymization
    pub fn log_anonymization(&self, request_id: Uuid, report: &AnonymizationReport) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: Utc::now(),
            request_id,
            total_entities: report.total(),
            entities_found: report.counts.clone(),
            spans: report
                .spans
                .iter()
                .map(|span| Self::audit_span(span, report.operators.get(&span.category).copied()))
                .collect(),
        };

        self.write_entry(&entry)
    }

    fn audit_span(span: &DetectionSpan, operator: Option<OperatorKind>) -> AuditSpan {
        AuditSpan {
            category: span.category.clone(),
            start: span.start,
            end: span.end,
            score: span.score,
            method: match &span.detection_method {
                DetectionMethod::Pattern { rule } => format!("pattern:{rule}"),
                DetectionMethod::Semantic => "semantic".to_string(),
            },
            operator,
            value_hash: sha256_hex(&span.matched_text),
        }
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry).context("Failed to serialize audit entry")?
        } else {
            let categories = entry
                .entities_found
                .iter()
                .map(|(category, count)| format!("{category}={count}"))
                .collect::<Vec<_>>()
                .join(",");
            format!(
                "[{}] Request: {} | Entities: {} | Categories: {}",
                entry.timestamp.to_rfc3339(),
                entry.request_id,
                entry.total_entities,
                if categories.is_empty() { "-" } else { &categories }
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Audit log lock poisoned"))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;
        writeln!(file, "{line}").context("Failed to write audit entry")?;

        Ok(())
    }
}
