//! Anonymization and batch reports

use crate::anonymization::models::{DetectionSpan, OperatorKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of rewriting one text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizationReport {
    /// Rewritten text
    pub anonymized_text: String,
    /// Applied spans per category
    pub counts: BTreeMap<String, usize>,
    /// Applied spans in text order, echoed for audit
    pub spans: Vec<DetectionSpan>,
    /// Operator applied to each category that had a span
    pub operators: BTreeMap<String, OperatorKind>,
}

impl AnonymizationReport {
    /// Report for a text with no applied spans
    pub fn unchanged(text: &str) -> Self {
        Self {
            anonymized_text: text.to_string(),
            counts: BTreeMap::new(),
            spans: Vec::new(),
            operators: BTreeMap::new(),
        }
    }

    /// Total number of applied spans
    pub fn total(&self) -> usize {
        self.spans.len()
    }
}

/// A file the batch command could not anonymize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Input file
    pub file: String,
    /// Error message
    pub error: String,
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// Files processed (successful or not)
    pub total_files: usize,

    /// Files anonymized and written
    pub succeeded: usize,

    /// Applied spans across all successful files
    pub total_entities: usize,

    /// Applied spans per category across all successful files
    pub entities_by_category: BTreeMap<String, usize>,

    /// Files that failed
    pub failures: Vec<BatchFailure>,

    /// Files not started because of a shutdown signal
    pub skipped: usize,

    /// Wall-clock duration (ms)
    pub duration_ms: u64,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successfully anonymized file
    pub fn add_success(&mut self, report: &AnonymizationReport) {
        self.total_files += 1;
        self.succeeded += 1;
        for (category, count) in &report.counts {
            self.total_entities += count;
            *self.entities_by_category.entry(category.clone()).or_insert(0) += count;
        }
    }

    /// Record a failed file
    pub fn add_failure(&mut self, file: impl Into<String>, error: impl Into<String>) {
        self.total_files += 1;
        self.failures.push(BatchFailure {
            file: file.into(),
            error: error.into(),
        });
    }

    /// Whether every processed file succeeded
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                  SECUREPASTE BATCH REPORT                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!("  Files Processed:        {}\n", self.total_files));
        output.push_str(&format!("  Files Anonymized:       {}\n", self.succeeded));
        output.push_str(&format!("  Files Failed:           {}\n", self.failures.len()));
        if self.skipped > 0 {
            output.push_str(&format!("  Files Skipped:          {}\n", self.skipped));
        }
        output.push_str(&format!("  Total Entities Applied: {}\n", self.total_entities));
        output.push_str(&format!("  Duration:               {} ms\n", self.duration_ms));
        output.push('\n');

        if !self.entities_by_category.is_empty() {
            output.push_str("🔍 ENTITIES BY CATEGORY\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");

            let mut categories: Vec<_> = self.entities_by_category.iter().collect();
            categories.sort_by(|a, b| b.1.cmp(a.1));

            for (category, count) in categories {
                output.push_str(&format!("  {category:30} {count:>5}\n"));
            }
            output.push('\n');
        }

        if !self.failures.is_empty() {
            output.push_str("⚠️  FAILURES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for failure in &self.failures {
                output.push_str(&format!("  • {}: {}\n", failure.file, failure.error));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
