//! Batch command implementation
//!
//! Anonymizes every regular file in a directory with one shared engine.
//! Files are processed on the blocking pool with bounded concurrency. Once a
//! shutdown signal is received no new file is started; files already running
//! finish and are written.

use super::build_engine;
use crate::anonymization::{AnonymizationConfig, AnonymizationEngine, AnonymizationReport, BatchReport};
use anyhow::Context;
use clap::Args;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Default number of files processed concurrently
pub const DEFAULT_PARALLEL: usize = 4;

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// JSON request file applied to every input file
    #[arg(short, long)]
    pub request: PathBuf,

    /// Directory of input text files
    #[arg(long)]
    pub input_dir: PathBuf,

    /// Directory for anonymized output files
    #[arg(long)]
    pub output_dir: PathBuf,

    /// Number of files processed concurrently
    #[arg(short, long, default_value_t = DEFAULT_PARALLEL)]
    pub parallel: usize,

    /// Write the batch report as JSON to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

enum FileOutcome {
    Succeeded(AnonymizationReport),
    Failed { file: String, error: String },
    Skipped,
}

impl BatchArgs {
    /// Execute the batch command
    ///
    /// Exit codes: 0 all files written, 2 unreadable settings or request,
    /// 3 some files failed or were skipped.
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(input_dir = %self.input_dir.display(), "Starting batch command");

        let engine = match build_engine(config_path) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("❌ {e:#}");
                return Ok(2);
            }
        };

        let request = std::fs::read_to_string(&self.request)
            .with_context(|| format!("Failed to read request file: {}", self.request.display()))
            .and_then(|json| engine.validate_request(&json).map_err(anyhow::Error::from));
        let request = match request {
            Ok(request) => request,
            Err(e) => {
                eprintln!("❌ {e:#}");
                return Ok(2);
            }
        };

        println!("🚀 Anonymizing files in {}", self.input_dir.display());
        println!();

        let report = run_batch(
            Arc::new(engine),
            Arc::new(request),
            &self.input_dir,
            &self.output_dir,
            self.parallel,
            shutdown_signal,
        )
        .await?;

        println!("{}", report.format_console());

        if let Some(ref path) = self.report {
            report
                .write_to_file(path)
                .with_context(|| format!("Failed to write batch report: {}", path.display()))?;
            println!("📄 Report written to {}", path.display());
        }

        Ok(if report.is_success() && report.skipped == 0 { 0 } else { 3 })
    }
}

/// Anonymize every regular file of `input_dir` into `output_dir`
///
/// Output files keep their input file name. A failed file is recorded in the
/// report and nothing is written for it.
pub async fn run_batch(
    engine: Arc<AnonymizationEngine>,
    request: Arc<AnonymizationConfig>,
    input_dir: &Path,
    output_dir: &Path,
    parallel: usize,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<BatchReport> {
    let start = Instant::now();

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;
    let files = list_input_files(input_dir)?;
    let total = files.len();

    let outcomes: Vec<FileOutcome> = stream::iter(files.into_iter().enumerate())
        .map(|(index, path)| {
            let engine = Arc::clone(&engine);
            let request = Arc::clone(&request);
            let output_dir = output_dir.to_path_buf();
            let shutdown_signal = shutdown_signal.clone();

            async move {
                if *shutdown_signal.borrow() {
                    return FileOutcome::Skipped;
                }
                crate::log_batch_progress!(index + 1, total);

                let file = file_label(&path);
                let result = tokio::task::spawn_blocking(move || {
                    anonymize_file(&engine, &request, &path, &output_dir)
                })
                .await;

                match result {
                    Ok(Ok(report)) => FileOutcome::Succeeded(report),
                    Ok(Err(e)) => FileOutcome::Failed {
                        file,
                        error: format!("{e:#}"),
                    },
                    Err(e) => FileOutcome::Failed {
                        file,
                        error: format!("Worker task failed: {e}"),
                    },
                }
            }
        })
        .buffer_unordered(parallel.max(1))
        .collect()
        .await;

    let mut report = BatchReport::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Succeeded(file_report) => report.add_success(&file_report),
            FileOutcome::Failed { file, error } => {
                tracing::warn!(file = %file, error = %error, "File failed");
                report.add_failure(file, error);
            }
            FileOutcome::Skipped => report.skipped += 1,
        }
    }
    report.duration_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        total_files = report.total_files,
        succeeded = report.succeeded,
        failed = report.failures.len(),
        skipped = report.skipped,
        duration_ms = report.duration_ms,
        "Batch completed"
    );

    Ok(report)
}

fn anonymize_file(
    engine: &AnonymizationEngine,
    request: &AnonymizationConfig,
    path: &Path,
    output_dir: &Path,
) -> anyhow::Result<AnonymizationReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let report = engine.anonymize(&text, request)?;

    let name = path
        .file_name()
        .with_context(|| format!("Input path has no file name: {}", path.display()))?;
    let output = output_dir.join(name);
    std::fs::write(&output, &report.anonymized_text)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(report)
}

/// Regular files directly inside `dir`, sorted by path
fn list_input_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory: {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", dir.display()))?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
