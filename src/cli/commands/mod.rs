//! CLI command implementations
//!
//! Commands that process text share [`RequestArgs`] for locating the request
//! JSON and the input text.

pub mod anonymize;
pub mod batch;
pub mod detect;
pub mod init;
pub mod validate;

use crate::anonymization::AnonymizationEngine;
use crate::config::load_config_or_default;
use anyhow::Context;
use clap::Args;
use std::io::Read;
use std::path::PathBuf;

/// Request and input arguments for single-text commands
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// JSON request file (entities, custom_patterns, threshold, language)
    #[arg(short, long)]
    pub request: PathBuf,

    /// Read the text from a file instead of stdin
    #[arg(short, long, conflicts_with = "text")]
    pub input: Option<PathBuf>,

    /// Text to process
    #[arg(short, long)]
    pub text: Option<String>,
}

impl RequestArgs {
    /// Read the request JSON
    pub fn read_request(&self) -> anyhow::Result<String> {
        std::fs::read_to_string(&self.request)
            .with_context(|| format!("Failed to read request file: {}", self.request.display()))
    }

    /// Read the text from `--text`, `--input` or stdin
    pub fn read_text(&self) -> anyhow::Result<String> {
        if let Some(ref text) = self.text {
            return Ok(text.clone());
        }
        if let Some(ref path) = self.input {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {}", path.display()));
        }

        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read text from stdin")?;
        Ok(text)
    }
}

/// Load settings from `config_path` (defaults if missing) and build the engine
pub fn build_engine(config_path: &str) -> anyhow::Result<AnonymizationEngine> {
    let config = load_config_or_default(config_path)
        .with_context(|| format!("Failed to load settings from {config_path}"))?;
    AnonymizationEngine::new(&config).context("Failed to create anonymization engine")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_text_argument_wins() {
        let args = RequestArgs {
            request: PathBuf::from("request.json"),
            input: None,
            text: Some("pwd=hunter2000".to_string()),
        };
        assert_eq!(args.read_text().unwrap(), "pwd=hunter2000");
    }

    #[test]
    fn test_read_input_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"mail bob@example.com").unwrap();

        let args = RequestArgs {
            request: PathBuf::from("request.json"),
            input: Some(file.path().to_path_buf()),
            text: None,
        };
        assert_eq!(args.read_text().unwrap(), "mail bob@example.com");
    }

    #[test]
    fn test_missing_request_file() {
        let args = RequestArgs {
            request: PathBuf::from("no-such-request.json"),
            input: None,
            text: None,
        };
        let err = args.read_request().unwrap_err();
        assert!(format!("{err:#}").contains("no-such-request.json"));
    }
}
