//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating the
//! SecurePaste settings file and, optionally, a request file.

use crate::anonymization::detector::patterns::{compile, SkipReason};
use crate::anonymization::engine::error_message;
use crate::anonymization::AnonymizationEngine;
use crate::config::load_config_or_default;
use clap::Args;
use std::path::{Path, PathBuf};

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also validate this JSON request file
    #[arg(short, long)]
    pub request: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        if !Path::new(config_path).exists() {
            println!("   File not found, checking defaults and environment overrides");
        }
        println!();

        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded successfully");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let engine = match AnonymizationEngine::new(&config) {
            Ok(engine) => engine,
            Err(e) => {
                println!("❌ Failed to create anonymization engine");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Default Replacement: {}", config.engine.default_replacement);
        println!("  Detector Policy: {}", config.engine.detector_policy);
        println!(
            "  Pattern Library: {}",
            config
                .engine
                .pattern_library
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "embedded".to_string())
        );
        println!(
            "  Semantic Detector: {}",
            if engine.semantic_available() { "available" } else { "unavailable" }
        );
        println!(
            "  Mask: '{}' x {} from {}",
            config.engine.mask.masking_char,
            config.engine.mask.chars_to_mask,
            if config.engine.mask.from_end { "end" } else { "start" }
        );
        println!(
            "  Encryption Key: {}",
            if config.encryption.key.is_some() { "configured" } else { "ephemeral" }
        );
        println!(
            "  Audit Log: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();

        match self.request {
            Some(ref path) => Ok(Self::validate_request(&engine, path)),
            None => Ok(0),
        }
    }

    fn validate_request(engine: &AnonymizationEngine, path: &Path) -> i32 {
        println!("🔍 Validating request file: {}", path.display());

        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                println!("❌ Failed to read request file");
                println!("   Error: {e}");
                return 2;
            }
        };

        let request = match engine.validate_request(&json) {
            Ok(request) => request,
            Err(e) => {
                println!("❌ Request validation failed");
                println!("   Error: {}", error_message(&e));
                return 2;
            }
        };

        println!("✅ Request is valid");
        println!();
        println!("Request Summary:");
        println!("  Language: {}", request.language);
        println!("  Confidence Threshold: {}", request.confidence_threshold);
        println!(
            "  Categories: {}",
            request.requested_categories().into_iter().collect::<Vec<_>>().join(", ")
        );
        println!("  Custom Patterns: {}", request.custom_patterns.len());

        for skipped in compile(&request.custom_patterns).skipped {
            let reason = match skipped.reason {
                SkipReason::Disabled => "disabled".to_string(),
                SkipReason::InvalidRegex(e) => format!("invalid regex: {e}"),
            };
            println!("  ⚠️  Pattern '{}' will be skipped ({reason})", skipped.name);
        }
        println!();
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_defaults() {
        let args = ValidateArgs { request: None };
        assert_eq!(args.execute("missing-settings.toml").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validate_bad_request() {
        let mut request = NamedTempFile::new().unwrap();
        request
            .write_all(br#"{"entities":[{"type":"PASSWORD","anonymization_method":"scramble"}]}"#)
            .unwrap();

        let args = ValidateArgs {
            request: Some(request.path().to_path_buf()),
        };
        assert_eq!(args.execute("missing-settings.toml").await.unwrap(), 2);
    }
}
