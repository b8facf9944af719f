//! Integration tests for settings loading and validation
//!
//! Tests that modify environment variables hold `ENV_MUTEX`.

use securepaste::anonymization::anonymizer::encryption::SpanCipher;
use securepaste::anonymization::detector::DetectorPolicy;
use securepaste::anonymization::AnonymizationEngine;
use securepaste::config::{load_config, load_config_or_default};
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

// Mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("SECUREPASTE_ENGINE_DETECTOR_POLICY");
    std::env::remove_var("SECUREPASTE_ENGINE_DEFAULT_REPLACEMENT");
    std::env::remove_var("SECUREPASTE_ENCRYPTION_KEY");
    std::env::remove_var("TEST_SECUREPASTE_KEY");
}

fn settings_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = settings_file(
        r##"
[application]
log_level = "debug"

[engine]
default_replacement = "<hidden>"
detector_policy = "regex_only"

[engine.mask]
masking_char = "#"
chars_to_mask = 3
from_end = true

[logging]
local_enabled = false
local_rotation = "hourly"

[audit]
enabled = false
json_format = false
"##,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.engine.default_replacement, "<hidden>");
    assert_eq!(config.engine.detector_policy, DetectorPolicy::RegexOnly);
    assert_eq!(config.engine.mask.chars_to_mask, 3);
    assert_eq!(config.logging.local_rotation, "hourly");
    assert!(!config.audit.json_format);
}

#[test]
fn test_settings_drive_operators() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = settings_file(
        r##"
[engine]
default_replacement = "<hidden>"

[engine.mask]
masking_char = "#"
chars_to_mask = 3
from_end = true
"##,
    );
    let engine = AnonymizationEngine::new(&load_config(file.path()).unwrap()).unwrap();

    let mask = engine
        .validate_request(r#"{"entities":[{"type":"PASSWORD","anonymization_method":"mask"}]}"#)
        .unwrap();
    assert_eq!(engine.anonymize("pwd=hunter2000", &mask).unwrap().anonymized_text, "pwd=hunter2###");

    let fallback = engine.validate_request(r#"{"entities":[{"type":"PASSWORD"}]}"#).unwrap();
    assert_eq!(
        engine.anonymize("pwd=hunter2000", &fallback).unwrap().anonymized_text,
        "pwd=<hidden>"
    );
}

#[test]
fn test_encryption_key_from_env_substitution() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let key = SpanCipher::generate_key_base64();
    std::env::set_var("TEST_SECUREPASTE_KEY", &key);
    let file = settings_file("[encryption]\nkey = \"${TEST_SECUREPASTE_KEY}\"\n");

    let config = load_config(file.path()).unwrap();
    let first = AnonymizationEngine::new(&config).unwrap();
    let second = AnonymizationEngine::new(&config).unwrap();

    let request = first
        .validate_request(r#"{"entities":[{"type":"PASSWORD","anonymization_method":"encrypt"}]}"#)
        .unwrap();
    let report = first.anonymize("pwd=hunter2000", &request).unwrap();
    let token = report.anonymized_text.strip_prefix("pwd=").unwrap();

    assert_eq!(second.decrypt(token).unwrap(), "hunter2000");
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = settings_file("[encryption]\nkey = \"${TEST_SECUREPASTE_KEY}\"\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(err.to_string().contains("TEST_SECUREPASTE_KEY"));
}

#[test]
fn test_env_overrides_applied() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    std::env::set_var("SECUREPASTE_ENGINE_DETECTOR_POLICY", "regex_only");
    std::env::set_var("SECUREPASTE_ENGINE_DEFAULT_REPLACEMENT", "***");
    let config = load_config_or_default("no-such-securepaste.toml").unwrap();

    assert_eq!(config.engine.detector_policy, DetectorPolicy::RegexOnly);
    assert_eq!(config.engine.default_replacement, "***");
    cleanup_env_vars();
}

#[test]
fn test_invalid_settings_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = settings_file("[logging]\nlocal_rotation = \"weekly\"\n");
    assert!(load_config(file.path()).is_err());

    let file = settings_file("[encryption]\nkey = \"c2hvcnQ=\"\n");
    let config = load_config(file.path()).unwrap();
    assert!(AnonymizationEngine::new(&config).is_err());
}

#[test]
fn test_missing_pattern_library_is_unavailable() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = settings_file("[engine]\npattern_library = \"/no/such/library.toml\"\n");
    let engine = AnonymizationEngine::new(&load_config(file.path()).unwrap()).unwrap();
    assert!(!engine.semantic_available());

    // pattern rules still cover PASSWORD
    let response = engine.anonymize_text(
        "pwd=hunter2000",
        r#"{"entities":[{"type":"PASSWORD","anonymization_method":"redact"}]}"#,
    );
    assert!(response.contains(r#""success":true"#));
}
