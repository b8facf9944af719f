//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SecurePasteConfig;
use super::secret::secret_string;
use crate::anonymization::detector::DetectorPolicy;
use crate::domain::errors::SecurePasteError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SecurePasteConfig
/// 4. Applies environment variable overrides (SECUREPASTE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`SecurePasteError::Settings`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use securepaste::config::loader::load_config;
///
/// let config = load_config("securepaste.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SecurePasteConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SecurePasteError::Settings(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SecurePasteError::Settings(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut config = parse_config(&contents)?;
    apply_env_overrides(&mut config)?;
    finish(config)
}

/// Loads configuration from `path` if it exists, otherwise uses defaults
///
/// Environment overrides and validation apply either way.
pub fn load_config_or_default(path: impl AsRef<Path>) -> Result<SecurePasteConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "Configuration file not found, using defaults");
    let mut config = SecurePasteConfig::default();
    apply_env_overrides(&mut config)?;
    finish(config)
}

/// Parses TOML content after environment variable substitution
pub fn parse_config(contents: &str) -> Result<SecurePasteConfig> {
    let contents = substitute_env_vars(contents)?;
    toml::from_str(&contents)
        .map_err(|e| SecurePasteError::Settings(format!("Failed to parse TOML: {}", e)))
}

fn finish(config: SecurePasteConfig) -> Result<SecurePasteConfig> {
    config.validate().map_err(|e| {
        SecurePasteError::Settings(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied unchanged.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| SecurePasteError::Settings(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(SecurePasteError::Settings(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using SECUREPASTE_* prefix
///
/// Environment variables follow the pattern: SECUREPASTE_<SECTION>_<KEY>
/// For example: SECUREPASTE_ENGINE_DETECTOR_POLICY, SECUREPASTE_AUDIT_ENABLED
fn apply_env_overrides(config: &mut SecurePasteConfig) -> Result<()> {
    apply_overrides_from(config, |name| std::env::var(name).ok())
}

fn apply_overrides_from(
    config: &mut SecurePasteConfig,
    var: impl Fn(&str) -> Option<String>,
) -> Result<()> {
    // Application overrides
    if let Some(val) = var("SECUREPASTE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Engine overrides
    if let Some(val) = var("SECUREPASTE_ENGINE_DEFAULT_REPLACEMENT") {
        config.engine.default_replacement = val;
    }
    if let Some(val) = var("SECUREPASTE_ENGINE_DETECTOR_POLICY") {
        config.engine.detector_policy = match val.as_str() {
            "fail" => DetectorPolicy::Fail,
            "regex_only" => DetectorPolicy::RegexOnly,
            other => {
                return Err(SecurePasteError::Settings(format!(
                    "Invalid SECUREPASTE_ENGINE_DETECTOR_POLICY '{other}'. Must be one of: fail, regex_only"
                )))
            }
        };
    }
    if let Some(val) = var("SECUREPASTE_ENGINE_PATTERN_LIBRARY") {
        config.engine.pattern_library = Some(PathBuf::from(val));
    }

    // Encryption overrides
    if let Some(val) = var("SECUREPASTE_ENCRYPTION_KEY") {
        config.encryption.key = Some(secret_string(val));
    }

    // Logging overrides
    if let Some(val) = var("SECUREPASTE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = var("SECUREPASTE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }

    // Audit overrides
    if let Some(val) = var("SECUREPASTE_AUDIT_ENABLED") {
        config.audit.enabled = val.parse().unwrap_or(false);
    }
    if let Some(val) = var("SECUREPASTE_AUDIT_LOG_PATH") {
        config.audit.log_path = PathBuf::from(val);
    }

    Ok(())
}
