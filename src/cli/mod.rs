//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for SecurePaste using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// SecurePaste - redact secrets and personal data from text
#[derive(Parser, Debug)]
#[command(name = "securepaste")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to settings file
    #[arg(short, long, default_value = "securepaste.toml", env = "SECUREPASTE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SECUREPASTE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize text and print the JSON response
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Detect sensitive spans without rewriting
    Detect(commands::detect::DetectArgs),

    /// Anonymize every file in a directory
    Batch(commands::batch::BatchArgs),

    /// Validate settings and an optional request file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new settings file
    Init(commands::init::InitArgs),
}
