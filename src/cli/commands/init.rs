//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! settings file.

use crate::anonymization::anonymizer::encryption::SpanCipher;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "securepaste.toml")]
    pub output: String,

    /// Include comments for every option
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing SecurePaste configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. For reversible encryption, add a key to your .env file:");
                println!(
                    "     SECUREPASTE_ENCRYPTION_KEY={}",
                    SpanCipher::generate_key_base64()
                );
                println!("     and uncomment `key` in the [encryption] section");
                println!("  3. Validate configuration: securepaste validate-config --request request.json");
                println!("  4. Run: securepaste anonymize --request request.json --input notes.txt");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# SecurePaste Configuration File

[application]
log_level = "info"

[engine]
default_replacement = "[REDACTED]"
detector_policy = "fail"

[engine.mask]
masking_char = "*"
chars_to_mask = 7
from_end = false

[encryption]
# key = "${SECUREPASTE_ENCRYPTION_KEY}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"

[audit]
enabled = false
log_path = "./audit/anonymization.log"
json_format = true
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# SecurePaste Configuration File
#
# Engine settings only. What to detect and how to rewrite it is sent with
# each request as JSON.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Engine Settings
# ============================================================================
[engine]
# Replacement for `replace` without custom_replacement and for categories
# that have no operator configured
default_replacement = "[REDACTED]"

# What to do when the semantic detector failed to load:
# - fail: fail requests that need it
# - regex_only: log a warning and use pattern rules only
detector_policy = "fail"

# Pattern library for the semantic detector (embedded library if unset)
# pattern_library = "patterns/entity_patterns.toml"

[engine.mask]
# Character written over masked characters
masking_char = "*"

# Number of characters to mask
chars_to_mask = 7

# Mask the last characters instead of the first ones
from_end = false

# ============================================================================
# Encryption
# ============================================================================
[encryption]
# Base64-encoded 32-byte AES key for the `encrypt` operator.
# Without a key, a random key is generated at startup and tokens can only be
# decrypted by the same process.
# key = "${SECUREPASTE_ENCRYPTION_KEY}"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false

# Log directory
local_path = "./logs"

# Log rotation (daily, hourly or never)
local_rotation = "daily"

# ============================================================================
# Audit Log
# ============================================================================
[audit]
# Append one entry per successful request. Values are stored as SHA-256 hashes.
enabled = false

# Audit log file
log_path = "./audit/anonymization.log"

# JSON lines (true) or plain text (false)
json_format = true
"#
        .to_string()
    }
}
