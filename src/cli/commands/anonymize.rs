//! Anonymize command implementation
//!
//! Prints the response JSON on stdout. Diagnostics go to stderr.

use super::{build_engine, RequestArgs};
use clap::Args;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
pub struct AnonymizeArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Pretty-print the response
    #[arg(long)]
    pub pretty: bool,
}

impl AnonymizeArgs {
    /// Execute the anonymize command
    ///
    /// Exit codes: 0 success, 2 unreadable settings or request, 3 failure response.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let engine = match build_engine(config_path) {
            Ok(engine) => engine,
            Err(e) => {
                tracing::error!(error = %format!("{e:#}"), "Failed to initialize");
                eprintln!("❌ {e:#}");
                return Ok(2);
            }
        };

        let request = match self.request.read_request() {
            Ok(request) => request,
            Err(e) => {
                eprintln!("❌ {e:#}");
                return Ok(2);
            }
        };
        let text = self.request.read_text()?;

        let response = engine.respond(&text, &request);
        if self.pretty {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", response.to_json());
        }

        Ok(if response.is_success() { 0 } else { 3 })
    }
}
