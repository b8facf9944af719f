//! Detect command implementation
//!
//! Runs detection without rewriting. Overlapping spans are all printed, in
//! the order the rewrite step would consider them.

use super::{build_engine, RequestArgs};
use crate::anonymization::engine::error_message;
use crate::anonymization::response::{analyzer_results, AnonymizationResponse};
use clap::Args;
use serde_json::json;

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

impl DetectArgs {
    /// Execute the detect command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let engine = match build_engine(config_path) {
            Ok(engine) => engine,
            Err(e) => {
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

        let spans = engine
            .validate_request(&request)
            .and_then(|config| engine.detect(&text, &config));

        match spans {
            Ok(spans) => {
                tracing::info!(spans = spans.len(), "Detection completed");
                let output = json!({
                    "success": true,
                    "total_entities": spans.len(),
                    "analyzer_results": analyzer_results(&text, &spans),
                });
                println!("{output}");
                Ok(0)
            }
            Err(e) => {
                println!("{}", AnonymizationResponse::failure(&text, error_message(&e)).to_json());
                Ok(3)
            }
        }
    }
}
