//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console logs on stderr, so stdout only carries command output
//! - Configurable log levels
//! - JSON file logging with rotation
//!
//! Log events carry categories, counts and offsets. Span values never reach
//! the logs; the audit log stores their hashes instead.
//!
//! # Example
//!
//! ```no_run
//! use securepaste::logging::init_logging;
//! use securepaste::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the progress of a batch run
///
/// # Example
///
/// ```no_run
/// use securepaste::log_batch_progress;
///
/// log_batch_progress!(10, 250);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / $total as f64 * 100.0),
            "Processing files"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use securepaste::log_error_with_context;
/// use securepaste::domain::SecurePasteError;
///
/// let error = SecurePasteError::Settings("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::SecurePasteError;

    #[test]
    fn test_macros_expand() {
        let error = SecurePasteError::Settings("bad".to_string());
        crate::log_error_with_context!(&error, "loading settings");
        crate::log_batch_progress!(1, 4);
    }
}
