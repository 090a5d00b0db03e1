//! Error types for the engineer's fallible edges.
//!
//! The analysis core itself never fails: bad participant indices, empty
//! history and clock resets are absorbed into neutral values. Errors only
//! surface where the crate touches the outside world, namely configuration
//! files, recorded telemetry and sample providers.
//!
//! ## Error Categories
//!
//! - **Config Errors**: Invalid or inconsistent threshold configuration
//! - **File Errors**: Problems reading configuration or replay files
//! - **Parse Errors**: YAML that does not describe the expected structure
//! - **Provider Errors**: A telemetry source failed to deliver a sample
//! - **Sample Errors**: A sample rejected at the ingestion boundary
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use race_engineer::EngineerError;
//!
//! let error = EngineerError::provider_failed("shared memory not mapped");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for engineer operations.
pub type Result<T, E = EngineerError> = std::result::Result<T, E>;

/// Main error type for engineer operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EngineerError {
    #[error("Invalid configuration: {reason}")]
    Config { reason: String },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("Telemetry provider failed: {reason}")]
    Provider {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    #[error("Invalid telemetry sample field '{field}': {details}")]
    InvalidSample { field: String, details: String },
}

impl EngineerError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineerError::Provider { .. } => true,
            EngineerError::Timeout { .. } => true,
            EngineerError::InvalidSample { .. } => true,
            EngineerError::Config { .. } => false,
            EngineerError::File { .. } => false,
            EngineerError::Parse { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            EngineerError::Config { .. } => vec![
                "Check that every minimum threshold is below its maximum",
                "Ensure window and sample rate values are positive",
                "Remove the offending key to fall back to the default",
            ],
            EngineerError::File { .. } => vec![
                "Check file exists and is readable",
                "Check file permissions",
            ],
            EngineerError::Parse { .. } => vec![
                "Check the YAML indentation and key names",
                "Compare against a freshly exported default configuration",
            ],
            EngineerError::Provider { .. } => vec![
                "Ensure the simulator is running",
                "Enable shared memory output in the simulator options",
                "Try reconnecting after the session has loaded",
            ],
            EngineerError::Timeout { .. } => vec![
                "Increase timeout duration",
                "Verify the simulator is responding",
            ],
            EngineerError::InvalidSample { .. } => vec![
                "Skip the sample and wait for the next refresh",
                "Verify the shared memory layout version",
            ],
        }
    }

    /// Helper constructor for configuration errors.
    pub fn config_error(reason: impl Into<String>) -> Self {
        EngineerError::Config { reason: reason.into() }
    }

    /// Helper constructor for file errors.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        EngineerError::File { path, source }
    }

    /// Helper constructor for provider failures without an underlying cause.
    pub fn provider_failed(reason: impl Into<String>) -> Self {
        EngineerError::Provider { reason: reason.into(), source: None }
    }

    /// Helper constructor for provider failures wrapping an underlying cause.
    pub fn provider_failed_with_source(
        reason: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EngineerError::Provider { reason: reason.into(), source: Some(Box::new(source)) }
    }

    /// Helper constructor for samples rejected at ingestion.
    pub fn invalid_sample(field: impl Into<String>, details: impl Into<String>) -> Self {
        EngineerError::InvalidSample { field: field.into(), details: details.into() }
    }
}

impl From<std::io::Error> for EngineerError {
    fn from(err: std::io::Error) -> Self {
        EngineerError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

impl From<serde_yaml_ng::Error> for EngineerError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        EngineerError::Parse { context: "YAML deserialization".to_string(), details: err.to_string() }
    }
}
