//! Error types for the Kaizen effectiveness analyzer
//!
//! Missing input files are not errors (they fall back to defaults); everything
//! that can actually fail a cycle is collected here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the analyzer
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Input file exists but is not valid JSON for its document type
    #[error("Malformed input {}: {reason}", path.display())]
    MalformedInput { path: PathBuf, reason: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Chart rendering errors
    #[error("Chart rendering failed: {0}")]
    ChartError(String),
}

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, AnalyzerError>;
