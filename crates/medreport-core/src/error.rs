//! Error types for the report simplifier.
//!
//! Configuration problems are fatal at startup. Report errors cover everything
//! that can go wrong between receiving input and getting text back from the
//! model; the processor turns those into error outcomes instead of faults.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for medreport operations.
#[derive(Error, Debug)]
pub enum MedReportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input or model-call errors
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No API credential could be resolved
    #[error("{var} not found in environment variables or config file")]
    MissingApiKey { var: String },

    /// The configured provider is not one we can talk to
    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),
}

/// Errors raised while preparing input or calling the model.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Input file could not be read
    #[error("Error reading file {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Bytes could not be decoded as an image
    #[error("Cannot decode image: {message}")]
    ImageDecode { message: String },

    /// Model call failed (transport, HTTP status, blocked prompt, bad envelope)
    #[error("{message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },
}

/// Convenience type alias for medreport results.
pub type Result<T> = std::result::Result<T, MedReportError>;

/// Convenience type alias for report-level results.
pub type ReportResult<T> = std::result::Result<T, ReportError>;
