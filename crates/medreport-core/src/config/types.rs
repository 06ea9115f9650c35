//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// LLM provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider identifier. Only "gemini" is supported.
    pub provider: String,

    /// API key, or a `${ENV_VAR}` reference resolved at startup
    pub api_key: String,

    /// Base URL of the Generative Language API (without the `/models` suffix)
    pub endpoint: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            api_key: "${GOOGLE_API_KEY}".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

/// Default model identifiers per entry point.
///
/// The three entry points historically shipped with different defaults.
/// They are kept as-is but made explicit so they can be aligned in config.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model used by the command-line adapter when `--model` is omitted
    pub cli: String,

    /// Model used by `POST /process` when the body has no `model`
    pub text: String,

    /// Model used by `POST /process-image` when the form has no `model`
    pub image: String,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            cli: "gemini-1.5-flash-latest".to_string(),
            text: "gemini-2.5-flash".to_string(),
            image: "gemini-flash-latest".to_string(),
        }
    }
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Maximum request body size in megabytes (image uploads)
    pub max_upload_mb: u64,

    /// Allow cross-origin requests from any origin
    pub cors: bool,

    /// Directory of static frontend files served for unmatched GET paths
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_mb: 20,
            cors: true,
            static_dir: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,

    /// Log format ("pretty" or "json")
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
