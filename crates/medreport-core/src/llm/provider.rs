//! Model client trait and request/response types.
//!
//! Defines the narrow interface the report processor talks to, plus the
//! factory that builds the configured client.

use crate::config::LlmConfig;
use crate::error::{ConfigError, ReportError};
use async_trait::async_trait;
use base64::Engine;
use std::sync::Arc;

/// Base64-encoded image ready to send inline.
#[derive(Debug, Clone, PartialEq)]
pub struct InlineImage {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub mime_type: String,
}

impl InlineImage {
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: mime_type.to_string(),
        }
    }
}

/// One piece of user content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image(InlineImage),
}

/// Content-moderation threshold applied to every harm category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafetyThreshold {
    /// Provider defaults
    #[default]
    Default,
    /// Never block; clinical vocabulary trips the stricter levels
    BlockNone,
}

/// A single generation call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,
    /// System instruction, if any
    pub system_instruction: Option<String>,
    /// User content, in order
    pub parts: Vec<ContentPart>,
    /// Requested response media type (e.g., "application/json")
    pub response_mime_type: Option<String>,
    /// Safety threshold for all harm categories
    pub safety: SafetyThreshold,
}

impl GenerateRequest {
    /// Plain single-prompt request with provider defaults.
    pub fn prompt(model: &str, text: &str) -> Self {
        Self {
            model: model.to_string(),
            system_instruction: None,
            parts: vec![ContentPart::Text(text.to_string())],
            response_mime_type: None,
            safety: SafetyThreshold::Default,
        }
    }
}

/// The response from a generation call.
#[derive(Debug, Clone)]
pub struct GenerateResponse {
    /// Generated text, possibly empty
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Capability every model backend implements.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Arc<dyn ModelClient>` to share one client across requests).
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Client name for logging (e.g., "gemini").
    fn name(&self) -> &str;

    /// Submit one request. Exactly one attempt is made.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ReportError>;
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Name of the environment variable an `${ENV_VAR}` value points at.
fn env_var_name(value: &str) -> &str {
    value
        .strip_prefix("${")
        .and_then(|v| v.strip_suffix('}'))
        .unwrap_or("GOOGLE_API_KEY")
}

/// Factory that creates the configured model client.
pub struct ModelClientFactory;

impl ModelClientFactory {
    /// Build a client from the `[llm]` config section.
    ///
    /// Fails when the provider is unknown or the API key cannot be resolved.
    pub fn create(config: &LlmConfig) -> Result<Arc<dyn ModelClient>, ConfigError> {
        match config.provider.as_str() {
            "gemini" => {
                let api_key =
                    resolve_env_var(&config.api_key).ok_or_else(|| ConfigError::MissingApiKey {
                        var: env_var_name(&config.api_key).to_string(),
                    })?;
                Ok(Arc::new(super::gemini::GeminiClient::new(
                    &config.endpoint,
                    &api_key,
                )))
            }
            other => Err(ConfigError::UnknownProvider(other.to_string())),
        }
    }
}
