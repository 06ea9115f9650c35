//! Model client integration.
//!
//! Provides a narrow client abstraction over the generative model API and the
//! Gemini REST implementation behind it.

pub(crate) mod gemini;
pub(crate) mod provider;

pub use gemini::GeminiClient;
pub use provider::{
    resolve_env_var, ContentPart, GenerateRequest, GenerateResponse, InlineImage, ModelClient,
    ModelClientFactory, SafetyThreshold,
};
