//! Model availability probe.
//!
//! Tries candidate model identifiers in order with a trivial prompt and stops
//! at the first one that answers. Useful when a model alias has been retired
//! and the configured defaults start failing.

use crate::llm::{GenerateRequest, ModelClient};

/// Candidates tried when none are given.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-pro",
    "gemini-2.5-flash",
    "gemini-2.5-pro",
    "gemini-flash-latest",
    "gemini-pro-latest",
];

const PROBE_PROMPT: &str = "Hello, are you there?";
const PREVIEW_CHARS: usize = 50;

/// Outcome of probing one model.
#[derive(Debug, Clone, PartialEq)]
pub enum ProbeAttempt {
    /// The model answered; holds the start of its reply
    Available { model: String, preview: String },
    /// The call failed; holds the first line of the error
    Failed { model: String, reason: String },
}

impl ProbeAttempt {
    pub fn model(&self) -> &str {
        match self {
            ProbeAttempt::Available { model, .. } | ProbeAttempt::Failed { model, .. } => model,
        }
    }
}

/// Probe `candidates` in order, stopping after the first available model.
///
/// `on_attempt` is called as each attempt completes.
pub async fn probe_models<F>(
    client: &dyn ModelClient,
    candidates: &[String],
    mut on_attempt: F,
) -> Option<String>
where
    F: FnMut(&ProbeAttempt),
{
    for model in candidates {
        tracing::debug!(model = %model, "Probing model");
        let attempt = match client.generate(&GenerateRequest::prompt(model, PROBE_PROMPT)).await {
            Ok(response) => ProbeAttempt::Available {
                model: model.clone(),
                preview: response.text.chars().take(PREVIEW_CHARS).collect(),
            },
            Err(e) => ProbeAttempt::Failed {
                model: model.clone(),
                reason: e.to_string().lines().next().unwrap_or_default().to_string(),
            },
        };
        on_attempt(&attempt);
        if let ProbeAttempt::Available { model, .. } = attempt {
            return Some(model);
        }
    }
    None
}
