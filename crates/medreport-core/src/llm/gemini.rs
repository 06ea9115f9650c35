//! Gemini client using the Generative Language `generateContent` REST API.
//!
//! Sends a system instruction, user parts (text and inline images), an
//! optional response MIME type, and safety settings. No retries and no
//! client-side timeout: whatever reqwest and the API do by default applies.

use super::provider::{
    ContentPart, GenerateRequest, GenerateResponse, ModelClient, SafetyThreshold,
};
use crate::error::ReportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Harm categories the API lets callers tune.
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Gemini REST client.
pub struct GeminiClient {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint URL for `model`. Ids outside `[A-Za-z0-9._-]` are rejected
    /// so a caller-supplied model cannot address other API paths.
    fn url_for(&self, model: &str) -> Result<String, ReportError> {
        let id = model.strip_prefix("models/").unwrap_or(model);
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if !valid {
            return Err(ReportError::Llm {
                message: format!("Invalid model id: {model:?}"),
                status_code: None,
            });
        }
        Ok(format!("{}/models/{}:generateContent", self.endpoint, id))
    }
}

// --- Request types ---

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize, Debug)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

/// Untagged union of text and inline media parts.
#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
}

#[derive(Serialize, Debug)]
struct SafetySetting {
    category: String,
    threshold: String,
}

// --- Response types ---

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    model_version: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// `{"error": {"message": ...}}` envelope on non-2xx responses.
#[derive(Deserialize, Debug)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize, Debug)]
struct ApiErrorDetail {
    message: String,
}

fn build_body(request: &GenerateRequest) -> GenerateContentBody {
    let parts = request
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => Part::Text { text: text.clone() },
            ContentPart::Image(image) => Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                },
            },
        })
        .collect();

    let safety_settings = match request.safety {
        SafetyThreshold::Default => Vec::new(),
        SafetyThreshold::BlockNone => HARM_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: "BLOCK_NONE".to_string(),
            })
            .collect(),
    };

    GenerateContentBody {
        system_instruction: request.system_instruction.as_ref().map(|text| Content {
            role: None,
            parts: vec![Part::Text { text: text.clone() }],
        }),
        contents: vec![Content {
            role: Some("user".to_string()),
            parts,
        }],
        generation_config: request
            .response_mime_type
            .as_ref()
            .map(|mime| GenerationConfig {
                response_mime_type: mime.clone(),
            }),
        safety_settings,
    }
}

/// Pull the text out of the first candidate.
///
/// A response without candidates means the prompt itself was blocked. A
/// candidate without text is only an error when it stopped for a reason other
/// than a normal stop; otherwise the empty text is returned as-is.
fn extract_text(response: &GenerateContentResponse) -> Result<String, ReportError> {
    let Some(candidate) = response.candidates.first() else {
        let reason = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref());
        let message = match reason {
            Some(reason) => format!("Gemini blocked the prompt (block reason: {reason})"),
            None => "Gemini returned no candidates".to_string(),
        };
        return Err(ReportError::Llm {
            message,
            status_code: None,
        });
    };

    let text: String = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.is_empty() {
        if let Some(reason) = candidate.finish_reason.as_deref() {
            if reason != "STOP" {
                return Err(ReportError::Llm {
                    message: format!("Gemini returned no text (finish reason: {reason})"),
                    status_code: None,
                });
            }
        }
    }

    Ok(text)
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ReportError> {
        let url = self.url_for(&request.model)?;
        let start = Instant::now();
        let body = build_body(request);

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ReportError::Llm {
                message: format!("Gemini request failed: {e}"),
                status_code: None,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorEnvelope>(&text)
                .map(|envelope| envelope.error.message)
                .unwrap_or(text);
            return Err(ReportError::Llm {
                message: format!("Gemini HTTP {status}: {detail}"),
                status_code: Some(status.as_u16()),
            });
        }

        let parsed: GenerateContentResponse = resp.json().await.map_err(|e| ReportError::Llm {
            message: format!("Failed to parse Gemini response: {e}"),
            status_code: None,
        })?;

        let text = extract_text(&parsed)?;

        Ok(GenerateResponse {
            text,
            model: parsed
                .model_version
                .unwrap_or_else(|| request.model.clone()),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}
