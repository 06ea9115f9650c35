//! Report processor: the one piece of shared logic.
//!
//! Builds a generation request from the input, submits it once, and turns
//! whatever comes back into a [`ReportOutcome`]. Client errors never escape
//! as `Err`; they become error outcomes.

use crate::config::LlmConfig;
use crate::error::ConfigError;
use crate::llm::{
    ContentPart, GenerateRequest, InlineImage, ModelClient, ModelClientFactory, SafetyThreshold,
};
use crate::prompt::{IMAGE_INSTRUCTION, JSON_MIME_TYPE, SYSTEM_PROMPT};
use crate::types::{ReportFailure, ReportInput, ReportOutcome};
use std::sync::Arc;

/// Sends reports to the model and interprets its replies.
#[derive(Clone)]
pub struct ReportProcessor {
    client: Arc<dyn ModelClient>,
}

impl ReportProcessor {
    pub fn new(client: Arc<dyn ModelClient>) -> Self {
        Self { client }
    }

    /// Build a processor around the client described by `[llm]`.
    pub fn from_config(config: &LlmConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(ModelClientFactory::create(config)?))
    }

    pub fn client(&self) -> &Arc<dyn ModelClient> {
        &self.client
    }

    /// Assemble the request for one report.
    ///
    /// Text becomes a single part. An image is preceded by a fixed
    /// instruction part. Output is constrained to JSON and every safety
    /// category is set to its most permissive level.
    pub fn build_request(input: &ReportInput, model: &str) -> GenerateRequest {
        let parts = match input {
            ReportInput::Text(text) => vec![ContentPart::Text(text.clone())],
            ReportInput::Image(image) => vec![
                ContentPart::Text(IMAGE_INSTRUCTION.to_string()),
                ContentPart::Image(InlineImage::from_bytes(image.bytes(), image.mime_type())),
            ],
        };

        GenerateRequest {
            model: model.to_string(),
            system_instruction: Some(SYSTEM_PROMPT.to_string()),
            parts,
            response_mime_type: Some(JSON_MIME_TYPE.to_string()),
            safety: SafetyThreshold::BlockNone,
        }
    }

    /// Process one report with the given model.
    pub async fn process(&self, input: &ReportInput, model: &str) -> ReportOutcome {
        let request = Self::build_request(input, model);
        tracing::debug!(
            client = self.client.name(),
            model,
            input = input.kind(),
            "Submitting report"
        );

        match self.client.generate(&request).await {
            Ok(response) => {
                tracing::debug!(
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    chars = response.text.len(),
                    "Model responded"
                );
                interpret_response(&response.text)
            }
            Err(e) => {
                tracing::warn!(model, "Model call failed: {e}");
                ReportOutcome::Failed(ReportFailure::new(e.to_string()))
            }
        }
    }
}

/// Interpret raw model text as a report outcome.
///
/// Empty text and non-JSON text are distinct failures; valid JSON passes
/// through untouched.
pub fn interpret_response(text: &str) -> ReportOutcome {
    if text.is_empty() {
        return ReportOutcome::Failed(ReportFailure::empty_response());
    }
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => ReportOutcome::Parsed(value),
        Err(e) => {
            tracing::debug!("Model output is not JSON: {e}");
            ReportOutcome::Failed(ReportFailure::unparseable(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use crate::llm::GenerateResponse;
    use crate::report_image::ReportImage;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// A scripted client that records the last request it saw.
    struct MockClient {
        response_fn: Box<dyn Fn() -> Result<String, ReportError> + Send + Sync>,
        call_count: Arc<AtomicU32>,
        last_request: Arc<Mutex<Option<GenerateRequest>>>,
    }

    impl MockClient {
        fn replying(text: &str) -> Self {
            let text = text.to_string();
            Self::with(move || Ok(text.clone()))
        }

        fn failing(message: &str) -> Self {
            let message = message.to_string();
            Self::with(move || {
                Err(ReportError::Llm {
                    message: message.clone(),
                    status_code: Some(429),
                })
            })
        }

        fn with(f: impl Fn() -> Result<String, ReportError> + Send + Sync + 'static) -> Self {
            Self {
                response_fn: Box::new(f),
                call_count: Arc::new(AtomicU32::new(0)),
                last_request: Arc::new(Mutex::new(None)),
            }
        }
    }

    #[async_trait]
    impl ModelClient for MockClient {
        fn name(&self) -> &str {
            "mock"
        }

        async fn generate(
            &self,
            request: &GenerateRequest,
        ) -> Result<GenerateResponse, ReportError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock().unwrap() = Some(request.clone());
            (self.response_fn)().map(|text| GenerateResponse {
                text,
                model: request.model.clone(),
                latency_ms: 5,
            })
        }
    }

    async fn run(client: MockClient, input: ReportInput) -> ReportOutcome {
        ReportProcessor::new(Arc::new(client))
            .process(&input, "gemini-2.5-flash")
            .await
    }

    fn text(s: &str) -> ReportInput {
        ReportInput::Text(s.to_string())
    }

    #[tokio::test]
    async fn test_valid_json_passes_through_unchanged() {
        let body = json!({
            "step_1_extraction": {"tests_raw": ["Hemoglobin 10.2"], "confidence": 0.9},
            "final_response": {"status": "ok", "tests": [], "summary": "s"}
        });
        let outcome = run(MockClient::replying(&body.to_string()), text("Hemoglobin 10.2")).await;
        assert_eq!(outcome, ReportOutcome::Parsed(body));
    }

    #[tokio::test]
    async fn test_empty_response_is_exact_error_record() {
        let outcome = run(MockClient::replying(""), text("Hemoglobin 10.2")).await;
        assert_eq!(
            outcome.into_json(),
            json!({"status": "error", "message": "Empty response from LLM"})
        );
    }

    #[tokio::test]
    async fn test_non_json_response_keeps_raw_content() {
        let raw = "Sure! Here is your report: {tests: [";
        let outcome = run(MockClient::replying(raw), text("Hemoglobin 10.2")).await;
        assert_eq!(
            outcome.into_json(),
            json!({
                "status": "error",
                "message": "Failed to parse JSON response",
                "raw_content": raw
            })
        );
    }

    #[tokio::test]
    async fn test_client_error_becomes_error_outcome() {
        let outcome = run(
            MockClient::failing("Gemini HTTP 429 Too Many Requests: quota exceeded"),
            text("Hemoglobin 10.2"),
        )
        .await;
        let value = outcome.into_json();
        assert_eq!(value["status"], "error");
        assert_eq!(
            value["message"],
            "Gemini HTTP 429 Too Many Requests: quota exceeded"
        );
        assert!(value.get("raw_content").is_none());
    }

    #[tokio::test]
    async fn test_single_attempt_per_call() {
        let client = MockClient::failing("connection reset");
        let calls = client.call_count.clone();
        let _ = run(client, text("WBC 11.2")).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_text_request_shape() {
        let client = MockClient::replying("{}");
        let seen = client.last_request.clone();
        let _ = run(client, text("Hemglobin 10.2 g/dL")).await;

        let request = seen.lock().unwrap().take().unwrap();
        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.system_instruction.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(request.response_mime_type.as_deref(), Some("application/json"));
        assert_eq!(request.safety, SafetyThreshold::BlockNone);
        assert_eq!(
            request.parts,
            vec![ContentPart::Text("Hemglobin 10.2 g/dL".to_string())]
        );
    }

    #[tokio::test]
    async fn test_image_request_puts_instruction_before_image() {
        let mut png = Vec::new();
        image::DynamicImage::new_rgb8(2, 2)
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let image = ReportImage::decode_sync(png).unwrap();

        let request = ReportProcessor::build_request(&ReportInput::Image(image), "gemini-flash-latest");
        assert_eq!(request.parts.len(), 2);
        assert_eq!(
            request.parts[0],
            ContentPart::Text(IMAGE_INSTRUCTION.to_string())
        );
        match &request.parts[1] {
            ContentPart::Image(inline) => assert_eq!(inline.mime_type, "image/png"),
            other => panic!("expected image part, got {other:?}"),
        }
    }

    #[test]
    fn test_interpret_whitespace_is_unparseable_not_empty() {
        let outcome = interpret_response("   ");
        assert_eq!(outcome.failure_message(), Some("Failed to parse JSON response"));
    }

    #[test]
    fn test_interpret_accepts_non_object_json() {
        assert_eq!(interpret_response("[1,2]"), ReportOutcome::Parsed(json!([1, 2])));
    }
}
