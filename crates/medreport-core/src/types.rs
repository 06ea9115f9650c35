//! Input and outcome types for report processing.

use crate::report_image::ReportImage;
use serde::{Serialize, Serializer};

/// A report submitted for processing.
#[derive(Debug, Clone)]
pub enum ReportInput {
    /// Raw or OCR-extracted report text
    Text(String),
    /// A decoded image of the report
    Image(ReportImage),
}

impl ReportInput {
    /// Short label for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            ReportInput::Text(_) => "text",
            ReportInput::Image(_) => "image",
        }
    }
}

/// Structured error record returned in place of model output.
///
/// Serializes as `{"status": "error", "message": ..., "raw_content": ...}`,
/// with `raw_content` present only when the model returned non-JSON text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportFailure {
    status: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl ReportFailure {
    pub const EMPTY_RESPONSE: &'static str = "Empty response from LLM";
    pub const UNPARSEABLE_RESPONSE: &'static str = "Failed to parse JSON response";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            message: message.into(),
            raw_content: None,
        }
    }

    pub fn empty_response() -> Self {
        Self::new(Self::EMPTY_RESPONSE)
    }

    pub fn unparseable(raw_content: impl Into<String>) -> Self {
        Self {
            raw_content: Some(raw_content.into()),
            ..Self::new(Self::UNPARSEABLE_RESPONSE)
        }
    }
}

/// Result of processing one report.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// The model's JSON, untouched
    Parsed(serde_json::Value),
    /// The call or the parse failed
    Failed(ReportFailure),
}

impl ReportOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ReportOutcome::Failed(_))
    }

    /// Failure message, if this outcome is a failure.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            ReportOutcome::Failed(failure) => Some(&failure.message),
            ReportOutcome::Parsed(_) => None,
        }
    }

    /// Convert to a plain JSON value (the parsed output or the error record).
    pub fn into_json(self) -> serde_json::Value {
        match self {
            ReportOutcome::Parsed(value) => value,
            ReportOutcome::Failed(failure) => serde_json::json!(failure),
        }
    }
}

impl Serialize for ReportOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ReportOutcome::Parsed(value) => value.serialize(serializer),
            ReportOutcome::Failed(failure) => failure.serialize(serializer),
        }
    }
}
