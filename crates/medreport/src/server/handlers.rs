//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use medreport_core::{ReportImage, ReportInput, ReportOutcome};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;

/// Body of `POST /process`.
#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: String,
    pub model: Option<String>,
}

/// `GET /` - liveness message.
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Medical Report Simplifier API is running." }))
}

/// `POST /process` - process raw report text.
pub async fn process_text(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if request.text.is_empty() {
        return Err(ApiError::BadRequest("Text field cannot be empty.".into()));
    }

    let model = pick_model(request.model, &state.models.text);
    tracing::info!(%model, chars = request.text.len(), "Processing text report");

    let outcome = state
        .processor
        .process(&ReportInput::Text(request.text), &model)
        .await;
    into_response(outcome)
}

/// `POST /process-image` - process an uploaded report image.
///
/// Multipart fields: `file` (the image, required) and `model` (optional).
pub async fn process_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let mut upload: Option<Vec<u8>> = None;
    let mut model: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::ImageFailed(e.body_text()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::ImageFailed(e.body_text()))?;
                upload = Some(bytes.to_vec());
            }
            "model" => {
                model = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::ImageFailed(e.body_text()))?,
                );
            }
            _ => {}
        }
    }

    let bytes = upload.ok_or_else(|| ApiError::BadRequest("No file uploaded.".into()))?;
    let size = bytes.len();
    let image = ReportImage::decode(bytes)
        .await
        .map_err(|e| ApiError::ImageFailed(e.to_string()))?;

    let model = pick_model(model, &state.models.image);
    tracing::info!(%model, bytes = size, mime = image.mime_type(), "Processing image report");

    let outcome = state
        .processor
        .process(&ReportInput::Image(image), &model)
        .await;
    into_response(outcome)
}

/// Requested model, or the entry point's default when absent or blank.
fn pick_model(requested: Option<String>, default: &str) -> String {
    requested
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Map an outcome to the HTTP reply.
///
/// Model JSON carrying `"status": "error"` is treated as a failure here too,
/// with its `message` (or "Unknown error") as the reason.
fn into_response(outcome: ReportOutcome) -> Result<Json<Value>, ApiError> {
    match outcome {
        ReportOutcome::Parsed(value) if value.get("status") == Some(&json!("error")) => {
            let message = value
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            Err(ApiError::Processing(message.to_string()))
        }
        ReportOutcome::Parsed(value) => Ok(Json(value)),
        ReportOutcome::Failed(failure) => Err(ApiError::Processing(failure.message)),
    }
}
