//! HTTP service adapter.
//!
//! Three routes around the shared report processor:
//!
//! - `GET /` liveness message
//! - `POST /process` JSON `{text, model?}`
//! - `POST /process-image` multipart `file` + optional `model`
//!
//! Requests are independent; the processor is shared behind an `Arc` and
//! holds no per-request state.

mod error;
mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use medreport_core::config::{ModelsConfig, ServerConfig};
use medreport_core::ReportProcessor;
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub processor: ReportProcessor,
    pub models: ModelsConfig,
}

/// Build the service router.
///
/// `static_dir`, when set, is served for any path the API routes don't match.
pub fn router(state: AppState, server: &ServerConfig, static_dir: Option<PathBuf>) -> Router {
    let body_limit = (server.max_upload_mb as usize).saturating_mul(1024 * 1024);

    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route("/process", post(handlers::process_text))
        .route("/process-image", post(handlers::process_image));

    if let Some(dir) = static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    let mut router = router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http());

    if server.cors {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
