//! Aria server library logic.

pub mod api;
pub mod api_transform;
pub mod config;

use aria_voice::{
    ElevenLabsSynthesizer, FeatherlessRewriter, GeminiTranscriber, TransformService,
    MAX_STT_INPUT_BYTES,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use config::Config;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Body limit for routes that take no upload.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The voice pipeline.
    pub transform_service: Arc<TransformService>,
    /// Body limit for `POST /api/transform`, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(transform_service: TransformService, max_upload_bytes: usize) -> Self {
        Self {
            transform_service: Arc::new(transform_service),
            max_upload_bytes,
        }
    }

    /// Builds the provider clients described by `config`.
    ///
    /// Missing API keys are logged here and surface later as stage failures.
    pub fn from_config(config: &Config) -> Self {
        let transcriber = GeminiTranscriber::new(config.transcription.clone());
        if !transcriber.is_configured() {
            tracing::warn!("transcription api key is not set, audio uploads will fail");
        }

        let synthesizer = ElevenLabsSynthesizer::new(config.synthesis.clone());
        if !synthesizer.is_configured() {
            tracing::warn!("synthesis api key is not set, every transform will fail");
        }

        let mut service = TransformService::new(Arc::new(transcriber), Arc::new(synthesizer))
            .with_policy(config.pipeline);

        if config.rewrite.enabled {
            if config.rewrite.api_key.is_empty() {
                tracing::warn!(
                    "rewrite is enabled without an api key, transcripts pass through unchanged"
                );
            }
            tracing::info!(model = %config.rewrite.model, "persona rewrite enabled");
            service = service.with_rewriter(Arc::new(FeatherlessRewriter::new(
                config.rewrite.clone(),
            )));
        }

        Self::new(service, upload_limit(config.server.max_upload_bytes))
    }
}

/// Caps the configured upload limit at the transcriber's audio limit.
pub fn upload_limit(configured: usize) -> usize {
    if configured > MAX_STT_INPUT_BYTES {
        tracing::warn!(
            configured,
            limit = MAX_STT_INPUT_BYTES,
            "server.max_upload_bytes exceeds the transcription limit, capping it"
        );
        MAX_STT_INPUT_BYTES
    } else {
        configured
    }
}

/// Health check handler.
///
/// Returns `200 OK` with server status and version.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let transform_routes = Router::new()
        .route("/api/transform", post(api_transform::transform_handler))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes));

    Router::new()
        .route("/health", get(health))
        .route("/api/personas", get(api::list_personas_handler))
        .merge(transform_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
