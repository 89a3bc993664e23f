//! Transform API handler.
//!
//! Collects the multipart submission into a [`RawTransformForm`], validates
//! it, and hands the request to the voice pipeline.

use crate::{api::ApiError, AppState};
use aria_types::{RawTransformForm, TransformRequest, TransformResult};
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Extension, Multipart,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge("audio upload exceeds the size limit".to_string())
    } else {
        tracing::debug!("multipart error: {}", err);
        ApiError::BadRequest("Invalid multipart form data.".to_string())
    }
}

/// Reads every known field of a transform submission.
///
/// Unknown fields are skipped. When a field repeats, the last value wins.
async fn collect_form(mut multipart: Multipart) -> Result<RawTransformForm, ApiError> {
    let mut form = RawTransformForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        match name.as_str() {
            "audio" => {
                form.audio_content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.audio = Some(data.to_vec());
            }
            "personaId" => form.persona_id = Some(field.text().await.map_err(multipart_error)?),
            "accent" => form.accent = Some(field.text().await.map_err(multipart_error)?),
            "transcript" => form.transcript = Some(field.text().await.map_err(multipart_error)?),
            "style" => form.style = Some(field.text().await.map_err(multipart_error)?),
            "stability" => form.stability = Some(field.text().await.map_err(multipart_error)?),
            "speakingRate" => {
                form.speaking_rate = Some(field.text().await.map_err(multipart_error)?)
            }
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(form)
}

/// Handler for `POST /api/transform`.
///
/// Returns `400` only for input the pipeline refuses to run. Transcription
/// and synthesis failures come back as `200` with an `error` body.
pub async fn transform_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TransformResult>, ApiError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("transform", %request_id);

    async move {
        let multipart = multipart.map_err(|e| {
            tracing::warn!("rejected transform request: {}", e);
            ApiError::BadRequest("Invalid multipart form data.".to_string())
        })?;

        let form = collect_form(multipart).await?;
        tracing::debug!(?form, "received transform form");

        let request = TransformRequest::resolve(form).map_err(|e| {
            tracing::warn!("transform request failed validation: {}", e);
            ApiError::from(e)
        })?;

        let result = state.transform_service.transform(request).await;
        if let Some(error) = result.error() {
            tracing::info!(error, "transform finished with a stage failure");
        }
        Ok(Json(result))
    }
    .instrument(span)
    .await
}
