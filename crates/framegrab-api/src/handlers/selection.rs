//! Saving a chosen frame pair.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::extract::require_url;
use crate::state::AppState;
use crate::utils::decode_image_payload;
use axum::{extract::State, Json};
use chrono::Utc;
use framegrab_core::{constants::JPEG_CONTENT_TYPE, AppError, FrameSize};
use framegrab_processing::ExtractionPipeline;
use framegrab_services::SelectionRow;
use framegrab_storage::selection_key;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

const SAVED_STATUS: &str = "saved";

/// Sizes the both-endpoint produces; a selection is always one of each.
const PORTRAIT_SIZE: FrameSize = FrameSize::PortraitFeed;
const LANDSCAPE_SIZE: FrameSize = FrameSize::Landscape;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFrame {
    pub percent: u32,
    /// Base64 JPEG, optionally as a `data:` URI
    pub image: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSelectionRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_title: Option<String>,
    pub portrait_frame: SelectedFrame,
    pub landscape_frame: SelectedFrame,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSelectionResponse {
    pub success: bool,
    pub portrait_url: String,
    pub landscape_url: String,
}

#[utoipa::path(
    post,
    path = "/save-selection",
    tag = "selections",
    request_body = SaveSelectionRequest,
    responses(
        (status = 200, description = "Both frames uploaded and the selection logged", body = SaveSelectionResponse),
        (status = 400, description = "Invalid URL or image data", body = ErrorResponse),
        (status = 500, description = "Upload or spreadsheet write failed, or the service is not configured", body = ErrorResponse)
    )
)]
pub async fn save_selection(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<SaveSelectionRequest>,
) -> Result<Json<SaveSelectionResponse>, HttpAppError> {
    let url = require_url(request.video_url.as_deref())?;
    let video_id = ExtractionPipeline::parse_url(url)?;

    let portrait = decode_image_payload(&request.portrait_frame.image)?;
    let landscape = decode_image_payload(&request.landscape_frame.image)?;

    let store = state
        .media_store
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("Media store is not configured".to_string()))?;
    let sheet = state
        .sheet
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured("Selection spreadsheet is not configured".to_string()))?;

    let portrait_key = selection_key(&video_id, request.portrait_frame.percent, PORTRAIT_SIZE);
    let landscape_key = selection_key(&video_id, request.landscape_frame.percent, LANDSCAPE_SIZE);

    let portrait_url = store
        .upload(&portrait_key, portrait, JPEG_CONTENT_TYPE)
        .await?;
    let landscape_url = store
        .upload(&landscape_key, landscape, JPEG_CONTENT_TYPE)
        .await?;

    let row = SelectionRow {
        recorded_at: Utc::now(),
        video_id: video_id.to_string(),
        video_url: url.to_string(),
        video_title: request.video_title.clone().unwrap_or_default(),
        portrait_percent: request.portrait_frame.percent,
        portrait_size: PORTRAIT_SIZE,
        portrait_url: portrait_url.clone(),
        landscape_percent: request.landscape_frame.percent,
        landscape_size: LANDSCAPE_SIZE,
        landscape_url: landscape_url.clone(),
        status: SAVED_STATUS.to_string(),
    };
    sheet.record(&row).await?;

    tracing::info!(
        video_id = %video_id,
        portrait_percent = row.portrait_percent,
        landscape_percent = row.landscape_percent,
        backend = store.backend_type().as_str(),
        "Selection saved"
    );

    Ok(Json(SaveSelectionResponse {
        success: true,
        portrait_url,
        landscape_url,
    }))
}
