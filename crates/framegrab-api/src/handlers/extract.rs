//! Frame extraction endpoints.

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::utils::to_data_uri;
use axum::{
    extract::State,
    http::{header, HeaderName},
    response::{IntoResponse, Response},
    Json,
};
use framegrab_core::{constants::JPEG_CONTENT_TYPE, AppError, DurationSource, FrameSize};
use framegrab_processing::{ExtractedFrame, TimestampRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

pub const VIDEO_ID_HEADER: &str = "x-video-id";
pub const FRAME_TIMESTAMP_HEADER: &str = "x-frame-timestamp";
pub const DURATION_SOURCE_HEADER: &str = "x-duration-source";

/// `"auto"`, a number of seconds, or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimestampParam {
    Seconds(f64),
    Text(String),
}

impl TimestampParam {
    fn resolve(&self) -> Result<TimestampRequest, AppError> {
        match self {
            TimestampParam::Seconds(secs) => whole_seconds(*secs),
            TimestampParam::Text(text) if text.trim().eq_ignore_ascii_case("auto") => {
                Ok(TimestampRequest::Auto)
            }
            TimestampParam::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| AppError::InvalidInput(format!("Invalid timestamp '{}'", text)))
                .and_then(whole_seconds),
        }
    }
}

/// Largest accepted explicit timestamp, in seconds (one year).
const MAX_TIMESTAMP_SECS: f64 = 365.0 * 24.0 * 3600.0;

fn whole_seconds(secs: f64) -> Result<TimestampRequest, AppError> {
    if !secs.is_finite() || secs < 0.0 {
        return Err(AppError::InvalidInput(
            "Timestamp must be a non-negative number of seconds".to_string(),
        ));
    }
    if secs > MAX_TIMESTAMP_SECS {
        return Err(AppError::InvalidInput(format!(
            "Timestamp must be at most {} seconds",
            MAX_TIMESTAMP_SECS
        )));
    }
    Ok(TimestampRequest::Seconds(secs.floor() as i64))
}

#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raw `image/jpeg` body
    #[default]
    Jpeg,
    /// Base64 data URI inside a JSON document
    Json,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractFrameRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    /// `"auto"` (65% of the duration) or seconds from the start
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "auto")]
    pub timestamp: Option<TimestampParam>,
    #[serde(default)]
    pub size: Option<FrameSize>,
    #[serde(default)]
    pub output: Option<OutputFormat>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractFramesRequest {
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub size: Option<FrameSize>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractBothRequest {
    #[serde(default)]
    pub video_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub percent: u32,
    pub timestamp: i64,
    /// `data:image/jpeg;base64,...`
    pub image: String,
}

impl From<&ExtractedFrame> for FrameResult {
    fn from(frame: &ExtractedFrame) -> Self {
        Self {
            label: frame.point.label.map(String::from),
            percent: frame.point.percent,
            timestamp: frame.point.timestamp,
            image: to_data_uri(&frame.jpeg),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SingleFrameResponse {
    pub video_id: String,
    pub duration: f64,
    pub duration_source: DurationSource,
    pub timestamp: i64,
    pub image: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MultipleFramesResponse {
    pub video_id: String,
    pub duration: f64,
    pub duration_source: DurationSource,
    pub frames: Vec<FrameResult>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BothFramesResponse {
    pub video_id: String,
    pub video_title: Option<String>,
    pub duration: f64,
    pub duration_source: DurationSource,
    pub portrait: Vec<FrameResult>,
    pub landscape: Vec<FrameResult>,
}

pub(crate) fn require_url(video_url: Option<&str>) -> Result<&str, AppError> {
    video_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::InvalidInput("videoUrl is required".to_string()))
}

#[utoipa::path(
    post,
    path = "/extract-frame",
    tag = "frames",
    request_body = ExtractFrameRequest,
    responses(
        (status = 200, description = "Raw JPEG (output=jpeg, the default) or JSON (output=json)", body = SingleFrameResponse),
        (status = 400, description = "Invalid URL, timestamp, size or output", body = ErrorResponse),
        (status = 500, description = "Download, extraction or cropping failed", body = ErrorResponse)
    )
)]
pub async fn extract_frame(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ExtractFrameRequest>,
) -> Result<Response, HttpAppError> {
    let url = require_url(request.video_url.as_deref())?;
    let timestamp = request
        .timestamp
        .as_ref()
        .map(TimestampParam::resolve)
        .transpose()?
        .unwrap_or(TimestampRequest::Auto);
    let size = request.size.unwrap_or_default();

    let frame = state.pipeline.extract_single(url, timestamp, size).await?;

    match request.output.unwrap_or_default() {
        OutputFormat::Jpeg => {
            let headers = [
                (header::CONTENT_TYPE, JPEG_CONTENT_TYPE.to_string()),
                (header::CACHE_CONTROL, "no-store".to_string()),
                (
                    HeaderName::from_static(VIDEO_ID_HEADER),
                    frame.video_id.to_string(),
                ),
                (
                    HeaderName::from_static(FRAME_TIMESTAMP_HEADER),
                    frame.timestamp.to_string(),
                ),
                (
                    HeaderName::from_static(DURATION_SOURCE_HEADER),
                    frame.metadata.duration_source.as_str().to_string(),
                ),
            ];
            Ok((headers, frame.jpeg).into_response())
        }
        OutputFormat::Json => Ok(Json(SingleFrameResponse {
            video_id: frame.video_id.to_string(),
            duration: frame.metadata.duration_secs,
            duration_source: frame.metadata.duration_source,
            timestamp: frame.timestamp,
            image: to_data_uri(&frame.jpeg),
        })
        .into_response()),
    }
}

#[utoipa::path(
    post,
    path = "/extract-frames-multiple",
    tag = "frames",
    request_body = ExtractFramesRequest,
    responses(
        (status = 200, description = "Frames at 50%, 65% and 75%", body = MultipleFramesResponse),
        (status = 400, description = "Invalid URL or size", body = ErrorResponse),
        (status = 500, description = "Download, extraction or cropping failed", body = ErrorResponse)
    )
)]
pub async fn extract_frames_multiple(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ExtractFramesRequest>,
) -> Result<Json<MultipleFramesResponse>, HttpAppError> {
    let url = require_url(request.video_url.as_deref())?;
    let size = request.size.unwrap_or_default();

    let set = state.pipeline.extract_trio(url, size).await?;

    Ok(Json(MultipleFramesResponse {
        video_id: set.video_id.to_string(),
        duration: set.metadata.duration_secs,
        duration_source: set.metadata.duration_source,
        frames: set.frames.iter().map(FrameResult::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/extract-frames-both",
    tag = "frames",
    request_body = ExtractBothRequest,
    responses(
        (status = 200, description = "24 frames, each as portrait-feed (1080x1350) and landscape (1200x628)", body = BothFramesResponse),
        (status = 400, description = "Invalid URL", body = ErrorResponse),
        (status = 500, description = "Download, extraction or cropping failed", body = ErrorResponse)
    )
)]
pub async fn extract_frames_both(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<ExtractBothRequest>,
) -> Result<Json<BothFramesResponse>, HttpAppError> {
    let url = require_url(request.video_url.as_deref())?;

    let set = state.pipeline.extract_grid_both(url).await?;

    Ok(Json(BothFramesResponse {
        video_id: set.video_id.to_string(),
        video_title: set.metadata.title.clone(),
        duration: set.metadata.duration_secs,
        duration_source: set.metadata.duration_source,
        portrait: set.portrait.iter().map(FrameResult::from).collect(),
        landscape: set.landscape.iter().map(FrameResult::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param(json: &str) -> TimestampParam {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_timestamp_param_forms() {
        assert_eq!(param("\"auto\"").resolve().unwrap(), TimestampRequest::Auto);
        assert_eq!(param("\"AUTO\"").resolve().unwrap(), TimestampRequest::Auto);
        assert_eq!(param("42").resolve().unwrap(), TimestampRequest::Seconds(42));
        assert_eq!(param("12.9").resolve().unwrap(), TimestampRequest::Seconds(12));
        assert_eq!(param("\" 90 \"").resolve().unwrap(), TimestampRequest::Seconds(90));
    }

    #[test]
    fn test_timestamp_param_rejects_garbage() {
        for json in ["\"soon\"", "-1", "\"-5\"", "\"NaN\"", "\"inf\"", "1e300", "\"1e300\""] {
            let err = param(json).resolve().unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(_)), "{}", json);
        }
    }

    #[test]
    fn test_timestamp_ceiling_is_inclusive() {
        assert_eq!(
            param("31536000").resolve().unwrap(),
            TimestampRequest::Seconds(31_536_000)
        );
        assert!(param("31536001").resolve().is_err());
    }

    #[test]
    fn test_require_url() {
        assert_eq!(require_url(Some(" dQw4w9WgXcQ ")).unwrap(), "dQw4w9WgXcQ");
        assert!(require_url(Some("  ")).is_err());
        assert!(require_url(None).is_err());
    }

    #[test]
    fn test_request_defaults() {
        let request: ExtractFrameRequest =
            serde_json::from_str(r#"{"videoUrl":"https://youtu.be/dQw4w9WgXcQ"}"#).unwrap();
        assert!(request.timestamp.is_none());
        assert!(request.size.is_none());
        assert!(request.output.is_none());

        assert!(serde_json::from_str::<ExtractFrameRequest>(
            r#"{"videoUrl":"x","output":"png"}"#
        )
        .is_err());
        assert!(
            serde_json::from_str::<ExtractFrameRequest>(r#"{"videoUrl":"x","size":"square"}"#)
                .is_err()
        );
    }
}
