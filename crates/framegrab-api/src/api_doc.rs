//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use framegrab_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "framegrab",
        version = "0.1.0",
        description = "Extract, crop and save still frames from YouTube videos"
    ),
    paths(
        handlers::info::service_info,
        handlers::info::liveness_check,
        handlers::extract::extract_frame,
        handlers::extract::extract_frames_multiple,
        handlers::extract::extract_frames_both,
        handlers::selection::save_selection,
    ),
    components(schemas(
        error::ErrorResponse,
        models::FrameSize,
        models::DurationSource,
        handlers::info::ServiceInfo,
        handlers::info::EndpointInfo,
        handlers::extract::OutputFormat,
        handlers::extract::ExtractFrameRequest,
        handlers::extract::ExtractFramesRequest,
        handlers::extract::ExtractBothRequest,
        handlers::extract::FrameResult,
        handlers::extract::SingleFrameResponse,
        handlers::extract::MultipleFramesResponse,
        handlers::extract::BothFramesResponse,
        handlers::selection::SelectedFrame,
        handlers::selection::SaveSelectionRequest,
        handlers::selection::SaveSelectionResponse,
    )),
    tags(
        (name = "info", description = "Service info and liveness"),
        (name = "frames", description = "Frame extraction"),
        (name = "selections", description = "Saving chosen frames"),
    )
)]
pub struct ApiDoc;
