//! Service info and liveness.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

const ENDPOINTS: [(&str, &str, &str); 7] = [
    ("GET", "/", "Service info"),
    ("GET", "/health", "Liveness probe"),
    ("POST", "/extract-frame", "One frame at a timestamp, as JPEG or JSON"),
    ("POST", "/extract-frames-multiple", "Three frames at 50%, 65% and 75%"),
    ("POST", "/extract-frames-both", "24 frames in portrait-feed and landscape"),
    ("POST", "/save-selection", "Upload a chosen frame pair and log it"),
    ("GET", "/api/openapi.json", "OpenAPI document"),
];

#[utoipa::path(
    get,
    path = "/",
    tag = "info",
    responses(
        (status = 200, description = "Service name, version and endpoints", body = ServiceInfo)
    )
)]
pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: "framegrab",
        version: env!("CARGO_PKG_VERSION"),
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description)| EndpointInfo {
                method,
                path,
                description,
            })
            .collect(),
    })
}

/// Liveness probe - process is running.
#[utoipa::path(
    get,
    path = "/health",
    tag = "info",
    responses(
        (status = 200, description = "Process is alive")
    )
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
