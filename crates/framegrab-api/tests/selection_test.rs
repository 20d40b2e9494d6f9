//! Save-selection integration tests.
//!
//! Run with: `cargo test -p framegrab-api --test selection_test`

mod helpers;

use axum::http::StatusCode;
use framegrab_services::HEADER;
use helpers::fixtures::{data_uri, landscape_jpeg};
use helpers::{setup_test_app, TestAppBuilder, MEDIA_BASE_URL};
use serde_json::{json, Value};

fn selection_body(image: &str) -> Value {
    json!({
        "videoUrl": "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "videoTitle": "Never Gonna Give You Up",
        "portraitFrame": { "percent": 48, "image": image },
        "landscapeFrame": { "percent": 64, "image": image }
    })
}

#[tokio::test]
async fn test_save_selection_uploads_and_records_row() {
    let app = setup_test_app().await;
    let jpeg = landscape_jpeg();

    let response = app
        .client()
        .post("/save-selection")
        .json(&selection_body(&data_uri(&jpeg)))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["portraitUrl"],
        format!("{}/dQw4w9WgXcQ-48-portrait-feed.jpg", MEDIA_BASE_URL)
    );
    assert_eq!(
        body["landscapeUrl"],
        format!("{}/dQw4w9WgXcQ-64-landscape.jpg", MEDIA_BASE_URL)
    );

    let stored = std::fs::read(app.media_dir.join("dQw4w9WgXcQ-48-portrait-feed.jpg")).unwrap();
    assert_eq!(stored, jpeg);

    let rows = app.sheet.rows().await;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0], HEADER.to_vec());
    assert_eq!(rows[1][1], "dQw4w9WgXcQ");
    assert_eq!(rows[1][3], "Never Gonna Give You Up");
    assert_eq!(rows[1][4], "48");
    assert_eq!(rows[1][5], "portrait-feed");
    assert_eq!(rows[1][8], "landscape");
    assert_eq!(rows[1][10], "saved");
}

#[tokio::test]
async fn test_save_selection_twice_keeps_one_header() {
    let app = setup_test_app().await;
    let image = data_uri(&landscape_jpeg());

    for _ in 0..2 {
        let response = app
            .client()
            .post("/save-selection")
            .json(&selection_body(&image))
            .await;
        assert_eq!(response.status_code(), StatusCode::OK);
    }

    let rows = app.sheet.rows().await;
    assert_eq!(rows.len(), 3);
    assert_eq!(rows.iter().filter(|r| r[0] == HEADER[0]).count(), 1);
}

#[tokio::test]
async fn test_save_selection_rejects_bad_base64() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/save-selection")
        .json(&selection_body("data:image/jpeg;base64,@@@"))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert!(app.sheet.rows().await.is_empty());
}

#[tokio::test]
async fn test_save_selection_rejects_invalid_url() {
    let app = setup_test_app().await;
    let mut body = selection_body(&data_uri(&landscape_jpeg()));
    body["videoUrl"] = json!("https://vimeo.com/123");

    let response = app.client().post("/save-selection").json(&body).await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_save_selection_without_media_store() {
    let app = TestAppBuilder::new().without_media_store().build().await;

    let response = app
        .client()
        .post("/save-selection")
        .json(&selection_body(&data_uri(&landscape_jpeg())))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_CONFIGURED");
    assert!(app.sheet.rows().await.is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_json_413() {
    let app = TestAppBuilder::new().max_body_bytes(4 * 1024).build().await;

    let response = app
        .client()
        .post("/save-selection")
        .json(&selection_body(&"A".repeat(8 * 1024)))
        .await;

    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json();
    assert_eq!(body["code"], "PAYLOAD_TOO_LARGE");
    assert!(body["error"].is_string());
    assert!(app.sheet.rows().await.is_empty());
}
