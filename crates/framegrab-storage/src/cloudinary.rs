use crate::keys::{object_name, validate_key};
use crate::traits::{MediaStore, StorageError, StorageResult};
use crate::MediaStoreBackend;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Cloudinary image upload
///
/// Uses signed uploads: every parameter except `file`, `api_key` and
/// `signature_algorithm` is signed with the API secret (SHA-256).
#[derive(Clone)]
pub struct CloudinaryStore {
    client: Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: Option<String>,
}

impl CloudinaryStore {
    pub fn new(
        cloud_name: String,
        api_key: String,
        api_secret: String,
        folder: Option<String>,
    ) -> StorageResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            cloud_name,
            api_key,
            api_secret,
            folder,
        })
    }

    /// Point the store at a different API host (tests, proxies).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn upload_url(&self) -> String {
        format!("{}/v1_1/{}/image/upload", self.api_base, self.cloud_name)
    }

    fn signed_params(&self, key: &str, timestamp: i64) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("overwrite", "true".to_string()),
            ("public_id", key.to_string()),
            ("timestamp", timestamp.to_string()),
        ];
        if let Some(folder) = &self.folder {
            params.push(("folder", folder.clone()));
        }
        params
    }
}

/// Sorted `k=v&k=v` string with the secret appended, hashed with SHA-256.
pub(crate) fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    hex::encode(Sha256::digest(format!("{}{}", to_sign, api_secret).as_bytes()))
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String> {
        validate_key(key)?;

        let size = data.len();
        let start = std::time::Instant::now();
        let params = self.signed_params(key, chrono::Utc::now().timestamp());
        let signature = sign(&params, &self.api_secret);

        let file = Part::bytes(data)
            .file_name(object_name(key))
            .mime_str(content_type)
            .map_err(|e| StorageError::UploadFailed(format!("Invalid content type: {}", e)))?;

        let mut form = Form::new()
            .part("file", file)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (name, value) in params {
            form = form.text(name, value);
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, key = %key, "Cloudinary request failed");
                StorageError::UploadFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            tracing::error!(
                status = %status,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Cloudinary upload failed"
            );
            return Err(StorageError::UploadFailed(format!(
                "Cloudinary returned {}: {}",
                status, message
            )));
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| {
            StorageError::BackendError(format!("Unexpected Cloudinary response: {}", e))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(uploaded.secure_url)
    }

    fn backend_type(&self) -> MediaStoreBackend {
        MediaStoreBackend::Cloudinary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn store(api_base: &str, folder: Option<&str>) -> CloudinaryStore {
        CloudinaryStore::new(
            "demo".to_string(),
            "123456".to_string(),
            "abcd".to_string(),
            folder.map(String::from),
        )
        .unwrap()
        .with_api_base(api_base)
    }

    #[test]
    fn test_sign() {
        let params = vec![
            ("timestamp", "1700000000".to_string()),
            ("public_id", "dQw4w9WgXcQ-65-portrait".to_string()),
            ("overwrite", "true".to_string()),
        ];
        assert_eq!(
            sign(&params, "abcd"),
            "0203373469e83f1a9dc0f73c9e53833921387ae002bd96b1fa1ded77944aef14"
        );
    }

    #[test]
    fn test_sign_includes_folder() {
        let s = store("http://localhost", Some("frames"));
        let params = s.signed_params("dQw4w9WgXcQ-65-portrait", 1_700_000_000);
        assert_eq!(
            sign(&params, "abcd"),
            "2ca4ef27faa88e1b03b86d7ee1de818b8d31f540171aeda5c429ecca49e5d4fa"
        );
    }

    #[tokio::test]
    async fn test_upload_returns_secure_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1_1/demo/image/upload")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("dQw4w9WgXcQ-65-portrait".to_string()),
                Matcher::Regex("overwrite".to_string()),
                Matcher::Regex("signature".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"public_id":"dQw4w9WgXcQ-65-portrait","secure_url":"https://res.cloudinary.com/demo/image/upload/v1/dQw4w9WgXcQ-65-portrait.jpg"}"#,
            )
            .create_async()
            .await;

        let url = store(&server.url(), None)
            .upload("dQw4w9WgXcQ-65-portrait", vec![0xFF, 0xD8, 0xFF], "image/jpeg")
            .await
            .unwrap();

        assert_eq!(
            url,
            "https://res.cloudinary.com/demo/image/upload/v1/dQw4w9WgXcQ-65-portrait.jpg"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_surfaces_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1_1/demo/image/upload")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error":{"message":"Invalid Signature"}}"#)
            .create_async()
            .await;

        let err = store(&server.url(), None)
            .upload("dQw4w9WgXcQ-65-portrait", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::UploadFailed(_)));
        assert!(err.to_string().contains("Invalid Signature"));
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_key() {
        let err = store("http://127.0.0.1:9", None)
            .upload("../escape", vec![1], "image/jpeg")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
