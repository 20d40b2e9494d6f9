use crate::keys::{object_name, validate_key};
use crate::traits::{MediaStore, StorageError, StorageResult};
use crate::MediaStoreBackend;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem media store
#[derive(Clone)]
pub struct LocalStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStore {
    /// Create a new LocalStore
    ///
    /// # Arguments
    /// * `base_path` - Directory the files are written to (created if missing)
    /// * `base_url` - Base URL the directory is served under (e.g. "http://localhost:8080/frames")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStore {
            base_path,
            base_url,
        })
    }

    fn generate_url(&self, object: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), object)
    }
}

#[async_trait]
impl MediaStore for LocalStore {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        validate_key(key)?;

        let object = object_name(key);
        let path = self.base_path.join(&object);
        let size = data.len();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let start = std::time::Instant::now();

        // File::create truncates, so re-saving a key replaces the old image.
        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(self.generate_url(&object))
    }

    fn backend_type(&self) -> MediaStoreBackend {
        MediaStoreBackend::Local
    }
}
