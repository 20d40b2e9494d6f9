//! Media store abstraction

use crate::MediaStoreBackend;
use async_trait::async_trait;
use framegrab_core::AppError;
use thiserror::Error;

/// Media store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media store operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ConfigError(msg) => AppError::NotConfigured(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Media store trait
///
/// Implementations must overwrite an existing object with the same key, so a
/// user re-saving a selection replaces the previous image instead of creating
/// a duplicate.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload `data` under `key` and return its public URL.
    async fn upload(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<String>;

    /// Get the media store backend type
    fn backend_type(&self) -> MediaStoreBackend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use framegrab_core::ErrorMetadata;

    #[test]
    fn test_storage_error_conversion() {
        let err: AppError = StorageError::UploadFailed("HTTP 401".to_string()).into();
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_ERROR");
        assert!(err.client_message().contains("HTTP 401"));

        let err: AppError = StorageError::ConfigError("CLOUDINARY_API_KEY not configured".into()).into();
        assert_eq!(err.error_code(), "NOT_CONFIGURED");
    }
}
