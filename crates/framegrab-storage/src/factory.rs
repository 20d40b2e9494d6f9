#[cfg(feature = "store-cloudinary")]
use crate::CloudinaryStore;
#[cfg(feature = "store-local")]
use crate::LocalStore;
#[cfg(feature = "store-s3")]
use crate::S3Store;
use crate::{MediaStore, MediaStoreBackend, StorageError, StorageResult};
use framegrab_core::Config;
use std::sync::Arc;

fn required(value: Option<&str>, name: &str) -> StorageResult<String> {
    value
        .map(String::from)
        .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
}

/// Create a media store based on configuration
pub async fn create_media_store(config: &Config) -> StorageResult<Arc<dyn MediaStore>> {
    match config.media_store_backend() {
        #[cfg(feature = "store-cloudinary")]
        MediaStoreBackend::Cloudinary => {
            let store = CloudinaryStore::new(
                required(config.cloudinary_cloud_name(), "CLOUDINARY_CLOUD_NAME")?,
                required(config.cloudinary_api_key(), "CLOUDINARY_API_KEY")?,
                required(config.cloudinary_api_secret(), "CLOUDINARY_API_SECRET")?,
                config.cloudinary_folder().map(String::from),
            )?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "store-cloudinary"))]
        MediaStoreBackend::Cloudinary => Err(StorageError::ConfigError(
            "Cloudinary backend not available (store-cloudinary feature not enabled)".to_string(),
        )),

        #[cfg(feature = "store-s3")]
        MediaStoreBackend::S3 => {
            let bucket = required(config.s3_bucket(), "S3_BUCKET")?;
            let region = config
                .s3_region()
                .or_else(|| config.aws_region())
                .map(String::from)
                .ok_or_else(|| {
                    StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
                })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let store = S3Store::new(bucket, region, endpoint)?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "store-s3"))]
        MediaStoreBackend::S3 => Err(StorageError::ConfigError(
            "S3 backend not available (store-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "store-local")]
        MediaStoreBackend::Local => {
            let base_path = required(config.local_storage_path(), "LOCAL_STORAGE_PATH")?;
            let base_url = required(config.local_storage_base_url(), "LOCAL_STORAGE_BASE_URL")?;

            let store = LocalStore::new(base_path, base_url).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "store-local"))]
        MediaStoreBackend::Local => Err(StorageError::ConfigError(
            "Local backend not available (store-local feature not enabled)".to_string(),
        )),
    }
}
