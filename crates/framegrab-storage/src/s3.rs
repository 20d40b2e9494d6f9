use crate::keys::{object_name, validate_key};
use crate::traits::{MediaStore, StorageError, StorageResult};
use crate::MediaStoreBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::{ObjectStoreExt, PutPayload, Result as ObjectResult};

/// S3 media store
#[derive(Clone)]
pub struct S3Store {
    store: AmazonS3,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Store {
    /// Create a new S3Store
    ///
    /// Credentials come from the standard AWS environment variables.
    /// `endpoint_url` targets S3-compatible providers (e.g. "http://localhost:9000"
    /// for MinIO); plain HTTP is allowed only when the endpoint asks for it.
    pub fn new(bucket: String, region: String, endpoint_url: Option<String>) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Store {
            store,
            bucket,
            region,
            endpoint_url,
        })
    }

    /// Public URL of an object
    ///
    /// AWS: `https://{bucket}.s3.{region}.amazonaws.com/{key}`.
    /// Custom endpoints use path style: `{endpoint}/{bucket}/{key}`.
    fn generate_url(&self, object: &str) -> String {
        match self.endpoint_url {
            Some(ref endpoint) => format!(
                "{}/{}/{}",
                endpoint.trim_end_matches('/'),
                self.bucket,
                object
            ),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, object
            ),
        }
    }
}

#[async_trait]
impl MediaStore for S3Store {
    async fn upload(&self, key: &str, data: Vec<u8>, _content_type: &str) -> StorageResult<String> {
        validate_key(key)?;

        let object = object_name(key);
        let size = data.len() as u64;
        let location = Path::from(object.clone());
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put(&location, PutPayload::from(Bytes::from(data)))
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %object,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %object,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(self.generate_url(&object))
    }

    fn backend_type(&self) -> MediaStoreBackend {
        MediaStoreBackend::S3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url_aws() {
        let store = S3Store::new("frames".to_string(), "eu-west-1".to_string(), None).unwrap();
        assert_eq!(
            store.generate_url("abc-65-portrait.jpg"),
            "https://frames.s3.eu-west-1.amazonaws.com/abc-65-portrait.jpg"
        );
    }

    #[test]
    fn test_generate_url_custom_endpoint() {
        let store = S3Store::new(
            "frames".to_string(),
            "us-east-1".to_string(),
            Some("http://localhost:9000/".to_string()),
        )
        .unwrap();
        assert_eq!(
            store.generate_url("abc-65-landscape.jpg"),
            "http://localhost:9000/frames/abc-65-landscape.jpg"
        );
        assert_eq!(store.backend_type(), MediaStoreBackend::S3);
    }
}
