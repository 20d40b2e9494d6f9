//! Shared key generation for media stores.

use crate::traits::{StorageError, StorageResult};
use framegrab_core::{FrameSize, VideoId};

/// `{videoId}-{percent}-{size}`
pub fn selection_key(video_id: &VideoId, percent: u32, size: FrameSize) -> String {
    format!("{}-{}-{}", video_id, percent, size)
}

/// File name used by backends that store plain files.
pub fn object_name(key: &str) -> String {
    format!("{}.jpg", key)
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }

    if key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }

    if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '/' | '.'))
    {
        return Err(StorageError::InvalidKey(format!(
            "Storage key '{}' contains unsupported characters",
            key
        )));
    }

    Ok(())
}
