use serde::{Deserialize, Serialize};

/// Where selected frames are published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaStoreBackend {
    Cloudinary,
    S3,
    Local,
}

impl MediaStoreBackend {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Some(MediaStoreBackend::Cloudinary),
            "s3" => Some(MediaStoreBackend::S3),
            "local" => Some(MediaStoreBackend::Local),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStoreBackend::Cloudinary => "cloudinary",
            MediaStoreBackend::S3 => "s3",
            MediaStoreBackend::Local => "local",
        }
    }
}

impl std::fmt::Display for MediaStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
