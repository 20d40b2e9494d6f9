//! Shared constants.

/// Duration assumed when the metadata lookup fails.
pub const FALLBACK_DURATION_SECS: f64 = 300.0;

/// Prefix of every base64 frame handed back to clients.
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Percent used when a caller asks for an `"auto"` timestamp.
pub const AUTO_TIMESTAMP_PERCENT: u32 = 65;

/// JPEG quality of every cropped frame.
pub const OUTPUT_JPEG_QUALITY: u8 = 90;

pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";
