//! Video download and frame extraction.

mod service;
mod source;

pub use service::{FFmpegService, FrameExtractor};
pub use source::{VideoSource, YtDlpClient, FORMAT_SELECTOR};

use anyhow::{anyhow, Result};

/// Validate a configured tool path: no shell metacharacters, no traversal.
pub(crate) fn validate_tool_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() {
        return Err(anyhow!("Tool path is empty"));
    }
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Tool path contains dangerous characters: {}", path));
    }
    if path.contains("..") {
        return Err(anyhow!("Tool path contains directory traversal: {}", path));
    }
    Ok(())
}
