//! FFmpegService - single frame extraction.

use crate::error::ToolError;
use crate::process::run_tool;
use anyhow::{Context, Result};
use async_trait::async_trait;
use framegrab_core::ToolConfig;
use std::path::Path;

const TOOL: &str = "ffmpeg";

/// Pulls still frames out of a local media file.
#[async_trait]
pub trait FrameExtractor: Send + Sync {
    /// Write the frame at `offset_secs` (relative to the start of `media`) to
    /// `dest` as a JPEG. Offsets past the end of the media are an error.
    async fn extract_frame(&self, media: &Path, offset_secs: i64, dest: &Path) -> Result<(), ToolError>;
}

pub struct FFmpegService {
    ffmpeg_path: String,
    max_output_bytes: usize,
}

impl FFmpegService {
    pub fn new(tools: &ToolConfig) -> Result<Self> {
        super::validate_tool_path(&tools.ffmpeg_path).context("Invalid FFMPEG_PATH")?;

        Ok(Self {
            ffmpeg_path: tools.ffmpeg_path.clone(),
            max_output_bytes: tools.max_process_output_bytes,
        })
    }

    fn frame_args(media: &Path, offset_secs: i64, dest: &Path) -> Vec<String> {
        vec![
            "-hide_banner".to_string(),
            "-loglevel".to_string(),
            "error".to_string(),
            "-ss".to_string(),
            offset_secs.to_string(),
            "-i".to_string(),
            media.to_string_lossy().to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-y".to_string(),
            dest.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl FrameExtractor for FFmpegService {
    #[tracing::instrument(skip(self, media, dest))]
    async fn extract_frame(&self, media: &Path, offset_secs: i64, dest: &Path) -> Result<(), ToolError> {
        let args = Self::frame_args(media, offset_secs, dest);
        run_tool(TOOL, &self.ffmpeg_path, &args, self.max_output_bytes).await?;

        // Seeking past the end exits 0 without writing anything.
        let written = tokio::fs::metadata(dest)
            .await
            .map(|m| m.len() > 0)
            .unwrap_or(false);
        if !written {
            return Err(ToolError::MissingOutput {
                tool: TOOL,
                path: dest.to_path_buf(),
            });
        }

        tracing::debug!(offset_secs, dest = %dest.display(), "Frame extracted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use framegrab_core::ServiceConfig;

    #[test]
    fn test_frame_args() {
        let args = FFmpegService::frame_args(Path::new("/s/video.mp4"), 195, Path::new("/s/frame.jpg"));
        assert_eq!(
            args,
            vec![
                "-hide_banner", "-loglevel", "error", "-ss", "195", "-i", "/s/video.mp4",
                "-frames:v", "1", "-q:v", "2", "-y", "/s/frame.jpg"
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_missing_output_is_an_error() {
        // `true` exits 0 without writing the frame.
        let mut tools = ServiceConfig::default().tools;
        tools.ffmpeg_path = "true".to_string();
        let service = FFmpegService::new(&tools).unwrap();

        let dir = tempfile::TempDir::new().unwrap();
        let err = service
            .extract_frame(&dir.path().join("video.mp4"), 9999, &dir.path().join("frame.jpg"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingOutput { .. }));
    }
}
