//! yt-dlp driver.

use crate::error::ToolError;
use crate::process::run_tool;
use anyhow::{Context, Result};
use async_trait::async_trait;
use framegrab_core::{ToolConfig, VideoMetadata};
use serde::Deserialize;
use std::path::Path;

const TOOL: &str = "yt-dlp";

/// Best video up to 1080p plus best audio, or the best single file up to 1080p.
pub const FORMAT_SELECTOR: &str = "bestvideo[height<=1080]+bestaudio/best[height<=1080]";

/// Where videos come from.
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Duration and title of the video at `url`.
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ToolError>;

    /// Materialize the whole video as an mp4 at `dest`.
    async fn download(&self, url: &str, dest: &Path) -> Result<(), ToolError>;

    /// Materialize `[start_secs, start_secs + length_secs)` as an mp4 at `dest`.
    async fn download_segment(
        &self,
        url: &str,
        start_secs: i64,
        length_secs: u64,
        dest: &Path,
    ) -> Result<(), ToolError>;
}

#[derive(Debug, Deserialize)]
struct DumpJson {
    duration: Option<f64>,
    title: Option<String>,
}

pub struct YtDlpClient {
    ytdlp_path: String,
    ffmpeg_path: String,
    max_output_bytes: usize,
}

impl YtDlpClient {
    pub fn new(tools: &ToolConfig) -> Result<Self> {
        super::validate_tool_path(&tools.ytdlp_path).context("Invalid YTDLP_PATH")?;
        super::validate_tool_path(&tools.ffmpeg_path).context("Invalid FFMPEG_PATH")?;

        Ok(Self {
            ytdlp_path: tools.ytdlp_path.clone(),
            ffmpeg_path: tools.ffmpeg_path.clone(),
            max_output_bytes: tools.max_process_output_bytes,
        })
    }

    fn download_args(&self, dest: &Path) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            FORMAT_SELECTOR.to_string(),
            "--merge-output-format".to_string(),
            "mp4".to_string(),
            "--no-playlist".to_string(),
            "--no-part".to_string(),
            "--no-progress".to_string(),
            "-o".to_string(),
            dest.to_string_lossy().to_string(),
        ];
        if self.ffmpeg_path != "ffmpeg" {
            args.push("--ffmpeg-location".to_string());
            args.push(self.ffmpeg_path.clone());
        }
        args
    }

    async fn run_download(&self, mut args: Vec<String>, url: &str, dest: &Path) -> Result<(), ToolError> {
        args.push("--".to_string());
        args.push(url.to_string());

        let start = std::time::Instant::now();
        run_tool(TOOL, &self.ytdlp_path, &args, self.max_output_bytes).await?;

        if !tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Err(ToolError::MissingOutput {
                tool: TOOL,
                path: dest.to_path_buf(),
            });
        }

        tracing::info!(
            dest = %dest.display(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Video downloaded"
        );
        Ok(())
    }
}

/// `--download-sections` value for `[start_secs, start_secs + length_secs)`.
fn section_spec(start_secs: i64, length_secs: u64) -> String {
    let length = i64::try_from(length_secs).unwrap_or(i64::MAX);
    format!("*{}-{}", start_secs, start_secs.saturating_add(length))
}

/// Parse `--dump-json` output. A missing or non-positive duration is an error.
pub(crate) fn parse_metadata(stdout: &[u8]) -> Result<VideoMetadata, ToolError> {
    let dump: DumpJson = serde_json::from_slice(stdout).map_err(|e| ToolError::InvalidOutput {
        tool: TOOL,
        message: format!("invalid JSON: {}", e),
    })?;

    match dump.duration {
        Some(duration) if duration.is_finite() && duration > 0.0 => {
            Ok(VideoMetadata::probed(duration, dump.title))
        }
        other => Err(ToolError::InvalidOutput {
            tool: TOOL,
            message: format!("no usable duration (got {:?})", other),
        }),
    }
}

#[async_trait]
impl VideoSource for YtDlpClient {
    #[tracing::instrument(skip(self))]
    async fn fetch_metadata(&self, url: &str) -> Result<VideoMetadata, ToolError> {
        let output = run_tool(
            TOOL,
            &self.ytdlp_path,
            ["--dump-json", "--no-playlist", "--skip-download", "--", url],
            self.max_output_bytes,
        )
        .await?;

        parse_metadata(&output.stdout)
    }

    #[tracing::instrument(skip(self, dest))]
    async fn download(&self, url: &str, dest: &Path) -> Result<(), ToolError> {
        let args = self.download_args(dest);
        self.run_download(args, url, dest).await
    }

    #[tracing::instrument(skip(self, dest))]
    async fn download_segment(
        &self,
        url: &str,
        start_secs: i64,
        length_secs: u64,
        dest: &Path,
    ) -> Result<(), ToolError> {
        let mut args = self.download_args(dest);
        args.push("--download-sections".to_string());
        args.push(section_spec(start_secs, length_secs));
        args.push("--force-keyframes-at-cuts".to_string());
        self.run_download(args, url, dest).await
    }
}
