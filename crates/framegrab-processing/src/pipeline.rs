//! Extraction pipeline
//!
//! One call per HTTP request. Steps run strictly in order:
//! parse URL, fetch metadata, plan timestamps, download, then extract and crop
//! each frame. The URL is validated before any scratch directory exists, and
//! the scratch directory is gone by the time a call returns, whether it
//! succeeded or not. External tools only ever see the canonical watch URL
//! rebuilt from the parsed identifier.

use crate::crop::ImageCropper;
use crate::scratch::ScratchSpace;
use crate::video::{FrameExtractor, VideoSource};
use framegrab_core::{
    parse_video_id, AppError, FramePoint, FrameSize, TimestampPlan, ToolConfig, VideoId,
    VideoMetadata,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Instrument;

/// Sizes produced for every point of the 24-point plan.
const DUAL_SIZES: [FrameSize; 2] = [FrameSize::PortraitFeed, FrameSize::Landscape];

/// Requested position of a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampRequest {
    /// 65% of the duration.
    Auto,
    /// Whole seconds from the start.
    Seconds(i64),
}

/// A cropped frame at a planned point.
#[derive(Debug, Clone)]
pub struct ExtractedFrame {
    pub point: FramePoint,
    pub jpeg: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SingleFrame {
    pub video_id: VideoId,
    pub metadata: VideoMetadata,
    pub timestamp: i64,
    pub jpeg: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct FrameSet {
    pub video_id: VideoId,
    pub metadata: VideoMetadata,
    pub frames: Vec<ExtractedFrame>,
}

#[derive(Debug, Clone)]
pub struct DualFrameSet {
    pub video_id: VideoId,
    pub metadata: VideoMetadata,
    pub portrait: Vec<ExtractedFrame>,
    pub landscape: Vec<ExtractedFrame>,
}

#[derive(Clone)]
pub struct ExtractionPipeline {
    source: Arc<dyn VideoSource>,
    extractor: Arc<dyn FrameExtractor>,
    cropper: ImageCropper,
    scratch_root: PathBuf,
    fallback_duration_secs: f64,
    /// Set when single frames are taken from a downloaded segment.
    segment_length_secs: Option<u64>,
}

impl ExtractionPipeline {
    pub fn new(
        source: Arc<dyn VideoSource>,
        extractor: Arc<dyn FrameExtractor>,
        tools: &ToolConfig,
    ) -> Self {
        Self {
            source,
            extractor,
            cropper: ImageCropper::new(),
            scratch_root: tools.scratch_dir.clone(),
            fallback_duration_secs: tools.fallback_duration_secs,
            segment_length_secs: tools
                .segment_downloads
                .then_some(tools.segment_length_secs),
        }
    }

    pub fn scratch_root(&self) -> &Path {
        &self.scratch_root
    }

    pub fn parse_url(url: &str) -> Result<VideoId, AppError> {
        parse_video_id(url).ok_or_else(|| AppError::InvalidInput("Invalid YouTube URL".to_string()))
    }

    /// Metadata for `url`. Never fails: when the lookup does, the configured
    /// fallback duration is returned, flagged as [`DurationSource::Fallback`].
    ///
    /// [`DurationSource::Fallback`]: framegrab_core::DurationSource::Fallback
    pub async fn fetch_metadata(&self, url: &str) -> VideoMetadata {
        match self.source.fetch_metadata(url).await {
            Ok(metadata) => {
                tracing::debug!(
                    duration_secs = metadata.duration_secs,
                    title = ?metadata.title,
                    "Video metadata fetched"
                );
                metadata
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    fallback_secs = self.fallback_duration_secs,
                    "Metadata lookup failed; using fallback duration"
                );
                VideoMetadata::fallback(self.fallback_duration_secs)
            }
        }
    }

    /// One frame, cropped to `size`.
    pub async fn extract_single(
        &self,
        url: &str,
        timestamp: TimestampRequest,
        size: FrameSize,
    ) -> Result<SingleFrame, AppError> {
        let video_id = Self::parse_url(url)?;
        let span = tracing::info_span!("extract_single", video_id = %video_id, size = %size);

        async move {
            let source_url = video_id.watch_url();
            let metadata = self.fetch_metadata(&source_url).await;
            let timestamp = match timestamp {
                TimestampRequest::Auto => TimestampPlan::Single
                    .points(metadata.duration_secs)
                    .first()
                    .map(|p| p.timestamp)
                    .unwrap_or_default(),
                TimestampRequest::Seconds(secs) => secs,
            };

            let scratch = self.scratch(&video_id).await?;
            let media = scratch.video_path();

            let offset = match self.segment_length_secs {
                Some(length) => {
                    self.source
                        .download_segment(&source_url, timestamp, length, &media)
                        .await?;
                    0
                }
                None => {
                    self.source.download(&source_url, &media).await?;
                    timestamp
                }
            };

            let raw = self.grab(&scratch, &media, 0, offset).await?;
            let jpeg = self.crop(raw, vec![size]).await?.into_iter().next().ok_or_else(|| {
                AppError::Internal("Cropper returned no image".to_string())
            })?;
            scratch.close();

            tracing::info!(timestamp, bytes = jpeg.len(), "Frame extracted");
            Ok::<_, AppError>(SingleFrame {
                video_id: video_id.clone(),
                metadata,
                timestamp,
                jpeg,
            })
        }
        .instrument(span)
        .await
    }

    /// Three frames at 50/65/75%, cropped to `size`.
    pub async fn extract_trio(&self, url: &str, size: FrameSize) -> Result<FrameSet, AppError> {
        let video_id = Self::parse_url(url)?;
        let span = tracing::info_span!("extract_trio", video_id = %video_id, size = %size);

        async move {
            let source_url = video_id.watch_url();
            let metadata = self.fetch_metadata(&source_url).await;
            let plan = TimestampPlan::Trio.points(metadata.duration_secs);

            let scratch = self.scratch(&video_id).await?;
            let media = scratch.video_path();
            self.source.download(&source_url, &media).await?;

            let mut frames = Vec::with_capacity(plan.len());
            for (index, point) in plan.into_iter().enumerate() {
                let raw = self.grab(&scratch, &media, index, point.timestamp).await?;
                let jpeg = self.crop(raw, vec![size]).await?.into_iter().next().ok_or_else(|| {
                    AppError::Internal("Cropper returned no image".to_string())
                })?;
                frames.push(ExtractedFrame { point, jpeg });
            }
            scratch.close();

            tracing::info!(frames = frames.len(), "Frames extracted");
            Ok::<_, AppError>(FrameSet {
                video_id: video_id.clone(),
                metadata,
                frames,
            })
        }
        .instrument(span)
        .await
    }

    /// 24 frames from 4% to 96%, each cropped to portrait-feed and landscape.
    pub async fn extract_grid_both(&self, url: &str) -> Result<DualFrameSet, AppError> {
        let video_id = Self::parse_url(url)?;
        let span = tracing::info_span!("extract_grid_both", video_id = %video_id);

        async move {
            let source_url = video_id.watch_url();
            let metadata = self.fetch_metadata(&source_url).await;
            let plan = TimestampPlan::Grid.points(metadata.duration_secs);

            let scratch = self.scratch(&video_id).await?;
            let media = scratch.video_path();
            self.source.download(&source_url, &media).await?;

            let mut portrait = Vec::with_capacity(plan.len());
            let mut landscape = Vec::with_capacity(plan.len());
            for (index, point) in plan.into_iter().enumerate() {
                let raw = self.grab(&scratch, &media, index, point.timestamp).await?;
                let mut crops = self.crop(raw, DUAL_SIZES.to_vec()).await?.into_iter();
                match (crops.next(), crops.next()) {
                    (Some(p), Some(l)) => {
                        portrait.push(ExtractedFrame { point, jpeg: p });
                        landscape.push(ExtractedFrame { point, jpeg: l });
                    }
                    _ => return Err(AppError::Internal("Cropper returned too few images".to_string())),
                }
            }
            scratch.close();

            tracing::info!(frames = portrait.len(), "Frame grid extracted");
            Ok::<_, AppError>(DualFrameSet {
                video_id: video_id.clone(),
                metadata,
                portrait,
                landscape,
            })
        }
        .instrument(span)
        .await
    }

    async fn scratch(&self, video_id: &VideoId) -> Result<ScratchSpace, AppError> {
        ScratchSpace::create(&self.scratch_root, video_id)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create scratch directory: {}", e)))
    }

    /// Extract the frame at `offset_secs` into the scratch space and read it back.
    async fn grab(
        &self,
        scratch: &ScratchSpace,
        media: &Path,
        index: usize,
        offset_secs: i64,
    ) -> Result<Vec<u8>, AppError> {
        let dest = scratch.frame_path(index);
        self.extractor.extract_frame(media, offset_secs, &dest).await?;
        tokio::fs::read(&dest)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read extracted frame: {}", e)))
    }

    /// Decode and encode off the async runtime.
    async fn crop(&self, raw: Vec<u8>, sizes: Vec<FrameSize>) -> Result<Vec<Vec<u8>>, AppError> {
        let cropper = self.cropper;
        tokio::task::spawn_blocking(move || cropper.crop_many(&raw, &sizes))
            .await
            .map_err(|e| AppError::Internal(format!("Crop task failed: {}", e)))?
            .map_err(AppError::from)
    }
}
