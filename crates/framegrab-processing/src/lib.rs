//! Framegrab Processing Library
//!
//! Everything between a video URL and a cropped JPEG:
//! - external tool drivers (`yt-dlp`, `ffmpeg`) behind the [`VideoSource`] and
//!   [`FrameExtractor`] traits
//! - cropping and JPEG encoding
//! - per-request scratch directories
//! - the [`ExtractionPipeline`] that sequences them

pub mod compression;
pub mod crop;
pub mod error;
pub mod pipeline;
pub mod process;
pub mod scratch;
pub mod video;

pub use crop::{ImageCropper, ImageError};
pub use error::ToolError;
pub use pipeline::{
    DualFrameSet, ExtractedFrame, ExtractionPipeline, FrameSet, SingleFrame, TimestampRequest,
};
pub use scratch::ScratchSpace;
pub use video::{FFmpegService, FrameExtractor, VideoSource, YtDlpClient};
