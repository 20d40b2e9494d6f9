//! Framegrab Core Library
//!
//! This crate provides the domain types, error types, configuration, URL parsing
//! and timestamp planning shared by all framegrab components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod planner;
pub mod storage_types;
pub mod video_id;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ServiceConfig, ToolConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{DurationSource, FramePoint, FrameSize, VideoMetadata};
pub use planner::{offset_for, TimestampPlan};
pub use storage_types::MediaStoreBackend;
pub use video_id::{parse_video_id, VideoId};
