//! Domain models shared by the pipeline and the API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How the duration in [`VideoMetadata`] was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DurationSource {
    /// Reported by the video-info tool.
    Probed,
    /// Lookup failed; the configured fallback duration was substituted.
    Fallback,
}

impl DurationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationSource::Probed => "probed",
            DurationSource::Fallback => "fallback",
        }
    }
}

/// Metadata of a source video, fetched once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub duration_secs: f64,
    pub title: Option<String>,
    pub duration_source: DurationSource,
}

impl VideoMetadata {
    pub fn probed(duration_secs: f64, title: Option<String>) -> Self {
        Self {
            duration_secs,
            title,
            duration_source: DurationSource::Probed,
        }
    }

    pub fn fallback(duration_secs: f64) -> Self {
        Self {
            duration_secs,
            title: None,
            duration_source: DurationSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.duration_source == DurationSource::Fallback
    }
}

/// Fixed output geometry of a cropped frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FrameSize {
    /// 1080×1920 (9:16), cover-fit
    #[default]
    Portrait,
    /// 1080×1350 (4:5), cover-fit
    #[serde(alias = "portrait-4x5")]
    PortraitFeed,
    /// 1200×628, fit-inside then fixed crop
    Landscape,
}

impl FrameSize {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            FrameSize::Portrait => (1080, 1920),
            FrameSize::PortraitFeed => (1080, 1350),
            FrameSize::Landscape => (1200, 628),
        }
    }

    /// Name used in storage keys and spreadsheet rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameSize::Portrait => "portrait",
            FrameSize::PortraitFeed => "portrait-feed",
            FrameSize::Landscape => "landscape",
        }
    }
}

impl std::fmt::Display for FrameSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One planned extraction point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FramePoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    pub percent: u32,
    /// Whole seconds from the start of the video; may be zero or negative for
    /// degenerate durations.
    pub timestamp: i64,
}
