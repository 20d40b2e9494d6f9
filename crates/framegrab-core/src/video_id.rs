//! Video identifier parsing.
//!
//! Accepted shapes, tried in order:
//! - `youtube.com/watch?...v=ID`, `youtu.be/ID`, `youtube.com/embed/ID`
//!   (scheme, `www.` and `m.` optional; the host must lead the input)
//! - a bare 11-character identifier

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static LONG_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:https?://)?(?:www\.|m\.)?(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .expect("long-form video URL pattern is valid")
});

static BARE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_-]{11})$").expect("bare video id pattern is valid")
});

/// Opaque 11-character token naming a source video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical watch URL handed to the downloader.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.0)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extract the video identifier from a URL or bare identifier.
///
/// Returns `None` when the input matches none of the accepted shapes.
pub fn parse_video_id(input: &str) -> Option<VideoId> {
    let input = input.trim();

    [&*LONG_FORM, &*BARE_ID]
        .iter()
        .find_map(|pattern| pattern.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| VideoId(m.as_str().to_string()))
}
