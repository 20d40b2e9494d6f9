//! Selection spreadsheet
//!
//! The sheet is append-only. Every write first upserts the header row, which is
//! idempotent: writing the same 11 header cells to `A1:K1` any number of times
//! leaves exactly one header.

#[cfg(feature = "google-sheets")]
mod auth;
mod factory;
#[cfg(feature = "google-sheets")]
mod google;
mod memory;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use framegrab_core::{AppError, FrameSize};
use thiserror::Error;

#[cfg(feature = "google-sheets")]
pub use auth::{ServiceAccountAuth, StaticToken, TokenProvider};
pub use factory::create_selection_sheet;
#[cfg(feature = "google-sheets")]
pub use google::GoogleSheet;
pub use memory::MemorySheet;

/// Column headers, in order.
pub const HEADER: [&str; 11] = [
    "Timestamp",
    "Video ID",
    "Video URL",
    "Video Title",
    "Portrait Percent",
    "Portrait Size",
    "Portrait URL",
    "Landscape Percent",
    "Landscape Size",
    "Landscape URL",
    "Status",
];

/// A1 notation covering exactly the header cells.
pub(crate) fn header_range(sheet_name: &str) -> String {
    format!("{}!A1:K1", sheet_name)
}

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Invalid credentials: {0}")]
    Credentials(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Sheets API returned {status}: {message}")]
    Api { status: u16, message: String },
}

pub type SheetResult<T> = Result<T, SheetError>;

impl From<SheetError> for AppError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::Credentials(msg) => AppError::NotConfigured(msg),
            other => AppError::Spreadsheet(other.to_string()),
        }
    }
}

/// One saved selection.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionRow {
    pub recorded_at: DateTime<Utc>,
    pub video_id: String,
    pub video_url: String,
    pub video_title: String,
    pub portrait_percent: u32,
    pub portrait_size: FrameSize,
    pub portrait_url: String,
    pub landscape_percent: u32,
    pub landscape_size: FrameSize,
    pub landscape_url: String,
    pub status: String,
}

impl SelectionRow {
    /// Cell values in [`HEADER`] order.
    pub fn to_values(&self) -> Vec<String> {
        vec![
            self.recorded_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            self.video_id.clone(),
            self.video_url.clone(),
            self.video_title.clone(),
            self.portrait_percent.to_string(),
            self.portrait_size.to_string(),
            self.portrait_url.clone(),
            self.landscape_percent.to_string(),
            self.landscape_size.to_string(),
            self.landscape_url.clone(),
            self.status.clone(),
        ]
    }
}

#[async_trait]
pub trait SelectionSheet: Send + Sync {
    /// Write the header row. Safe to call before every append.
    async fn ensure_header(&self) -> SheetResult<()>;

    /// Append one row after the last non-empty row.
    async fn append_row(&self, row: &SelectionRow) -> SheetResult<()>;

    /// Header upsert followed by an append.
    async fn record(&self, row: &SelectionRow) -> SheetResult<()> {
        self.ensure_header().await?;
        self.append_row(row).await
    }
}

#[cfg(test)]
pub(crate) fn sample_row() -> SelectionRow {
    use chrono::TimeZone;

    SelectionRow {
        recorded_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        video_id: "dQw4w9WgXcQ".to_string(),
        video_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
        video_title: "Never Gonna Give You Up".to_string(),
        portrait_percent: 48,
        portrait_size: FrameSize::PortraitFeed,
        portrait_url: "https://cdn.example/dQw4w9WgXcQ-48-portrait-feed".to_string(),
        landscape_percent: 64,
        landscape_size: FrameSize::Landscape,
        landscape_url: "https://cdn.example/dQw4w9WgXcQ-64-landscape".to_string(),
        status: "saved".to_string(),
    }
}
