//! Test helpers: build AppState and router with fake external tools.
//!
//! No `yt-dlp` or `ffmpeg` binaries are needed. The fake extractor writes a
//! 1920x1080 JPEG for every requested offset and records the offsets it saw.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::TestServer;
use framegrab_api::setup::routes;
use framegrab_api::state::AppState;
use framegrab_core::{Config, ServiceConfig, ToolConfig, VideoMetadata};
use framegrab_processing::{ExtractionPipeline, FrameExtractor, ToolError, VideoSource};
use framegrab_services::{MemorySheet, SelectionSheet};
use framegrab_storage::{LocalStore, MediaStore};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const MEDIA_BASE_URL: &str = "http://localhost:3000/frames";

/// Reports a fixed duration (or fails the lookup) and writes a dummy video.
pub struct FakeSource {
    pub duration: Option<f64>,
    pub fail_download: bool,
}

#[async_trait]
impl VideoSource for FakeSource {
    async fn fetch_metadata(&self, _url: &str) -> Result<VideoMetadata, ToolError> {
        self.duration
            .map(|d| VideoMetadata::probed(d, Some("Fake video".to_string())))
            .ok_or(ToolError::InvalidOutput {
                tool: "yt-dlp",
                message: "no duration in output".to_string(),
            })
    }

    async fn download(&self, _url: &str, dest: &Path) -> Result<(), ToolError> {
        if self.fail_download {
            return Err(ToolError::Failed {
                tool: "yt-dlp",
                status: "exit status: 1".to_string(),
                stderr: "ERROR: Video unavailable".to_string(),
            });
        }
        tokio::fs::write(dest, b"fake mp4")
            .await
            .map_err(|source| ToolError::Io {
                tool: "yt-dlp",
                source,
            })
    }

    async fn download_segment(
        &self,
        url: &str,
        _start_secs: i64,
        _length_secs: u64,
        dest: &Path,
    ) -> Result<(), ToolError> {
        self.download(url, dest).await
    }
}

/// Writes a 1920x1080 JPEG; fails for negative offsets like ffmpeg would.
#[derive(Default)]
pub struct FakeExtractor {
    offsets: Mutex<Vec<i64>>,
}

impl FakeExtractor {
    pub fn offsets(&self) -> Vec<i64> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl FrameExtractor for FakeExtractor {
    async fn extract_frame(
        &self,
        _media: &Path,
        offset_secs: i64,
        dest: &Path,
    ) -> Result<(), ToolError> {
        self.offsets.lock().unwrap().push(offset_secs);
        if offset_secs < 0 {
            return Err(ToolError::MissingOutput {
                tool: "ffmpeg",
                path: dest.to_path_buf(),
            });
        }
        tokio::fs::write(dest, fixtures::landscape_jpeg())
            .await
            .map_err(|source| ToolError::Io {
                tool: "ffmpeg",
                source,
            })
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub extractor: Arc<FakeExtractor>,
    pub sheet: Arc<MemorySheet>,
    pub scratch_root: PathBuf,
    pub media_dir: PathBuf,
    _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Entries left under the scratch root. Zero means every request cleaned up.
    pub fn scratch_entries(&self) -> usize {
        std::fs::read_dir(&self.scratch_root)
            .map(|dir| dir.count())
            .unwrap_or(0)
    }
}

pub struct TestAppBuilder {
    source: FakeSource,
    with_media_store: bool,
    segment_downloads: bool,
    max_body_bytes: Option<usize>,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            source: FakeSource {
                duration: Some(100.0),
                fail_download: false,
            },
            with_media_store: true,
            segment_downloads: false,
            max_body_bytes: None,
        }
    }

    pub fn duration(mut self, duration: Option<f64>) -> Self {
        self.source.duration = duration;
        self
    }

    pub fn failing_download(mut self) -> Self {
        self.source.fail_download = true;
        self
    }

    pub fn segment_downloads(mut self) -> Self {
        self.segment_downloads = true;
        self
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = Some(limit);
        self
    }

    pub fn without_media_store(mut self) -> Self {
        self.with_media_store = false;
        self
    }

    pub async fn build(self) -> TestApp {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let scratch_root = temp_dir.path().join("scratch");
        let media_dir = temp_dir.path().join("media");

        let mut defaults = ServiceConfig::default();
        if let Some(limit) = self.max_body_bytes {
            defaults.base.max_body_bytes = limit;
        }
        let config = Config::from(ServiceConfig {
            tools: ToolConfig {
                scratch_dir: scratch_root.clone(),
                segment_downloads: self.segment_downloads,
                ..defaults.tools.clone()
            },
            ..defaults
        });

        let extractor = Arc::new(FakeExtractor::default());
        let pipeline = ExtractionPipeline::new(
            Arc::new(self.source),
            extractor.clone(),
            config.tools(),
        );

        let media_store: Option<Arc<dyn MediaStore>> = if self.with_media_store {
            let store = LocalStore::new(media_dir.clone(), MEDIA_BASE_URL.to_string())
                .await
                .expect("Failed to create local store");
            Some(Arc::new(store))
        } else {
            None
        };

        let sheet = Arc::new(MemorySheet::new());
        let state = Arc::new(AppState {
            pipeline,
            media_store,
            sheet: Some(sheet.clone() as Arc<dyn SelectionSheet>),
        });

        let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
        let server =
            TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            extractor,
            sheet,
            scratch_root,
            media_dir,
            _temp_dir: temp_dir,
        }
    }
}

pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::new().build().await
}
