//! Per-request scratch directories.

use framegrab_core::VideoId;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const VIDEO_FILE: &str = "video.mp4";

/// A directory owned by exactly one request.
///
/// Named `{videoId}-XXXXXX` under the scratch root, so concurrent requests for
/// the same video never share files. The directory and everything in it is
/// removed on [`ScratchSpace::close`] or on drop, whichever comes first; a
/// failed removal is logged at WARN and otherwise ignored.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchSpace {
    pub async fn create(root: &Path, video_id: &VideoId) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(root).await?;

        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", video_id))
            .tempdir_in(root)?;
        let path = dir.path().to_path_buf();

        tracing::debug!(path = %path.display(), "Scratch directory created");
        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the downloaded video (or segment) is written.
    pub fn video_path(&self) -> PathBuf {
        self.path.join(VIDEO_FILE)
    }

    /// Where the `index`-th raw frame of the request is written.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.path.join(format!("frame-{:02}.jpg", index))
    }

    /// Remove the directory now.
    pub fn close(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if let Some(dir) = self.dir.take() {
            match dir.close() {
                Ok(()) => tracing::debug!(path = %self.path.display(), "Scratch directory removed"),
                Err(e) => tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Failed to remove scratch directory"
                ),
            }
        }
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        self.remove();
    }
}
