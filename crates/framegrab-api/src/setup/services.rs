//! Service initialization and application state setup

use crate::state::AppState;
use anyhow::{Context, Result};
use framegrab_core::Config;
use framegrab_processing::{ExtractionPipeline, FFmpegService, YtDlpClient};
use framegrab_services::create_selection_sheet;
use framegrab_storage::create_media_store;
use std::sync::Arc;

/// Build the pipeline and the optional integrations.
///
/// Invalid tool paths fail startup. Media store and spreadsheet problems are
/// logged and only surface when `/save-selection` is called.
pub async fn initialize_services(config: &Config) -> Result<Arc<AppState>> {
    let tools = config.tools();

    let source = YtDlpClient::new(tools).context("Failed to configure yt-dlp")?;
    let extractor = FFmpegService::new(tools).context("Failed to configure ffmpeg")?;
    let pipeline = ExtractionPipeline::new(Arc::new(source), Arc::new(extractor), tools);

    tracing::info!(
        scratch_dir = %pipeline.scratch_root().display(),
        fallback_duration_secs = tools.fallback_duration_secs,
        "Extraction pipeline configured"
    );

    let media_store = match create_media_store(config).await {
        Ok(store) => {
            tracing::info!(backend = store.backend_type().as_str(), "Media store configured");
            Some(store)
        }
        Err(e) => {
            tracing::warn!(
                error = %e,
                backend = config.media_store_backend().as_str(),
                "Media store unavailable; /save-selection will fail"
            );
            None
        }
    };

    let sheet = match create_selection_sheet(config) {
        Ok(sheet) => Some(sheet),
        Err(e) => {
            tracing::warn!(error = %e, "Selection spreadsheet unavailable; /save-selection will fail");
            None
        }
    };

    Ok(Arc::new(AppState {
        pipeline,
        media_store,
        sheet,
    }))
}
