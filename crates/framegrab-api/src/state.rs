//! Application state shared by every handler.

use framegrab_processing::ExtractionPipeline;
use framegrab_services::SelectionSheet;
use framegrab_storage::MediaStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: ExtractionPipeline,
    /// `None` when the configured backend is missing credentials; only
    /// `/save-selection` needs it.
    pub media_store: Option<Arc<dyn MediaStore>>,
    /// `None` when a spreadsheet is configured but its credentials are unusable.
    pub sheet: Option<Arc<dyn SelectionSheet>>,
}
