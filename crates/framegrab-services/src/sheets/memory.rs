use super::{SelectionRow, SelectionSheet, SheetResult, HEADER};
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Spreadsheet kept in process memory.
///
/// Used when no spreadsheet is configured, and by tests. Row 0 is the header
/// once any write has happened. Rows are never evicted and are lost on
/// restart, so configure `SPREADSHEET_ID` for anything long-running.
#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every row, header included.
    pub async fn rows(&self) -> Vec<Vec<String>> {
        self.rows.lock().await.clone()
    }
}

fn header_values() -> Vec<String> {
    HEADER.iter().map(|h| h.to_string()).collect()
}

#[async_trait]
impl SelectionSheet for MemorySheet {
    async fn ensure_header(&self) -> SheetResult<()> {
        let mut rows = self.rows.lock().await;
        match rows.first_mut() {
            Some(first) => *first = header_values(),
            None => rows.push(header_values()),
        }
        Ok(())
    }

    async fn append_row(&self, row: &SelectionRow) -> SheetResult<()> {
        let mut rows = self.rows.lock().await;
        if rows.is_empty() {
            rows.push(header_values());
        }
        rows.push(row.to_values());
        tracing::debug!(video_id = %row.video_id, "Selection recorded in memory sheet");
        Ok(())
    }
}
