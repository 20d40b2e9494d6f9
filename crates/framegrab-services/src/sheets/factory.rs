use super::{MemorySheet, SelectionSheet, SheetResult};
use framegrab_core::Config;
use std::sync::Arc;

#[cfg(feature = "google-sheets")]
use super::{GoogleSheet, ServiceAccountAuth, SheetError};

/// Create the selection sheet from configuration.
///
/// Without `SPREADSHEET_ID` selections are kept in memory and lost on restart.
pub fn create_selection_sheet(config: &Config) -> SheetResult<Arc<dyn SelectionSheet>> {
    let Some(spreadsheet_id) = config.spreadsheet_id() else {
        tracing::warn!("SPREADSHEET_ID not set; selections are kept in memory only");
        return Ok(Arc::new(MemorySheet::new()));
    };

    google_sheet(config, spreadsheet_id)
}

#[cfg(feature = "google-sheets")]
fn google_sheet(config: &Config, spreadsheet_id: &str) -> SheetResult<Arc<dyn SelectionSheet>> {
    let credentials = config
        .google_credentials()
        .ok_or_else(|| SheetError::Credentials("GOOGLE_CREDENTIALS not configured".to_string()))?;

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()
        .map_err(|e| SheetError::Request(format!("Failed to create HTTP client: {}", e)))?;

    let auth = ServiceAccountAuth::from_credentials(credentials, client.clone())?;
    let sheet = GoogleSheet::new(
        client,
        spreadsheet_id.to_string(),
        config.sheet_name().to_string(),
        Arc::new(auth),
    );

    tracing::info!(
        spreadsheet_id = %spreadsheet_id,
        sheet_name = %config.sheet_name(),
        "Google Sheets selection log configured"
    );
    Ok(Arc::new(sheet))
}

#[cfg(not(feature = "google-sheets"))]
fn google_sheet(_config: &Config, spreadsheet_id: &str) -> SheetResult<Arc<dyn SelectionSheet>> {
    tracing::warn!(
        spreadsheet_id = %spreadsheet_id,
        "google-sheets feature not enabled; selections are kept in memory only"
    );
    Ok(Arc::new(MemorySheet::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use framegrab_core::ServiceConfig;

    #[test]
    fn test_memory_sheet_without_spreadsheet_id() {
        let config = Config::from(ServiceConfig::default());
        assert!(create_selection_sheet(&config).is_ok());
    }

    #[cfg(feature = "google-sheets")]
    #[test]
    fn test_bad_credentials_fail() {
        let config = Config::from(ServiceConfig {
            spreadsheet_id: Some("sheet-id".to_string()),
            google_credentials: Some("{}".to_string()),
            ..ServiceConfig::default()
        });
        assert!(create_selection_sheet(&config).is_err());
    }
}
