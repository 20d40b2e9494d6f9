use super::auth::TokenProvider;
use super::{header_range, SelectionRow, SelectionSheet, SheetError, SheetResult, HEADER};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use std::sync::Arc;

const DEFAULT_API_BASE: &str = "https://sheets.googleapis.com";

/// Google Sheets v4 `values` API.
pub struct GoogleSheet {
    client: Client,
    api_base: String,
    spreadsheet_id: String,
    sheet_name: String,
    tokens: Arc<dyn TokenProvider>,
}

impl GoogleSheet {
    pub fn new(
        client: Client,
        spreadsheet_id: String,
        sheet_name: String,
        tokens: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            spreadsheet_id,
            sheet_name,
            tokens,
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// `{base}/v4/spreadsheets/{id}/values/{range}{suffix}`, with the range
    /// percent-encoded as a single path segment.
    fn values_url(&self, range: &str, suffix: &str) -> SheetResult<Url> {
        let range = format!("{}{}", range, suffix);
        let mut url = Url::parse(&self.api_base)
            .map_err(|e| SheetError::Request(format!("Invalid Sheets API base: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::Request("Sheets API base cannot be a base URL".to_string()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                range.as_str(),
            ]);
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> SheetResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        Err(SheetError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl SelectionSheet for GoogleSheet {
    async fn ensure_header(&self) -> SheetResult<()> {
        let range = header_range(&self.sheet_name);
        let url = self.values_url(&range, "")?;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .put(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW")])
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": [HEADER],
            }))
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        Self::check(response).await
    }

    async fn append_row(&self, row: &SelectionRow) -> SheetResult<()> {
        let range = format!("{}!A:K", self.sheet_name);
        let url = self.values_url(&range, ":append")?;
        let token = self.tokens.access_token().await?;

        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .query(&[("valueInputOption", "RAW"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({
                "majorDimension": "ROWS",
                "values": [row.to_values()],
            }))
            .send()
            .await
            .map_err(|e| SheetError::Request(e.to_string()))?;

        Self::check(response).await?;

        tracing::info!(
            spreadsheet_id = %self.spreadsheet_id,
            video_id = %row.video_id,
            "Selection appended to spreadsheet"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::auth::StaticToken;
    use crate::sheets::sample_row;
    use mockito::Matcher;

    fn sheet(api_base: &str) -> GoogleSheet {
        GoogleSheet::new(
            Client::new(),
            "sheet-id".to_string(),
            "Sheet1".to_string(),
            Arc::new(StaticToken("ya29.test".to_string())),
        )
        .with_api_base(api_base)
    }

    #[test]
    fn test_values_url_encodes_sheet_name() {
        let sheet = GoogleSheet::new(
            Client::new(),
            "abc".to_string(),
            "My Sheet".to_string(),
            Arc::new(StaticToken(String::new())),
        );
        let url = sheet.values_url("My Sheet!A:K", ":append").unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc/values/My%20Sheet!A:K:append"
        );
    }

    #[tokio::test]
    async fn test_header_upsert_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        let header = server
            .mock("PUT", "/v4/spreadsheets/sheet-id/values/Sheet1!A1:K1")
            .match_query(Matcher::UrlEncoded(
                "valueInputOption".into(),
                "RAW".into(),
            ))
            .match_header("authorization", "Bearer ya29.test")
            .match_body(Matcher::PartialJson(json!({
                "range": "Sheet1!A1:K1",
                "values": [HEADER],
            })))
            .with_status(200)
            .with_body(r#"{"updatedCells":11}"#)
            .expect(2)
            .create_async()
            .await;

        let sheet = sheet(&server.url());
        sheet.ensure_header().await.unwrap();
        sheet.ensure_header().await.unwrap();

        header.assert_async().await;
    }

    #[tokio::test]
    async fn test_record_upserts_header_then_appends() {
        let mut server = mockito::Server::new_async().await;
        let row = sample_row();

        let header = server
            .mock("PUT", "/v4/spreadsheets/sheet-id/values/Sheet1!A1:K1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;
        let append = server
            .mock("POST", "/v4/spreadsheets/sheet-id/values/Sheet1!A:K:append")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()),
                Matcher::UrlEncoded("insertDataOption".into(), "INSERT_ROWS".into()),
            ]))
            .match_body(Matcher::PartialJson(json!({ "values": [row.to_values()] })))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        sheet(&server.url()).record(&row).await.unwrap();

        header.assert_async().await;
        append.assert_async().await;
    }

    #[tokio::test]
    async fn test_api_error_surfaces_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/v4/spreadsheets/sheet-id/values/Sheet1!A1:K1")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"message":"The caller does not have permission"}}"#)
            .create_async()
            .await;

        let err = sheet(&server.url()).record(&sample_row()).await.unwrap_err();
        match err {
            SheetError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("permission"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
