// =============================================================================
// GOOGLE SHEETS CLIENT
// =============================================================================
//
// Thin wrapper over the Sheets v4 REST API implementing `SheetStore`.
//
// **Endpoints used:**
// - `GET  values/{range}`             read rows / a column
// - `PUT  values/{range}`             overwrite a cell (USER_ENTERED)
// - `GET  {id}?fields=sheets...`      list tab titles
// - `POST {id}:batchUpdate`           add a missing tab
//
// Ranges are A1 notation with the tab name quoted, e.g. `'Posts'!A:D`.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use super::service_account::ServiceAccountAuth;
use crate::core::sheets::{SheetError, SheetStore};
use crate::infra::http::{send_with_backoff, RetryPolicy, SendError};

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Quote a tab name for A1 notation and append the cell range.
pub fn a1_range(sheet: &str, range: &str) -> String {
    format!("'{}'!{}", sheet.replace('\'', "''"), range)
}

/// Cell values come back as JSON; anything that isn't a string is stringified.
fn cell_to_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn rows_from(range: ValueRange) -> Vec<Vec<String>> {
    range
        .values
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect()
}

pub struct GoogleSheetsClient {
    client: Client,
    auth: ServiceAccountAuth,
    spreadsheet_id: String,
    base_url: String,
    retry: RetryPolicy,
}

impl GoogleSheetsClient {
    pub fn new(auth: ServiceAccountAuth, spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: SHEETS_API_BASE.to_string(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn spreadsheet_url(&self) -> String {
        format!("{}/{}", self.base_url, self.spreadsheet_id)
    }

    fn values_url(&self, sheet: &str, range: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(),
            utf8_percent_encode(&a1_range(sheet, range), NON_ALPHANUMERIC)
        )
    }

    async fn token(&self) -> Result<String, SheetError> {
        self.auth
            .get_access_token()
            .await
            .map_err(|e| SheetError::Auth(e.to_string()))
    }

    async fn send<F>(&self, build: F) -> Result<Response, SheetError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let response = send_with_backoff(self.retry, build)
            .await
            .map_err(|e| match e {
                SendError::RateLimited { attempts } => SheetError::RateLimited { attempts },
                SendError::Http(e) => SheetError::Http(e.to_string()),
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SheetError::Api { status, body });
        }
        Ok(response)
    }

    async fn get_values(
        &self,
        sheet: &str,
        range: &str,
        major_dimension: &str,
    ) -> Result<ValueRange, SheetError> {
        let token = self.token().await?;
        let url = self.values_url(sheet, range);

        tracing::debug!("Reading {} ({})", a1_range(sheet, range), major_dimension);
        let response = self
            .send(|| {
                self.client
                    .get(&url)
                    .bearer_auth(&token)
                    .query(&[("majorDimension", major_dimension)])
            })
            .await?;

        response
            .json()
            .await
            .map_err(|e| SheetError::Decode(e.to_string()))
    }

    async fn sheet_titles(&self) -> Result<Vec<String>, SheetError> {
        let token = self.token().await?;
        let url = self.spreadsheet_url();

        let response = self
            .send(|| {
                self.client
                    .get(&url)
                    .bearer_auth(&token)
                    .query(&[("fields", "sheets.properties.title")])
            })
            .await?;

        let meta: SpreadsheetMeta = response
            .json()
            .await
            .map_err(|e| SheetError::Decode(e.to_string()))?;
        Ok(meta
            .sheets
            .into_iter()
            .map(|s| s.properties.title)
            .collect())
    }
}

#[async_trait]
impl SheetStore for GoogleSheetsClient {
    async fn read_rows(&self, sheet: &str, range: &str) -> Result<Vec<Vec<String>>, SheetError> {
        Ok(rows_from(self.get_values(sheet, range, "ROWS").await?))
    }

    async fn column_len(&self, sheet: &str, column: &str) -> Result<usize, SheetError> {
        let range = format!("{}:{}", column, column);
        let values = self.get_values(sheet, &range, "COLUMNS").await?;
        Ok(values.values.first().map(Vec::len).unwrap_or(0))
    }

    async fn write_cell(
        &self,
        sheet: &str,
        row: usize,
        column: &str,
        value: &str,
    ) -> Result<(), SheetError> {
        let token = self.token().await?;
        let cell = format!("{}{}", column, row);
        let url = self.values_url(sheet, &cell);
        let body = json!({
            "range": a1_range(sheet, &cell),
            "majorDimension": "ROWS",
            "values": [[value]],
        });

        tracing::debug!("Writing {}", a1_range(sheet, &cell));
        self.send(|| {
            self.client
                .put(&url)
                .bearer_auth(&token)
                .query(&[("valueInputOption", "USER_ENTERED")])
                .json(&body)
        })
        .await?;
        Ok(())
    }

    async fn ensure_sheet(&self, sheet: &str, rows: u32, cols: u32) -> Result<bool, SheetError> {
        if self.sheet_titles().await?.iter().any(|t| t == sheet) {
            return Ok(false);
        }

        let token = self.token().await?;
        let url = format!("{}:batchUpdate", self.spreadsheet_url());
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": sheet,
                        "gridProperties": { "rowCount": rows, "columnCount": cols },
                    }
                }
            }]
        });

        self.send(|| self.client.post(&url).bearer_auth(&token).json(&body))
            .await?;
        Ok(true)
    }
}
