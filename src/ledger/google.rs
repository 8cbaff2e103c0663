//! `LedgerClient` backed by the Google Sheets REST API.
//!
//! Reads go through `spreadsheets.get` with grid data included so a cell's
//! displayed value and its note arrive in one round trip. Value writes use
//! `values.update` with user-entered input, and note writes use the
//! `updateCells` batch request, which addresses cells by grid range and tab
//! id rather than A1 notation.

use crate::config::GoogleAuth;
use crate::ledger::{CellContent, CellRef, LedgerClient};
use crate::{Config, Result};
use anyhow::{bail, Context};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, trace};

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

pub struct GoogleLedger {
    http: reqwest::Client,
    spreadsheet_id: String,
    auth: GoogleAuth,
    token: Mutex<Option<CachedToken>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl GoogleLedger {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            spreadsheet_id: config.spreadsheet_id().to_string(),
            auth: config.google().clone(),
            token: Mutex::new(None),
        }
    }

    /// Returns a valid access token, refreshing through the OAuth token
    /// endpoint when the cached one is within a minute of expiring.
    async fn access_token(&self) -> Result<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Utc::now() > Duration::seconds(60) {
                return Ok(token.access_token.clone());
            }
        }
        debug!("refreshing Google access token");

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: i64,
        }

        let response = self
            .http
            .post(TOKEN_ENDPOINT)
            .form(&[
                ("client_id", self.auth.client_id.as_str()),
                ("client_secret", self.auth.client_secret.as_str()),
                ("refresh_token", self.auth.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("token refresh request failed")?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            bail!("token refresh failed with status {status}: {body}");
        }
        let token: TokenResponse = response
            .json()
            .await
            .context("token refresh response was not valid JSON")?;

        let access_token = token.access_token.clone();
        *cached = Some(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        });
        Ok(access_token)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        trace!("GET {url}");
        let token = self.access_token().await?;
        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        check_status(response)
            .await?
            .json()
            .await
            .with_context(|| format!("response from {url} was not the expected shape"))
    }
}

#[async_trait::async_trait]
impl LedgerClient for GoogleLedger {
    async fn resolve_tab_id(&self, year: i32) -> Result<i64> {
        #[derive(Deserialize, Default)]
        #[serde(rename_all = "camelCase", default)]
        struct Spreadsheet {
            sheets: Vec<Tab>,
        }
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Tab {
            properties: TabProperties,
        }
        #[derive(Deserialize, Default)]
        #[serde(rename_all = "camelCase", default)]
        struct TabProperties {
            sheet_id: i64,
            title: String,
        }

        let url = format!(
            "{SHEETS_API}/{}?fields=sheets.properties",
            self.spreadsheet_id
        );
        let spreadsheet: Spreadsheet = self.get_json(&url).await?;
        let title = year.to_string();
        spreadsheet
            .sheets
            .into_iter()
            .find(|tab| tab.properties.title == title)
            .map(|tab| tab.properties.sheet_id)
            .with_context(|| format!("spreadsheet has no tab named '{title}'"))
    }

    async fn read_cell(&self, cell: &CellRef) -> Result<CellContent> {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Spreadsheet {
            sheets: Vec<Tab>,
        }
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Tab {
            data: Vec<GridData>,
        }
        #[derive(Deserialize, Default)]
        #[serde(rename_all = "camelCase", default)]
        struct GridData {
            row_data: Vec<RowData>,
        }
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct RowData {
            values: Vec<CellData>,
        }
        #[derive(Deserialize, Default)]
        #[serde(rename_all = "camelCase", default)]
        struct CellData {
            formatted_value: String,
            note: String,
        }

        let url = format!(
            "{SHEETS_API}/{}?ranges={cell}&includeGridData=true\
             &fields=sheets(data(rowData(values(formattedValue,note))))",
            self.spreadsheet_id
        );
        let spreadsheet: Spreadsheet = self.get_json(&url).await?;
        let cell_data = spreadsheet
            .sheets
            .into_iter()
            .next()
            .and_then(|tab| tab.data.into_iter().next())
            .and_then(|grid| grid.row_data.into_iter().next())
            .and_then(|row| row.values.into_iter().next())
            .unwrap_or_default();
        Ok(CellContent {
            value: cell_data.formatted_value,
            note: cell_data.note,
        })
    }

    async fn write_value(&self, cell: &CellRef, value: &str) -> Result<()> {
        let url = format!(
            "{SHEETS_API}/{}/values/{cell}?valueInputOption=USER_ENTERED",
            self.spreadsheet_id
        );
        trace!("PUT {url}");
        let token = self.access_token().await?;
        let body = json!({
            "range": cell.to_string(),
            "majorDimension": "ROWS",
            "values": [[value]],
        });
        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("value write to {cell} failed"))?;
        check_status(response).await?;
        Ok(())
    }

    async fn write_note(&self, tab_id: i64, cell: &CellRef, note: &str) -> Result<()> {
        let url = format!("{SHEETS_API}/{}:batchUpdate", self.spreadsheet_id);
        trace!("POST {url}");
        let token = self.access_token().await?;
        let body = json!({
            "requests": [{
                "updateCells": {
                    "rows": [{ "values": [{ "note": note }] }],
                    "fields": "note",
                    "range": {
                        "sheetId": tab_id,
                        "startRowIndex": cell.grid_row(),
                        "endRowIndex": cell.grid_row() + 1,
                        "startColumnIndex": cell.grid_col(),
                        "endColumnIndex": cell.grid_col() + 1,
                    },
                },
            }],
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("note write to {cell} failed"))?;
        check_status(response).await?;
        Ok(())
    }
}

/// Surfaces non-2xx responses as errors carrying the status and body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read response body".to_string());
    bail!("Sheets API call failed with status {status}: {body}")
}
