//! Google Sheets ledger adapter.
//!
//! Reads a whole tab with the Sheets v4 `values.get` endpoint. The first row
//! returned is the header. Sheets drops trailing empty cells from each row,
//! which lines up with short ledger rows.

use reqwest::Url;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, error};

use crate::domain::config_validation::SheetsConfig;
use crate::domain::error::DigestError;
use crate::domain::ledger::LedgerSnapshot;
use crate::ports::row_source::RowSource;

/// Body of a `values.get` response. An empty tab has no `values` field.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

pub struct SheetsLedgerAdapter {
    config: SheetsConfig,
    store: String,
    tab: String,
    client: Client,
}

impl SheetsLedgerAdapter {
    pub fn new(config: SheetsConfig, store: &str, tab: &str) -> Result<Self, DigestError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DigestError::ledger(format!("failed to build sheets client: {e}")))?;

        Ok(Self {
            config,
            store: store.to_string(),
            tab: tab.to_string(),
            client,
        })
    }

    /// `{api_base}/v4/spreadsheets/{id}/values/{tab}`, with `key=` for API-key access.
    pub fn values_url(&self) -> Result<Url, DigestError> {
        let mut url = Url::parse(&self.config.api_base)
            .map_err(|e| DigestError::invalid("sheets", "api_base", e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| DigestError::invalid("sheets", "api_base", "not a base URL"))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.config.spreadsheet_id.as_str(),
                "values",
                self.tab.as_str(),
            ]);
        if let Some(key) = &self.config.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

impl RowSource for SheetsLedgerAdapter {
    fn fetch_all(&self) -> Result<LedgerSnapshot, DigestError> {
        let mut request = self.client.get(self.values_url()?);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .map_err(|e| DigestError::ledger(format!("sheets request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!(status = status.as_u16(), "sheets rejected the read: {}", body);
            return Err(DigestError::ledger(format!(
                "sheets returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let range: ValueRange = response
            .json()
            .map_err(|e| DigestError::ledger(format!("unreadable sheets response: {e}")))?;

        let records: Vec<Vec<String>> = range
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect();

        debug!(tab = %self.tab, records = records.len(), "read ledger sheet");
        Ok(LedgerSnapshot::from_records(records))
    }

    fn describe(&self) -> String {
        format!(
            "{} / {} (sheet {})",
            self.store, self.tab, self.config.spreadsheet_id
        )
    }
}

/// Formatted values arrive as strings; anything else is rendered as JSON text.
fn cell_text(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
