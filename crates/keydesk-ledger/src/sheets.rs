//! Spreadsheet values-API key ledger.
//!
//! Talks to a Google-Sheets-style values endpoint over HTTP. Each duration
//! category is bound to one worksheet; column A holds keys, column B holds
//! owners, and the first row is a header. This adapter owns the
//! translation between 0-based data indices and the store's 1-based,
//! header-offset row numbers.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use keydesk_core::config::ledger::{LedgerConfig, PoolBinding};
use keydesk_core::error::AppError;
use keydesk_core::result::AppResult;
use keydesk_core::traits::KeyLedger;
use keydesk_core::types::pool::{PoolHandle, PoolRow};

/// Store row number of the first data row (row 1 is the header).
const FIRST_DATA_ROW: usize = 2;

/// Key ledger backed by a spreadsheet values API.
#[derive(Debug)]
pub struct SheetsLedger {
    /// HTTP client with the configured request timeout.
    http: reqwest::Client,
    /// Values API base URL.
    api_base: String,
    /// Spreadsheet identifier.
    spreadsheet_id: String,
    /// Bearer credential.
    api_token: String,
    /// Category to worksheet bindings, in menu order.
    pools: Vec<PoolBinding>,
}

/// Wire shape of a values-API range read.
#[derive(Debug, Default, Deserialize)]
struct ValueRange {
    /// Row-major cell values; trailing empty cells are elided by the store.
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Wire shape of a values-API cell update.
#[derive(Debug, Serialize)]
struct ValueUpdate {
    range: String,
    #[serde(rename = "majorDimension")]
    major_dimension: String,
    values: Vec<Vec<String>>,
}

impl SheetsLedger {
    /// Creates a ledger from configuration.
    pub fn new(config: &LedgerConfig) -> AppResult<Self> {
        if config.spreadsheet_id.trim().is_empty() {
            return Err(AppError::configuration(
                "ledger.spreadsheet_id must be set for the sheets provider",
            ));
        }
        if config.api_token.trim().is_empty() {
            return Err(AppError::configuration(
                "ledger.api_token must be set for the sheets provider",
            ));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::ledger(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            api_token: config.api_token.clone(),
            pools: config.pools.clone(),
        })
    }

    /// URL for a values range within this spreadsheet.
    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            self.api_base, self.spreadsheet_id, range
        )
    }

    async fn get_range(&self, range: &str) -> AppResult<ValueRange> {
        let url = self.values_url(range);
        debug!(range = %range, "Reading ledger range");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| AppError::with_source(
                keydesk_core::error::ErrorKind::Ledger,
                format!("Ledger read failed for range '{range}': {e}"),
                e,
            ))?;

        if !response.status().is_success() {
            return Err(AppError::ledger(format!(
                "Ledger read for range '{range}' returned HTTP {}",
                response.status()
            )));
        }

        response.json::<ValueRange>().await.map_err(|e| {
            AppError::with_source(
                keydesk_core::error::ErrorKind::Ledger,
                format!("Ledger response for range '{range}' was malformed: {e}"),
                e,
            )
        })
    }

    /// Converts one values row into a [`PoolRow`], padding elided cells.
    fn to_pool_row(cells: &[String]) -> PoolRow {
        PoolRow::new(
            cells.first().cloned().unwrap_or_default(),
            cells.get(1).cloned().unwrap_or_default(),
        )
    }
}

/// Store row number for a 0-based data index.
fn store_row(index: usize) -> usize {
    index + FIRST_DATA_ROW
}

/// Range covering all data rows of a worksheet (key and owner columns).
fn data_range(worksheet: &str) -> String {
    format!("{worksheet}!A{FIRST_DATA_ROW}:B")
}

/// Range covering a single data row.
fn row_range(worksheet: &str, index: usize) -> String {
    let row = store_row(index);
    format!("{worksheet}!A{row}:B{row}")
}

/// Range addressing a single owner cell.
fn owner_cell(worksheet: &str, index: usize) -> String {
    let row = store_row(index);
    format!("{worksheet}!B{row}")
}

#[async_trait]
impl KeyLedger for SheetsLedger {
    async fn resolve_pool(&self, category: &str) -> AppResult<PoolHandle> {
        match self.pools.iter().find(|p| p.category == category) {
            Some(binding) => Ok(PoolHandle::new(category, binding.worksheet.clone())),
            None => Err(AppError::not_found(format!(
                "No pool bound to category '{category}'"
            ))),
        }
    }

    async fn read_all(&self, pool: &PoolHandle) -> AppResult<Vec<PoolRow>> {
        let range = self.get_range(&data_range(&pool.worksheet)).await?;
        let rows: Vec<PoolRow> = range.values.iter().map(|r| Self::to_pool_row(r)).collect();
        debug!(category = %pool.category, rows = rows.len(), "Read pool snapshot");
        Ok(rows)
    }

    async fn read_row(&self, pool: &PoolHandle, index: usize) -> AppResult<PoolRow> {
        let range = self.get_range(&row_range(&pool.worksheet, index)).await?;
        // An empty response means the row has no values at all.
        Ok(range
            .values
            .first()
            .map(|r| Self::to_pool_row(r))
            .unwrap_or_else(|| PoolRow::new("", "")))
    }

    async fn claim(&self, pool: &PoolHandle, index: usize, owner: &str) -> AppResult<()> {
        let cell = owner_cell(&pool.worksheet, index);
        let url = format!("{}?valueInputOption=RAW", self.values_url(&cell));
        let body = ValueUpdate {
            range: cell.clone(),
            major_dimension: "ROWS".to_string(),
            values: vec![vec![owner.to_string()]],
        };

        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::with_source(
                keydesk_core::error::ErrorKind::Ledger,
                format!("Ledger claim failed for cell '{cell}': {e}"),
                e,
            ))?;

        if !response.status().is_success() {
            return Err(AppError::ledger(format!(
                "Ledger claim for cell '{cell}' returned HTTP {}",
                response.status()
            )));
        }

        info!(category = %pool.category, index, owner = %owner, "Owner written to pool row");
        Ok(())
    }
}
