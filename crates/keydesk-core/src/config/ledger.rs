//! External key ledger configuration.

use serde::{Deserialize, Serialize};

/// Key ledger configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Ledger provider type: `"sheets"` or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Base URL of the spreadsheet values API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Identifier of the spreadsheet holding the key pools.
    #[serde(default)]
    pub spreadsheet_id: String,
    /// Bearer credential presented to the values API.
    #[serde(default)]
    pub api_token: String,
    /// Request timeout for ledger calls in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// Duration categories and the worksheets backing them.
    ///
    /// Menu order follows this list's order.
    #[serde(default = "default_pools")]
    pub pools: Vec<PoolBinding>,
}

/// Binding of one duration category to one worksheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolBinding {
    /// Category token carried through selection events.
    pub category: String,
    /// Worksheet title in the backing spreadsheet.
    pub worksheet: String,
    /// Human-readable label shown on the duration menu.
    pub label: String,
}

impl LedgerConfig {
    /// Look up the binding for a category token, if one is configured.
    pub fn binding(&self, category: &str) -> Option<&PoolBinding> {
        self.pools.iter().find(|p| p.category == category)
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_base: default_api_base(),
            spreadsheet_id: String::new(),
            api_token: String::new(),
            request_timeout_seconds: default_request_timeout(),
            pools: default_pools(),
        }
    }
}

fn default_provider() -> String {
    "sheets".to_string()
}

fn default_api_base() -> String {
    "https://sheets.googleapis.com/v4/spreadsheets".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_pools() -> Vec<PoolBinding> {
    vec![
        PoolBinding {
            category: "15".to_string(),
            worksheet: "Keys15".to_string(),
            label: "15 months".to_string(),
        },
        PoolBinding {
            category: "36".to_string(),
            worksheet: "Keys36".to_string(),
            label: "36 months".to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pools_cover_both_durations() {
        let config = LedgerConfig::default();
        assert_eq!(config.pools.len(), 2);
        assert!(config.binding("15").is_some());
        assert!(config.binding("36").is_some());
        assert!(config.binding("99").is_none());
    }
}
