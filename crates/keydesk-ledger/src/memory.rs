//! In-memory key ledger using a Tokio lock for single-process use.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use keydesk_core::error::AppError;
use keydesk_core::result::AppResult;
use keydesk_core::traits::KeyLedger;
use keydesk_core::types::pool::{PoolHandle, PoolRow};

/// In-memory key ledger keyed by duration category.
///
/// Suitable for tests and local development. The claim operation is the
/// same blind owner write as the remote store performs, so allocator
/// behavior over this ledger matches production semantics.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    /// Pools by category, rows in allocation-priority order.
    pools: RwLock<HashMap<String, Vec<PoolRow>>>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates empty pools for the given categories.
    pub fn with_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut pools = HashMap::new();
        for category in categories {
            pools.insert(category.into(), Vec::new());
        }
        Self {
            pools: RwLock::new(pools),
        }
    }

    /// Inserts or replaces the pool backing a category.
    pub async fn insert_pool(&self, category: impl Into<String>, rows: Vec<PoolRow>) {
        let mut pools = self.pools.write().await;
        pools.insert(category.into(), rows);
    }

    /// Returns a copy of the rows backing a category, for assertions.
    pub async fn snapshot(&self, category: &str) -> Option<Vec<PoolRow>> {
        let pools = self.pools.read().await;
        pools.get(category).cloned()
    }
}

#[async_trait]
impl KeyLedger for MemoryLedger {
    async fn resolve_pool(&self, category: &str) -> AppResult<PoolHandle> {
        let pools = self.pools.read().await;
        if pools.contains_key(category) {
            Ok(PoolHandle::new(category, category))
        } else {
            Err(AppError::not_found(format!(
                "No pool bound to category '{category}'"
            )))
        }
    }

    async fn read_all(&self, pool: &PoolHandle) -> AppResult<Vec<PoolRow>> {
        let pools = self.pools.read().await;
        let rows = pools
            .get(&pool.category)
            .ok_or_else(|| AppError::ledger(format!("Pool '{}' disappeared", pool.category)))?;
        debug!(category = %pool.category, rows = rows.len(), "Read pool snapshot");
        Ok(rows.clone())
    }

    async fn read_row(&self, pool: &PoolHandle, index: usize) -> AppResult<PoolRow> {
        let pools = self.pools.read().await;
        let rows = pools
            .get(&pool.category)
            .ok_or_else(|| AppError::ledger(format!("Pool '{}' disappeared", pool.category)))?;
        // Reading past the data mirrors the remote store: an empty row.
        Ok(rows
            .get(index)
            .cloned()
            .unwrap_or_else(|| PoolRow::new("", "")))
    }

    async fn claim(&self, pool: &PoolHandle, index: usize, owner: &str) -> AppResult<()> {
        let mut pools = self.pools.write().await;
        let rows = pools
            .get_mut(&pool.category)
            .ok_or_else(|| AppError::ledger(format!("Pool '{}' disappeared", pool.category)))?;
        let row = rows.get_mut(index).ok_or_else(|| {
            AppError::ledger(format!(
                "Claim index {index} out of range for pool '{}'",
                pool.category
            ))
        })?;
        row.owner = owner.to_string();
        info!(category = %pool.category, index, owner = %owner, "Owner written to pool row");
        Ok(())
    }
}
