//! Key ledger trait abstracting the external tabular store.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::pool::{PoolHandle, PoolRow};

/// Trait for the external key ledger (one worksheet per duration category).
///
/// Implementations own every storage-addressing detail, including the
/// translation from 0-based data indices to whatever row numbering the
/// backing store uses (the spreadsheet backend adds a header row and
/// counts from 1). Callers only ever see 0-based indices into the slice
/// returned by [`read_all`](KeyLedger::read_all).
///
/// The store offers no compare-and-set: [`claim`](KeyLedger::claim) is a
/// blind owner write. Callers that need stronger guarantees must layer
/// them on top (see `keydesk-allocator`).
#[async_trait]
pub trait KeyLedger: Send + Sync + 'static {
    /// Resolve a duration category to its pool.
    ///
    /// Returns a not-found error when no pool is bound to the category.
    async fn resolve_pool(&self, category: &str) -> AppResult<PoolHandle>;

    /// Read the full pool in allocation-priority order (lowest index first).
    async fn read_all(&self, pool: &PoolHandle) -> AppResult<Vec<PoolRow>>;

    /// Re-read a single row by its 0-based data index.
    async fn read_row(&self, pool: &PoolHandle, index: usize) -> AppResult<PoolRow>;

    /// Write `owner` into the row's owner cell.
    ///
    /// Best effort: the write is not conditional on the cell still being
    /// empty, because the backing store cannot express that condition.
    async fn claim(&self, pool: &PoolHandle, index: usize, owner: &str) -> AppResult<()>;
}
