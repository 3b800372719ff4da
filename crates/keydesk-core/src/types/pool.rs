//! Key pool rows and resolved pool handles.

use serde::{Deserialize, Serialize};

/// One row of a key pool.
///
/// A row is *eligible* for allocation only when `key` is non-empty and
/// `owner` is empty. An empty `key` marks a reserved or unused slot; a
/// non-empty `owner` marks a permanently allocated key. Owners are never
/// cleared by this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRow {
    /// The opaque license key token. Immutable once the pool is provisioned.
    pub key: String,
    /// The organization the key was issued to. Empty means unclaimed.
    #[serde(default)]
    pub owner: String,
}

impl PoolRow {
    /// Create a row from raw key and owner cells.
    pub fn new(key: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            owner: owner.into(),
        }
    }

    /// Whether this row can still be allocated.
    pub fn is_candidate(&self) -> bool {
        !self.key.trim().is_empty() && self.owner.trim().is_empty()
    }
}

/// A resolved pool identity, produced by `KeyLedger::resolve_pool`.
///
/// The handle carries everything a ledger implementation needs to address
/// the pool's backing storage, so reads and claims never re-resolve the
/// category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolHandle {
    /// The duration category this pool serves (configuration token).
    pub category: String,
    /// The backing worksheet title in the external store.
    pub worksheet: String,
}

impl PoolHandle {
    /// Create a handle for a category backed by the given worksheet.
    pub fn new(category: impl Into<String>, worksheet: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            worksheet: worksheet.into(),
        }
    }
}
