//! Scan, re-validate, and claim keys from a ledger pool.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use keydesk_core::config::allocator::AllocatorConfig;
use keydesk_core::error::AppError;
use keydesk_core::result::AppResult;
use keydesk_core::traits::KeyLedger;
use keydesk_core::types::allocation::{AllocationOutcome, IssuedKey};

/// Allocates keys from ledger pools.
///
/// Candidate selection walks rows in ascending index order and re-reads
/// each candidate immediately before claiming it, so a claim committed by
/// a concurrent allocator between the snapshot and the claim is detected
/// and the scan moves on to the next row. The window between the re-read
/// and the claim write remains open: the store offers no conditional
/// write, so two allocators that both pass re-validation for the same row
/// can still collide. With `serialize_allocations` enabled every
/// allocation in this process additionally holds one lock, which closes
/// that window for all intra-process races.
pub struct KeyAllocator {
    /// The ledger backing all pools.
    ledger: Arc<dyn KeyLedger>,
    /// Single-writer lock, when serialization is enabled.
    serialize: Option<Mutex<()>>,
}

impl std::fmt::Debug for KeyAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyAllocator")
            .field("serialize", &self.serialize)
            .finish_non_exhaustive()
    }
}

impl KeyAllocator {
    /// Creates an allocator over the given ledger.
    pub fn new(ledger: Arc<dyn KeyLedger>, config: &AllocatorConfig) -> Self {
        Self {
            ledger,
            serialize: config.serialize_allocations.then(|| Mutex::new(())),
        }
    }

    /// Allocates the first available key in `category`'s pool to `organization`.
    ///
    /// Returns `Exhausted` when no eligible row survives the scan. Ledger
    /// failures propagate as errors and are not retried here.
    pub async fn allocate(
        &self,
        category: &str,
        organization: &str,
    ) -> AppResult<AllocationOutcome> {
        let organization = organization.trim();
        if organization.is_empty() {
            // An empty owner cell is the "unclaimed" sentinel; writing one
            // would corrupt the ledger.
            return Err(AppError::validation("Organization name must not be empty"));
        }

        let _guard = match &self.serialize {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let pool = self.ledger.resolve_pool(category).await?;
        let rows = self.ledger.read_all(&pool).await?;
        if rows.is_empty() {
            info!(category, "Pool has no data rows");
            return Ok(AllocationOutcome::Exhausted);
        }

        for (index, row) in rows.iter().enumerate() {
            if !row.is_candidate() {
                continue;
            }

            // Defend against claims committed since the snapshot.
            let current = self.ledger.read_row(&pool, index).await?;
            if !current.is_candidate() {
                warn!(
                    category,
                    index,
                    "Candidate was claimed concurrently, skipping"
                );
                continue;
            }

            self.ledger.claim(&pool, index, organization).await?;

            let issued = IssuedKey {
                key: current.key.trim().to_string(),
                organization: organization.to_string(),
                category: category.to_string(),
            };
            info!(
                category,
                index,
                organization = %issued.organization,
                "Key allocated"
            );
            return Ok(AllocationOutcome::Granted(issued));
        }

        debug!(category, rows = rows.len(), "No candidate survived the scan");
        Ok(AllocationOutcome::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use keydesk_core::error::ErrorKind;
    use keydesk_core::types::pool::{PoolHandle, PoolRow};
    use keydesk_ledger::MemoryLedger;

    use super::*;

    fn allocator(ledger: Arc<dyn KeyLedger>) -> KeyAllocator {
        KeyAllocator::new(ledger, &AllocatorConfig::default())
    }

    async fn seeded(rows: Vec<PoolRow>) -> Arc<MemoryLedger> {
        let ledger = Arc::new(MemoryLedger::new());
        ledger.insert_pool("15", rows).await;
        ledger
    }

    #[tokio::test]
    async fn test_allocates_first_unclaimed_key() {
        let ledger = seeded(vec![
            PoolRow::new("K1", ""),
            PoolRow::new("K2", "Org1"),
            PoolRow::new("K3", ""),
        ])
        .await;
        let allocator = allocator(ledger.clone());

        let outcome = allocator.allocate("15", "X").await.expect("allocate");
        match outcome {
            AllocationOutcome::Granted(issued) => {
                assert_eq!(issued.key, "K1");
                assert_eq!(issued.organization, "X");
            }
            other => panic!("expected grant, got {other:?}"),
        }

        let rows = ledger.snapshot("15").await.expect("snapshot");
        assert_eq!(rows[0].owner, "X");
        assert_eq!(rows[1].owner, "Org1");
        assert_eq!(rows[2].owner, "");
    }

    #[tokio::test]
    async fn test_fully_claimed_pool_is_exhausted() {
        let ledger = seeded(vec![PoolRow::new("K1", "Org1"), PoolRow::new("K2", "Org2")]).await;
        let allocator = allocator(ledger);

        let outcome = allocator.allocate("15", "X").await.expect("allocate");
        assert_eq!(outcome, AllocationOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_empty_pool_is_exhausted() {
        let ledger = seeded(Vec::new()).await;
        let allocator = allocator(ledger);

        let outcome = allocator.allocate("15", "X").await.expect("allocate");
        assert_eq!(outcome, AllocationOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_rows_without_keys_are_never_allocated() {
        let ledger = seeded(vec![PoolRow::new("", ""), PoolRow::new("K2", "")]).await;
        let allocator = allocator(ledger);

        let outcome = allocator.allocate("15", "X").await.expect("allocate");
        match outcome {
            AllocationOutcome::Granted(issued) => assert_eq!(issued.key, "K2"),
            other => panic!("expected grant, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sequential_allocations_ascend_row_order() {
        let ledger = seeded(vec![
            PoolRow::new("K1", ""),
            PoolRow::new("K2", ""),
            PoolRow::new("K3", ""),
        ])
        .await;
        let allocator = allocator(ledger);

        let mut keys = Vec::new();
        for org in ["A", "B", "C"] {
            match allocator.allocate("15", org).await.expect("allocate") {
                AllocationOutcome::Granted(issued) => keys.push(issued.key),
                other => panic!("expected grant, got {other:?}"),
            }
        }
        assert_eq!(keys, vec!["K1", "K2", "K3"]);

        let outcome = allocator.allocate("15", "D").await.expect("allocate");
        assert_eq!(outcome, AllocationOutcome::Exhausted);
    }

    #[tokio::test]
    async fn test_unknown_category_is_an_error() {
        let ledger = seeded(vec![PoolRow::new("K1", "")]).await;
        let allocator = allocator(ledger);

        let err = allocator.allocate("99", "X").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_empty_organization_is_rejected_before_any_read() {
        let ledger = seeded(vec![PoolRow::new("K1", "")]).await;
        let allocator = allocator(ledger.clone());

        let err = allocator.allocate("15", "   ").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let rows = ledger.snapshot("15").await.expect("snapshot");
        assert_eq!(rows[0].owner, "");
    }

    /// Ledger whose single-row re-reads report rows claimed since the
    /// snapshot, emulating a concurrent allocator landing between the
    /// full read and re-validation.
    #[derive(Debug)]
    struct RacingLedger {
        snapshot_rows: Vec<PoolRow>,
        revalidated_rows: Vec<PoolRow>,
        claims: AtomicUsize,
    }

    #[async_trait]
    impl KeyLedger for RacingLedger {
        async fn resolve_pool(&self, category: &str) -> AppResult<PoolHandle> {
            Ok(PoolHandle::new(category, category))
        }

        async fn read_all(&self, _pool: &PoolHandle) -> AppResult<Vec<PoolRow>> {
            Ok(self.snapshot_rows.clone())
        }

        async fn read_row(&self, _pool: &PoolHandle, index: usize) -> AppResult<PoolRow> {
            Ok(self
                .revalidated_rows
                .get(index)
                .cloned()
                .unwrap_or_else(|| PoolRow::new("", "")))
        }

        async fn claim(&self, _pool: &PoolHandle, _index: usize, _owner: &str) -> AppResult<()> {
            self.claims.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_revalidation_skips_concurrently_claimed_row() {
        // Snapshot shows K1 and K2 free; by re-validation K1 is taken.
        let ledger = Arc::new(RacingLedger {
            snapshot_rows: vec![PoolRow::new("K1", ""), PoolRow::new("K2", "")],
            revalidated_rows: vec![PoolRow::new("K1", "Rival"), PoolRow::new("K2", "")],
            claims: AtomicUsize::new(0),
        });
        let allocator = allocator(ledger.clone());

        match allocator.allocate("15", "X").await.expect("allocate") {
            AllocationOutcome::Granted(issued) => assert_eq!(issued.key, "K2"),
            other => panic!("expected grant, got {other:?}"),
        }
        assert_eq!(ledger.claims.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_exhausted_when_every_candidate_fails_revalidation() {
        let ledger = Arc::new(RacingLedger {
            snapshot_rows: vec![PoolRow::new("K1", ""), PoolRow::new("K2", "")],
            revalidated_rows: vec![PoolRow::new("K1", "Rival"), PoolRow::new("K2", "Rival")],
            claims: AtomicUsize::new(0),
        });
        let allocator = allocator(ledger.clone());

        let outcome = allocator.allocate("15", "X").await.expect("allocate");
        assert_eq!(outcome, AllocationOutcome::Exhausted);
        assert_eq!(ledger.claims.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_concurrent_allocations_never_share_a_key() {
        let ledger = seeded(vec![
            PoolRow::new("K1", ""),
            PoolRow::new("K2", ""),
            PoolRow::new("K3", ""),
            PoolRow::new("K4", ""),
        ])
        .await;
        let allocator = Arc::new(allocator(ledger));

        let mut handles = Vec::new();
        for i in 0..4 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator.allocate("15", &format!("Org{i}")).await
            }));
        }

        let mut keys = Vec::new();
        for handle in handles {
            match handle.await.expect("join").expect("allocate") {
                AllocationOutcome::Granted(issued) => keys.push(issued.key),
                AllocationOutcome::Exhausted => {}
            }
        }

        let mut deduped = keys.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), keys.len(), "duplicate key issued: {keys:?}");
    }
}
