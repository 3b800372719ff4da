//! Shared test helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;

use keydesk_allocator::KeyAllocator;
use keydesk_bot::{AccessGuard, Dispatcher, Event};
use keydesk_core::config::access::AccessConfig;
use keydesk_core::config::allocator::AllocatorConfig;
use keydesk_core::config::ledger::PoolBinding;
use keydesk_core::error::AppError;
use keydesk_core::result::AppResult;
use keydesk_core::traits::{Channel, Choice, KeyLedger};
use keydesk_core::types::pool::{PoolHandle, PoolRow};
use keydesk_core::types::requester::RequesterId;
use keydesk_ledger::MemoryLedger;

/// Channel that records every outbound message for assertions.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(RequesterId, String, Vec<Choice>)>>,
}

impl RecordingChannel {
    /// All texts sent to a requester, in order.
    pub fn texts_for(&self, requester: RequesterId) -> Vec<String> {
        self.sent
            .lock()
            .expect("lock")
            .iter()
            .filter(|(r, _, _)| *r == requester)
            .map(|(_, text, _)| text.clone())
            .collect()
    }

    /// Whether any message to the requester contains the fragment.
    pub fn saw(&self, requester: RequesterId, fragment: &str) -> bool {
        self.texts_for(requester).iter().any(|t| t.contains(fragment))
    }
}

#[async_trait]
impl Channel for RecordingChannel {
    async fn send_text(&self, requester: RequesterId, text: &str) -> AppResult<()> {
        self.sent
            .lock()
            .expect("lock")
            .push((requester, text.to_string(), Vec::new()));
        Ok(())
    }

    async fn send_choices(
        &self,
        requester: RequesterId,
        text: &str,
        choices: &[Choice],
    ) -> AppResult<()> {
        self.sent
            .lock()
            .expect("lock")
            .push((requester, text.to_string(), choices.to_vec()));
        Ok(())
    }
}

/// Ledger whose every read and claim fails, for adapter-failure paths.
#[derive(Debug)]
pub struct FailingLedger;

#[async_trait]
impl KeyLedger for FailingLedger {
    async fn resolve_pool(&self, category: &str) -> AppResult<PoolHandle> {
        Ok(PoolHandle::new(category, category))
    }

    async fn read_all(&self, _pool: &PoolHandle) -> AppResult<Vec<PoolRow>> {
        Err(AppError::ledger("store unreachable"))
    }

    async fn read_row(&self, _pool: &PoolHandle, _index: usize) -> AppResult<PoolRow> {
        Err(AppError::ledger("store unreachable"))
    }

    async fn claim(&self, _pool: &PoolHandle, _index: usize, _owner: &str) -> AppResult<()> {
        Err(AppError::ledger("store unreachable"))
    }
}

/// The standard two pool bindings used across tests.
pub fn bindings() -> Vec<PoolBinding> {
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

/// Wires a dispatcher over the given ledger and a fresh recording channel.
pub fn build_bot(
    allowed: &[i64],
    ledger: Arc<dyn KeyLedger>,
) -> (Arc<Dispatcher>, Arc<RecordingChannel>) {
    let channel = Arc::new(RecordingChannel::default());
    let allocator = Arc::new(KeyAllocator::new(ledger, &AllocatorConfig::default()));
    let guard = AccessGuard::new(&AccessConfig {
        allowed_requesters: allowed.to_vec(),
    });
    let dispatcher = Arc::new(Dispatcher::new(
        guard,
        allocator,
        channel.clone(),
        bindings(),
    ));
    (dispatcher, channel)
}

/// Fully wired bot over an in-memory ledger and a recording channel.
pub struct TestBot {
    pub dispatcher: Arc<Dispatcher>,
    pub channel: Arc<RecordingChannel>,
    pub ledger: Arc<MemoryLedger>,
}

impl TestBot {
    /// Creates a bot whose allow-list contains the given requester ids.
    ///
    /// The "15" pool is seeded with three keys, the "36" pool with one.
    pub async fn new(allowed: &[i64]) -> Self {
        let ledger = Arc::new(MemoryLedger::new());
        ledger
            .insert_pool(
                "15",
                vec![
                    PoolRow::new("KEY-15-A", ""),
                    PoolRow::new("KEY-15-B", ""),
                    PoolRow::new("KEY-15-C", ""),
                ],
            )
            .await;
        ledger
            .insert_pool("36", vec![PoolRow::new("KEY-36-A", "")])
            .await;

        let (dispatcher, channel) = build_bot(allowed, ledger.clone());
        Self {
            dispatcher,
            channel,
            ledger,
        }
    }

    /// Walks a requester through the whole flow up to the organization
    /// message, leaving the allocation result in the channel log.
    pub async fn request_key(&self, requester: RequesterId, category: &str, organization: &str) {
        self.dispatcher
            .dispatch(requester, Event::Selection("get_key".to_string()))
            .await
            .expect("get key");
        self.dispatcher
            .dispatch(requester, Event::Selection(category.to_string()))
            .await
            .expect("duration");
        self.dispatcher
            .dispatch(requester, Event::Text(organization.to_string()))
            .await
            .expect("organization");
    }
}
