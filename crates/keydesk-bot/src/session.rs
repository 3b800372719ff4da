//! Per-requester conversation sessions.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

use keydesk_core::types::requester::RequesterId;

/// Where a requester currently is in the key-issue conversation.
///
/// The pending duration category lives inside `AwaitingOrganization`, so
/// leaving that state clears it by construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No conversation in progress.
    #[default]
    Idle,
    /// The duration menu was presented; waiting for a category selection.
    AwaitingDuration,
    /// A category was selected; waiting for the organization name.
    AwaitingOrganization {
        /// The selected duration category token.
        category: String,
    },
}

/// One requester's transient conversation state.
///
/// Sessions live only in process memory; a restart resets every
/// conversation, which is acceptable because a conversation is a few
/// messages long and keys are never issued without an explicit final
/// message.
#[derive(Debug, Default)]
pub struct Session {
    /// Current state-machine position.
    pub state: SessionState,
}

impl Session {
    /// Returns the session to `Idle`, discarding any pending selection.
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
    }
}

/// Concurrent map of sessions keyed by requester id.
///
/// Sessions are created lazily on first interaction. Each entry is behind
/// its own `Mutex`: the dispatcher holds it for the whole of one event's
/// processing, so events for the same requester are serialized even if
/// the transport delivers them concurrently. Events for different
/// requesters proceed independently.
#[derive(Debug, Default)]
pub struct SessionStore {
    /// Live sessions by requester.
    sessions: DashMap<RequesterId, Arc<Mutex<Session>>>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for a requester, creating it if absent.
    pub fn entry(&self, requester: RequesterId) -> Arc<Mutex<Session>> {
        self.sessions
            .entry(requester)
            .or_insert_with(|| Arc::new(Mutex::new(Session::default())))
            .clone()
    }

    /// Forces a requester's session back to `Idle`, creating it if absent.
    pub async fn reset(&self, requester: RequesterId) {
        let entry = self.entry(requester);
        let mut session = entry.lock().await;
        session.reset();
    }

    /// Number of sessions currently tracked.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are tracked.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
