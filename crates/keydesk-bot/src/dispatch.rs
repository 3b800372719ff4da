//! Event dispatch: guard, state transitions, allocation, rendering.

use std::sync::Arc;

use tracing::{error, info, warn};

use keydesk_allocator::KeyAllocator;
use keydesk_core::config::ledger::PoolBinding;
use keydesk_core::result::AppResult;
use keydesk_core::traits::Channel;
use keydesk_core::types::allocation::AllocationOutcome;
use keydesk_core::types::requester::RequesterId;

use crate::access::AccessGuard;
use crate::event::Event;
use crate::prompts;
use crate::session::{Session, SessionState, SessionStore};

/// Routes inbound events through the guard and the session state machine,
/// invoking the allocator at the terminal transition.
///
/// Every failure path lands the session back on `Idle`: a requester is
/// never left stuck in an intermediate state, and one requester's failure
/// never affects another's session.
pub struct Dispatcher {
    /// Requester allow-list.
    guard: AccessGuard,
    /// Per-requester sessions.
    store: SessionStore,
    /// The allocation engine.
    allocator: Arc<KeyAllocator>,
    /// Outbound message channel.
    channel: Arc<dyn Channel>,
    /// Duration categories, in menu order.
    pools: Vec<PoolBinding>,
}

impl Dispatcher {
    /// Creates a dispatcher.
    pub fn new(
        guard: AccessGuard,
        allocator: Arc<KeyAllocator>,
        channel: Arc<dyn Channel>,
        pools: Vec<PoolBinding>,
    ) -> Self {
        Self {
            guard,
            store: SessionStore::new(),
            allocator,
            channel,
            pools,
        }
    }

    /// Processes one inbound event for one requester.
    ///
    /// Holds the requester's session lock for the whole call, so events
    /// for the same requester are handled strictly in order.
    pub async fn dispatch(&self, requester: RequesterId, event: Event) -> AppResult<()> {
        if !self.guard.authorize(requester) {
            warn!(requester = %requester, "Rejected unauthorized requester");
            self.store.reset(requester).await;
            return self
                .channel
                .send_text(requester, prompts::UNAUTHORIZED)
                .await;
        }

        let entry = self.store.entry(requester);
        let mut session = entry.lock().await;

        let result = self.handle(requester, &mut session, event).await;
        if result.is_err() {
            session.reset();
        }
        result
    }

    async fn handle(
        &self,
        requester: RequesterId,
        session: &mut Session,
        event: Event,
    ) -> AppResult<()> {
        match event {
            Event::Start => {
                session.reset();
                self.send_main_menu(requester).await
            }
            Event::Cancel => self.cancel(requester, session).await,
            Event::Selection(token) => self.on_selection(requester, session, &token).await,
            Event::Text(text) => self.on_text(requester, session, &text).await,
        }
    }

    async fn on_selection(
        &self,
        requester: RequesterId,
        session: &mut Session,
        token: &str,
    ) -> AppResult<()> {
        // The get-key and cancel tokens restart or end the flow from any
        // state; the machine overwrites, it never stacks.
        if token == prompts::GET_KEY_TOKEN {
            session.state = SessionState::AwaitingDuration;
            return self
                .channel
                .send_choices(
                    requester,
                    prompts::CHOOSE_DURATION,
                    &prompts::duration_menu(&self.pools),
                )
                .await;
        }
        if token == prompts::CANCEL_TOKEN {
            return self.cancel(requester, session).await;
        }

        if session.state != SessionState::AwaitingDuration {
            return self.invalid(requester, session).await;
        }

        match self.pools.iter().find(|p| p.category == token) {
            Some(binding) => {
                session.state = SessionState::AwaitingOrganization {
                    category: binding.category.clone(),
                };
                self.channel
                    .send_text(requester, &prompts::ask_organization(&binding.label))
                    .await
            }
            None => self.invalid(requester, session).await,
        }
    }

    async fn on_text(
        &self,
        requester: RequesterId,
        session: &mut Session,
        text: &str,
    ) -> AppResult<()> {
        let SessionState::AwaitingOrganization { category } = session.state.clone() else {
            return self.invalid(requester, session).await;
        };

        let organization = text.trim();
        if organization.is_empty() {
            return self.invalid(requester, session).await;
        }

        let reply = match self.allocator.allocate(&category, organization).await {
            Ok(AllocationOutcome::Granted(issued)) => {
                info!(
                    requester = %requester,
                    category = %issued.category,
                    organization = %issued.organization,
                    "Key issued"
                );
                prompts::issued(&issued)
            }
            Ok(AllocationOutcome::Exhausted) => {
                info!(requester = %requester, category = %category, "Pool exhausted");
                prompts::EXHAUSTED.to_string()
            }
            Err(e) => {
                error!(
                    requester = %requester,
                    category = %category,
                    error = %e,
                    "Allocation failed"
                );
                prompts::GENERIC_ERROR.to_string()
            }
        };

        session.reset();
        self.channel.send_text(requester, &reply).await?;
        self.send_main_menu(requester).await
    }

    async fn cancel(&self, requester: RequesterId, session: &mut Session) -> AppResult<()> {
        session.reset();
        self.channel.send_text(requester, prompts::CANCELLED).await?;
        self.send_main_menu(requester).await
    }

    async fn invalid(&self, requester: RequesterId, session: &mut Session) -> AppResult<()> {
        session.reset();
        self.channel
            .send_text(requester, prompts::INVALID_SELECTION)
            .await?;
        self.send_main_menu(requester).await
    }

    async fn send_main_menu(&self, requester: RequesterId) -> AppResult<()> {
        self.channel
            .send_choices(requester, prompts::WELCOME, &prompts::main_menu())
            .await
    }

    /// The session state a requester is currently in (for tests and
    /// operator diagnostics).
    pub async fn session_state(&self, requester: RequesterId) -> SessionState {
        let entry = self.store.entry(requester);
        let session = entry.lock().await;
        session.state.clone()
    }
}
