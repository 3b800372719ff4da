//! Outbound conversation channel trait.

use async_trait::async_trait;

use crate::result::AppResult;
use crate::types::requester::RequesterId;

/// One selectable option presented to a requester.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Choice {
    /// Text shown on the button.
    pub label: String,
    /// Opaque token delivered back as a selection event.
    pub token: String,
}

impl Choice {
    /// Create a choice from a label and its selection token.
    pub fn new(label: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            token: token.into(),
        }
    }
}

/// Trait for the outbound half of the chat transport.
///
/// The inbound half (update delivery, command parsing) lives entirely in
/// the transport crate, which translates platform updates into dispatcher
/// events; the core only ever needs to send.
#[async_trait]
pub trait Channel: Send + Sync + 'static {
    /// Send a plain text message to a requester.
    async fn send_text(&self, requester: RequesterId, text: &str) -> AppResult<()>;

    /// Send a prompt with an ordered set of selectable choices.
    async fn send_choices(
        &self,
        requester: RequesterId,
        text: &str,
        choices: &[Choice],
    ) -> AppResult<()>;
}
