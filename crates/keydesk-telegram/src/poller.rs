//! Long-poll update loop feeding the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use keydesk_bot::{Dispatcher, Event};
use keydesk_core::types::requester::RequesterId;

use crate::api::Update;
use crate::client::TelegramClient;

/// Pause after a failed poll so a broken network does not spin the loop.
const ERROR_BACKOFF: Duration = Duration::from_secs(5);

/// Polls the Bot API for updates and hands each one to the dispatcher.
pub struct UpdatePoller {
    /// The Bot API client.
    client: Arc<TelegramClient>,
    /// The event dispatcher.
    dispatcher: Arc<Dispatcher>,
}

impl UpdatePoller {
    /// Creates a poller.
    pub fn new(client: Arc<TelegramClient>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { client, dispatcher }
    }

    /// Runs the poll loop until the token is cancelled.
    pub async fn run(&self, cancel: watch::Receiver<bool>) {
        info!("Update poller started");

        let mut cancel = cancel;
        let mut offset = 0i64;

        loop {
            tokio::select! {
                result = self.client.get_updates(offset) => {
                    match result {
                        Ok(updates) => {
                            for update in updates {
                                offset = offset.max(update.update_id + 1);
                                self.process(update).await;
                            }
                        }
                        Err(e) => {
                            error!("Polling for updates failed: {}", e);
                            tokio::time::sleep(ERROR_BACKOFF).await;
                        }
                    }
                }
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        info!("Update poller shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Handles one update. A failure here is logged and confined to the
    /// requester it belongs to; the loop keeps serving everyone else.
    async fn process(&self, update: Update) {
        if let Some(query) = update.callback_query {
            if let Err(e) = self.client.answer_callback(&query.id).await {
                warn!(query_id = %query.id, "Failed to answer callback query: {}", e);
            }
            let Some(data) = query.data else {
                return;
            };
            self.dispatch(RequesterId::new(query.from.id), Event::Selection(data))
                .await;
            return;
        }

        if let Some(message) = update.message {
            let Some(text) = message.text else {
                return;
            };
            let requester =
                RequesterId::new(message.from.map(|u| u.id).unwrap_or(message.chat.id));
            self.dispatch(requester, parse_text(&text)).await;
        }
    }

    async fn dispatch(&self, requester: RequesterId, event: Event) {
        if let Err(e) = self.dispatcher.dispatch(requester, event).await {
            error!(requester = %requester, "Failed to handle event: {}", e);
        }
    }
}

/// Maps message text to an event; `/start` and `/cancel` are always
/// available regardless of conversation state.
fn parse_text(text: &str) -> Event {
    let trimmed = text.trim();
    let command = trimmed
        .split_whitespace()
        .next()
        .map(|token| token.split('@').next().unwrap_or(token));

    match command {
        Some("/start") => Event::Start,
        Some("/cancel") => Event::Cancel,
        _ => Event::Text(trimmed.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_cancel_commands_parse() {
        assert_eq!(parse_text("/start"), Event::Start);
        assert_eq!(parse_text("  /cancel  "), Event::Cancel);
    }

    #[test]
    fn test_commands_with_bot_mention_parse() {
        assert_eq!(parse_text("/start@keydesk_bot"), Event::Start);
        assert_eq!(parse_text("/cancel@keydesk_bot"), Event::Cancel);
    }

    #[test]
    fn test_other_text_is_free_text() {
        assert_eq!(parse_text(" Acme Corp "), Event::Text("Acme Corp".to_string()));
        assert_eq!(
            parse_text("/unknown"),
            Event::Text("/unknown".to_string())
        );
    }
}
