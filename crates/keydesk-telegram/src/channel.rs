//! Outbound channel implementation over the Bot API client.

use async_trait::async_trait;

use keydesk_core::result::AppResult;
use keydesk_core::traits::{Channel, Choice};
use keydesk_core::types::requester::RequesterId;

use crate::api::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::client::TelegramClient;

/// Renders choices as an inline keyboard, one button per row.
fn keyboard(choices: &[Choice]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: choices
            .iter()
            .map(|c| {
                vec![InlineKeyboardButton {
                    text: c.label.clone(),
                    callback_data: c.token.clone(),
                }]
            })
            .collect(),
    }
}

#[async_trait]
impl Channel for TelegramClient {
    async fn send_text(&self, requester: RequesterId, text: &str) -> AppResult<()> {
        self.send_message(requester.into_inner(), text, None).await
    }

    async fn send_choices(
        &self,
        requester: RequesterId,
        text: &str,
        choices: &[Choice],
    ) -> AppResult<()> {
        self.send_message(requester.into_inner(), text, Some(&keyboard(choices)))
            .await
    }
}
