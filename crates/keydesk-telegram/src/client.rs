//! HTTP client for the Telegram Bot API.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use keydesk_core::config::telegram::TelegramConfig;
use keydesk_core::error::{AppError, ErrorKind};
use keydesk_core::result::AppResult;

use crate::api::{ApiResponse, InlineKeyboardMarkup, Update};

/// Extra headroom over the long-poll timeout before the HTTP client
/// gives up on a request.
const HTTP_TIMEOUT_HEADROOM: Duration = Duration::from_secs(10);

/// Thin client over the Bot API methods this bot calls.
#[derive(Debug)]
pub struct TelegramClient {
    /// HTTP client with a timeout sized for long polls.
    http: reqwest::Client,
    /// `{api_base}/bot{token}` prefix shared by every method URL.
    base_url: String,
    /// Long-poll timeout in seconds, passed to `getUpdates`.
    poll_timeout_seconds: u64,
}

#[derive(Debug, Serialize)]
struct GetUpdatesParams {
    offset: i64,
    timeout: u64,
}

#[derive(Debug, Serialize)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<&'a InlineKeyboardMarkup>,
}

#[derive(Debug, Serialize)]
struct AnswerCallbackParams<'a> {
    callback_query_id: &'a str,
}

impl TelegramClient {
    /// Creates a client from configuration.
    pub fn new(config: &TelegramConfig) -> AppResult<Self> {
        if config.token.trim().is_empty() {
            return Err(AppError::configuration("telegram.token must be set"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_seconds) + HTTP_TIMEOUT_HEADROOM)
            .build()
            .map_err(|e| AppError::transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!(
                "{}/bot{}",
                config.api_base.trim_end_matches('/'),
                config.token
            ),
            poll_timeout_seconds: config.poll_timeout_seconds,
        })
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(&self, offset: i64) -> AppResult<Vec<Update>> {
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &GetUpdatesParams {
                    offset,
                    timeout: self.poll_timeout_seconds,
                },
            )
            .await?;
        if !updates.is_empty() {
            debug!(count = updates.len(), "Received updates");
        }
        Ok(updates)
    }

    /// Sends a text message, optionally with an inline keyboard.
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> AppResult<()> {
        let _: serde_json::Value = self
            .call(
                "sendMessage",
                &SendMessageParams {
                    chat_id,
                    text,
                    reply_markup,
                },
            )
            .await?;
        Ok(())
    }

    /// Acknowledges a callback query so the client stops its spinner.
    pub async fn answer_callback(&self, callback_query_id: &str) -> AppResult<()> {
        let _: serde_json::Value = self
            .call("answerCallbackQuery", &AnswerCallbackParams { callback_query_id })
            .await?;
        Ok(())
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: &P,
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .json(params)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Transport,
                    format!("Bot API call '{method}' failed: {e}"),
                    e,
                )
            })?;

        let envelope: ApiResponse<T> = response.json().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Transport,
                format!("Bot API response for '{method}' was malformed: {e}"),
                e,
            )
        })?;

        if !envelope.ok {
            return Err(AppError::transport(format!(
                "Bot API call '{method}' was rejected: {}",
                envelope.description.as_deref().unwrap_or("no description")
            )));
        }

        envelope.result.ok_or_else(|| {
            AppError::transport(format!("Bot API call '{method}' returned no result"))
        })
    }
}
