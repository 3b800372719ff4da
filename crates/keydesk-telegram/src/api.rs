//! Wire types for the subset of the Telegram Bot API this bot uses.

use serde::{Deserialize, Serialize};

/// Envelope wrapping every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded.
    pub ok: bool,
    /// The payload, present when `ok` is true.
    pub result: Option<T>,
    /// Error description, present when `ok` is false.
    pub description: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    /// Monotonic update identifier; the poll offset is derived from it.
    pub update_id: i64,
    /// A new incoming message, if this update carries one.
    #[serde(default)]
    pub message: Option<Message>,
    /// An inline-keyboard button press, if this update carries one.
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// An incoming chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    /// Message identifier within the chat.
    pub message_id: i64,
    /// The sender. Absent for channel posts.
    #[serde(default)]
    pub from: Option<User>,
    /// The chat the message belongs to.
    pub chat: Chat,
    /// Text content, if any.
    #[serde(default)]
    pub text: Option<String>,
}

/// A Telegram user.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// Numeric user id.
    pub id: i64,
}

/// A chat (private, group, or channel).
#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    /// Numeric chat id. Equals the user id for private chats.
    pub id: i64,
}

/// An inline-keyboard button press.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    /// Query identifier, used to acknowledge the press.
    pub id: String,
    /// The user who pressed the button.
    pub from: User,
    /// The button's callback payload.
    #[serde(default)]
    pub data: Option<String>,
}

/// Inline keyboard attached to an outgoing message.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    /// Button rows.
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

/// One inline-keyboard button.
#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    /// Button caption.
    pub text: String,
    /// Payload delivered back in the callback query.
    pub callback_data: String,
}
