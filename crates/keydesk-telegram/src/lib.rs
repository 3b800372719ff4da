//! # keydesk-telegram
//!
//! Telegram Bot API transport for KeyDesk: wire types, an HTTP client,
//! the outbound [`Channel`](keydesk_core::traits::Channel) implementation,
//! and the long-poll update loop that feeds the dispatcher.

pub mod api;
pub mod channel;
pub mod client;
pub mod poller;

pub use client::TelegramClient;
pub use poller::UpdatePoller;
