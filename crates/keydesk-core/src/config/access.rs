//! Requester allow-list configuration.

use serde::{Deserialize, Serialize};

/// Access control configuration.
///
/// The allow-list is loaded once at startup and treated as immutable for
/// the lifetime of the process.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AccessConfig {
    /// Numeric requester ids permitted to use the bot.
    ///
    /// An empty list means nobody is authorized; there is deliberately no
    /// "allow everyone" mode.
    #[serde(default)]
    pub allowed_requesters: Vec<i64>,
}
