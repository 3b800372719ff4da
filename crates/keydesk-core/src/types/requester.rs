//! Newtype wrapper for the chat-platform requester identifier.
//!
//! Using a distinct type prevents accidentally mixing requester ids with
//! other numeric values such as message ids or row indices. The inner
//! value is the numeric user id assigned by the chat platform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a requester (chat-platform user).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequesterId(pub i64);

impl RequesterId {
    /// Create an identifier from a raw platform user id.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the inner numeric value.
    pub fn into_inner(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RequesterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RequesterId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl From<i64> for RequesterId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<RequesterId> for i64 {
    fn from(id: RequesterId) -> i64 {
        id.0
    }
}
