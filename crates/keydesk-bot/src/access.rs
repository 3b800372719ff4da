//! Requester allow-list guard.

use std::collections::HashSet;

use keydesk_core::config::access::AccessConfig;
use keydesk_core::types::requester::RequesterId;

/// Membership check against the configured requester allow-list.
///
/// Built once at startup from immutable configuration; the check itself
/// is pure and synchronous. Rejection handling (notice + session reset)
/// belongs to the dispatcher, which consults the guard before every
/// event reaches the state machine.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    /// The authorized requester ids.
    allowed: HashSet<RequesterId>,
}

impl AccessGuard {
    /// Builds the guard from configuration.
    pub fn new(config: &AccessConfig) -> Self {
        Self {
            allowed: config
                .allowed_requesters
                .iter()
                .copied()
                .map(RequesterId::new)
                .collect(),
        }
    }

    /// Whether the requester may use the bot.
    pub fn authorize(&self, requester: RequesterId) -> bool {
        self.allowed.contains(&requester)
    }

    /// Number of authorized requesters.
    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    /// Whether the allow-list is empty (nobody can use the bot).
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard(ids: &[i64]) -> AccessGuard {
        AccessGuard::new(&AccessConfig {
            allowed_requesters: ids.to_vec(),
        })
    }

    #[test]
    fn test_listed_requester_is_authorized() {
        let guard = guard(&[100, 200]);
        assert!(guard.authorize(RequesterId::new(100)));
        assert!(guard.authorize(RequesterId::new(200)));
    }

    #[test]
    fn test_unlisted_requester_is_rejected() {
        let guard = guard(&[100]);
        assert!(!guard.authorize(RequesterId::new(101)));
    }

    #[test]
    fn test_empty_allow_list_rejects_everyone() {
        let guard = guard(&[]);
        assert!(guard.is_empty());
        assert!(!guard.authorize(RequesterId::new(0)));
    }
}
