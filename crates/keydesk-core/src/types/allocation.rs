//! Allocation results returned by the key allocator.

use serde::{Deserialize, Serialize};

/// A key successfully issued to an organization.
///
/// This value is ephemeral: it is rendered back to the requester and
/// discarded, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedKey {
    /// The allocated license key.
    pub key: String,
    /// The organization the key was issued to.
    pub organization: String,
    /// The duration category the key came from.
    pub category: String,
}

/// Outcome of an allocation attempt.
///
/// Ledger connectivity failures are *not* outcomes; they propagate as
/// [`crate::AppError`] with kind `Ledger`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationOutcome {
    /// A key was claimed and issued.
    Granted(IssuedKey),
    /// No eligible row survived the scan; the pool is exhausted.
    Exhausted,
}
