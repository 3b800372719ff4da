//! Allocation engine configuration.

use serde::{Deserialize, Serialize};

/// Allocator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocatorConfig {
    /// Funnel every allocation through a single in-process lock.
    ///
    /// Sound for a single-process deployment; the re-validation pass
    /// remains active underneath for deployments that disable it.
    #[serde(default = "default_serialize")]
    pub serialize_allocations: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            serialize_allocations: default_serialize(),
        }
    }
}

fn default_serialize() -> bool {
    true
}
