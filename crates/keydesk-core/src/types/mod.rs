//! Domain types shared across KeyDesk crates.

pub mod allocation;
pub mod pool;
pub mod requester;

pub use allocation::{AllocationOutcome, IssuedKey};
pub use pool::{PoolHandle, PoolRow};
pub use requester::RequesterId;
