//! Core traits defined in `keydesk-core` and implemented by other crates.

pub mod channel;
pub mod ledger;

pub use channel::{Channel, Choice};
pub use ledger::KeyLedger;
