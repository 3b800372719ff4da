//! # keydesk-ledger
//!
//! Implementations of the [`KeyLedger`](keydesk_core::traits::KeyLedger)
//! boundary: a spreadsheet values-API adapter for production and an
//! in-memory adapter for tests and local development.

pub mod memory;
pub mod sheets;

pub use memory::MemoryLedger;
pub use sheets::SheetsLedger;
