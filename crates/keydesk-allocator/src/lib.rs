//! # keydesk-allocator
//!
//! The key allocation engine: scans a pool for the first eligible row,
//! re-validates it against a fresh read, and claims it for an owner.

pub mod allocator;

pub use allocator::KeyAllocator;
