//! Short-lived response caching for gateway reads.
//!
//! This module provides:
//! - A canonical key derivation (operation name + sorted-key JSON of variables)
//! - An in-memory cache with a fixed TTL, prefix invalidation and full clear
//! - The read-through composition used by every hook and analytics query
//!
//! Nothing is persisted; the cache lives as long as the process.

mod key;
mod layer;
mod store;
mod traits;

pub use layer::CacheLayer;
pub use store::{ResponseCache, DEFAULT_TTL_SECS};
pub use traits::CacheSource;

#[cfg(test)]
pub use traits::testing;
