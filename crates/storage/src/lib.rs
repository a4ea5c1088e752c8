//! Bridge Storage
//!
//! Liquidity snapshot storage for the bridge route aggregator. Snapshots are
//! a cache in front of provider liquidity data and are never persisted.

pub mod memory_store;
pub mod traits;

pub use memory_store::MemoryStore;
pub use traits::{LiquiditySnapshot, LiquidityStore, SnapshotKey, StorageError, StorageResult};
