//! In-memory liquidity store using DashMap with TTL support

use async_trait::async_trait;
use bridge_types::constants::limits::DEFAULT_SNAPSHOT_TTL_SECS;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::traits::{LiquiditySnapshot, LiquidityStore, SnapshotKey, StorageResult};

/// In-memory liquidity snapshots with TTL expiry
#[derive(Debug, Clone)]
pub struct MemoryStore {
	snapshots: Arc<DashMap<SnapshotKey, LiquiditySnapshot>>,
	ttl_secs: u64,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	/// Create a new memory store with the default snapshot TTL
	pub fn new() -> Self {
		Self::with_ttl(DEFAULT_SNAPSHOT_TTL_SECS)
	}

	/// Create a new memory store with a custom TTL; zero disables expiry
	pub fn with_ttl(ttl_secs: u64) -> Self {
		Self {
			snapshots: Arc::new(DashMap::new()),
			ttl_secs,
		}
	}

	pub fn ttl_secs(&self) -> u64 {
		self.ttl_secs
	}

	pub fn len(&self) -> usize {
		self.snapshots.len()
	}

	pub fn is_empty(&self) -> bool {
		self.snapshots.is_empty()
	}

	fn is_expired(&self, snapshot: &LiquiditySnapshot) -> bool {
		let ttl = i64::try_from(self.ttl_secs).unwrap_or(i64::MAX);
		self.ttl_secs > 0 && snapshot.age_secs(Utc::now()) >= ttl
	}

	fn remove_expired(&self) -> usize {
		if self.ttl_secs == 0 {
			return 0;
		}
		let before = self.snapshots.len();
		self.snapshots.retain(|_, snapshot| !self.is_expired(snapshot));
		before.saturating_sub(self.snapshots.len())
	}

	/// Start the TTL cleanup task for expired snapshots
	pub fn start_ttl_cleanup(&self) -> tokio::task::JoinHandle<()> {
		if self.ttl_secs == 0 {
			return tokio::spawn(async {});
		}

		let store = self.clone();
		tokio::spawn(async move {
			let mut cleanup_interval = interval(Duration::from_secs(60)); // Check every minute

			loop {
				cleanup_interval.tick().await;
				let removed = store.remove_expired();
				if removed > 0 {
					debug!("Cleaned up {} expired liquidity snapshots", removed);
				}
			}
		})
	}
}

#[async_trait]
impl LiquidityStore for MemoryStore {
	async fn get_snapshot(&self, key: &SnapshotKey) -> StorageResult<Option<LiquiditySnapshot>> {
		let Some(snapshot) = self.snapshots.get(key).map(|entry| entry.value().clone()) else {
			return Ok(None);
		};
		if self.is_expired(&snapshot) {
			debug!("Liquidity snapshot {} expired", key);
			self.snapshots.remove(key);
			return Ok(None);
		}
		Ok(Some(snapshot))
	}

	async fn put_snapshot(&self, snapshot: LiquiditySnapshot) -> StorageResult<()> {
		snapshot.validate()?;
		debug!(
			"Storing liquidity snapshot {} (score {:.3})",
			snapshot.key, snapshot.score
		);
		self.snapshots.insert(snapshot.key.clone(), snapshot);
		Ok(())
	}

	async fn remove_snapshot(&self, key: &SnapshotKey) -> StorageResult<bool> {
		Ok(self.snapshots.remove(key).is_some())
	}

	async fn cleanup_expired(&self) -> StorageResult<usize> {
		let removed = self.remove_expired();
		if removed > 0 {
			info!("Cleaned up {} expired liquidity snapshots", removed);
		}
		Ok(removed)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::traits::StorageError;
	use bridge_types::{Amount, BridgeProvider, ChainId};

	fn key() -> SnapshotKey {
		SnapshotKey::new(
			BridgeProvider::Stellar,
			ChainId::Stellar,
			ChainId::Ethereum,
			"USDC",
		)
	}

	#[tokio::test]
	async fn test_put_and_get_snapshot() {
		let store = MemoryStore::new();
		store
			.put_snapshot(LiquiditySnapshot::new(key(), Amount::from(1_000u64), 0.7))
			.await
			.unwrap();

		let snapshot = store.get_snapshot(&key()).await.unwrap().unwrap();
		assert_eq!(snapshot.score, 0.7);
		assert_eq!(snapshot.available_liquidity, Amount::from(1_000u64));
	}

	#[tokio::test]
	async fn test_replaces_snapshot_for_same_key() {
		let store = MemoryStore::new();
		store
			.put_snapshot(LiquiditySnapshot::new(key(), Amount::from(1u64), 0.1))
			.await
			.unwrap();
		store
			.put_snapshot(LiquiditySnapshot::new(key(), Amount::from(2u64), 0.9))
			.await
			.unwrap();

		assert_eq!(store.len(), 1);
		let snapshot = store.get_snapshot(&key()).await.unwrap().unwrap();
		assert_eq!(snapshot.score, 0.9);
	}

	#[tokio::test]
	async fn test_huge_ttl_keeps_snapshots_fresh() {
		let store = MemoryStore::with_ttl(u64::MAX);
		store
			.put_snapshot(LiquiditySnapshot::new(key(), Amount::from(1_000u64), 0.7))
			.await
			.unwrap();

		assert!(store.get_snapshot(&key()).await.unwrap().is_some());
		assert_eq!(store.cleanup_expired().await.unwrap(), 0);
	}

	#[tokio::test]
	async fn test_rejects_out_of_range_score() {
		let store = MemoryStore::new();
		let err = store
			.put_snapshot(LiquiditySnapshot::new(key(), Amount::from(1u64), 1.5))
			.await
			.unwrap_err();
		assert!(matches!(err, StorageError::InvalidSnapshot { .. }));
	}

	#[tokio::test]
	async fn test_expired_snapshots_are_hidden_and_cleaned() {
		let store = MemoryStore::with_ttl(60);
		let mut stale = LiquiditySnapshot::new(key(), Amount::from(1u64), 0.5);
		stale.updated_at = Utc::now() - chrono::Duration::seconds(120);
		store.put_snapshot(stale).await.unwrap();

		let other = SnapshotKey::new(
			BridgeProvider::Hop,
			ChainId::Ethereum,
			ChainId::Polygon,
			"USDC",
		);
		store
			.put_snapshot(LiquiditySnapshot::new(other.clone(), Amount::from(1u64), 0.5))
			.await
			.unwrap();

		assert_eq!(store.cleanup_expired().await.unwrap(), 1);
		assert!(store.get_snapshot(&key()).await.unwrap().is_none());
		assert!(store.get_snapshot(&other).await.unwrap().is_some());
	}

	#[test]
	fn test_key_normalizes_evm_tokens() {
		let upper = SnapshotKey::new(
			BridgeProvider::Hop,
			ChainId::Ethereum,
			ChainId::Polygon,
			"0xABCdef",
		);
		assert_eq!(upper.token, "0xabcdef");

		let stellar = SnapshotKey::new(
			BridgeProvider::Stellar,
			ChainId::Stellar,
			ChainId::Polygon,
			"USDC:GABC",
		);
		assert_eq!(stellar.token, "USDC:GABC");
	}
}
