//! Storage trait for liquidity snapshots

use async_trait::async_trait;
use bridge_types::{Amount, BridgeProvider, ChainId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Storage error type
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StorageError {
	#[error("Item not found: {id}")]
	NotFound { id: String },
	#[error("Invalid snapshot: {message}")]
	InvalidSnapshot { message: String },
	#[error("Storage operation failed: {message}")]
	Operation { message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Identity of a liquidity pool: provider, direction and normalized token
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SnapshotKey {
	pub provider: BridgeProvider,
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	pub token: String,
}

impl SnapshotKey {
	pub fn new(
		provider: BridgeProvider,
		source_chain: ChainId,
		destination_chain: ChainId,
		token: &str,
	) -> Self {
		Self {
			provider,
			source_chain,
			destination_chain,
			token: source_chain.normalize_identifier(token),
		}
	}
}

impl fmt::Display for SnapshotKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}:{}-{}:{}",
			self.provider, self.source_chain, self.destination_chain, self.token
		)
	}
}

/// Last known liquidity of a bridge pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquiditySnapshot {
	pub key: SnapshotKey,
	pub available_liquidity: Amount,
	/// Normalized liquidity score in `[0, 1]`, higher is deeper
	pub score: f64,
	pub updated_at: DateTime<Utc>,
}

impl LiquiditySnapshot {
	pub fn new(key: SnapshotKey, available_liquidity: Amount, score: f64) -> Self {
		Self {
			key,
			available_liquidity,
			score,
			updated_at: Utc::now(),
		}
	}

	pub fn validate(&self) -> StorageResult<()> {
		if !self.score.is_finite() || !(0.0..=1.0).contains(&self.score) {
			return Err(StorageError::InvalidSnapshot {
				message: format!("score {} outside [0, 1] for {}", self.score, self.key),
			});
		}
		Ok(())
	}

	pub fn age_secs(&self, now: DateTime<Utc>) -> i64 {
		(now - self.updated_at).num_seconds()
	}
}

/// Get/set-by-key contract for liquidity snapshots
#[async_trait]
pub trait LiquidityStore: Send + Sync + fmt::Debug {
	/// Fresh snapshot for the key, if any
	async fn get_snapshot(&self, key: &SnapshotKey) -> StorageResult<Option<LiquiditySnapshot>>;

	async fn put_snapshot(&self, snapshot: LiquiditySnapshot) -> StorageResult<()>;

	/// Returns whether a snapshot was removed
	async fn remove_snapshot(&self, key: &SnapshotKey) -> StorageResult<bool>;

	/// Drop expired snapshots, returning how many were removed
	async fn cleanup_expired(&self) -> StorageResult<usize>;
}
