//! Supported chains and their static properties

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown chain: {value}")]
pub struct ChainParseError {
	pub value: String,
}

/// Execution environment family of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKind {
	Evm,
	Stellar,
}

/// Closed set of chains the aggregator can route between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainId {
	Stellar,
	Ethereum,
	Polygon,
	Arbitrum,
	Optimism,
	Base,
	Avalanche,
	Bsc,
}

impl ChainId {
	pub const ALL: [ChainId; 8] = [
		ChainId::Stellar,
		ChainId::Ethereum,
		ChainId::Polygon,
		ChainId::Arbitrum,
		ChainId::Optimism,
		ChainId::Base,
		ChainId::Avalanche,
		ChainId::Bsc,
	];

	pub fn kind(self) -> ChainKind {
		match self {
			ChainId::Stellar => ChainKind::Stellar,
			_ => ChainKind::Evm,
		}
	}

	pub fn is_evm(self) -> bool {
		self.kind() == ChainKind::Evm
	}

	/// EIP-155 chain id, `None` for non-EVM chains
	pub fn evm_chain_id(self) -> Option<u64> {
		match self {
			ChainId::Stellar => None,
			ChainId::Ethereum => Some(1),
			ChainId::Polygon => Some(137),
			ChainId::Arbitrum => Some(42161),
			ChainId::Optimism => Some(10),
			ChainId::Base => Some(8453),
			ChainId::Avalanche => Some(43114),
			ChainId::Bsc => Some(56),
		}
	}

	pub fn from_evm_chain_id(chain_id: u64) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|chain| chain.evm_chain_id() == Some(chain_id))
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ChainId::Stellar => "stellar",
			ChainId::Ethereum => "ethereum",
			ChainId::Polygon => "polygon",
			ChainId::Arbitrum => "arbitrum",
			ChainId::Optimism => "optimism",
			ChainId::Base => "base",
			ChainId::Avalanche => "avalanche",
			ChainId::Bsc => "bsc",
		}
	}

	pub fn display_name(self) -> &'static str {
		match self {
			ChainId::Stellar => "Stellar",
			ChainId::Ethereum => "Ethereum",
			ChainId::Polygon => "Polygon PoS",
			ChainId::Arbitrum => "Arbitrum One",
			ChainId::Optimism => "OP Mainnet",
			ChainId::Base => "Base",
			ChainId::Avalanche => "Avalanche C-Chain",
			ChainId::Bsc => "BNB Smart Chain",
		}
	}

	/// Baseline seconds until a transfer on this chain is considered final
	pub fn finality_secs(self) -> u64 {
		match self {
			ChainId::Stellar => 6,
			ChainId::Ethereum => 180,
			ChainId::Polygon => 256,
			ChainId::Arbitrum => 60,
			ChainId::Optimism => 60,
			ChainId::Base => 60,
			ChainId::Avalanche => 10,
			ChainId::Bsc => 45,
		}
	}

	/// Static reachability table used by pre-flight checks
	///
	/// Every EVM chain reaches every other EVM chain. Stellar is bridged to
	/// Ethereum, Polygon, Arbitrum and Base only.
	pub fn can_reach(self, target: ChainId) -> bool {
		if self == target {
			return false;
		}
		match (self.kind(), target.kind()) {
			(ChainKind::Evm, ChainKind::Evm) => true,
			(ChainKind::Stellar, ChainKind::Evm) => target.is_stellar_bridged(),
			(ChainKind::Evm, ChainKind::Stellar) => self.is_stellar_bridged(),
			(ChainKind::Stellar, ChainKind::Stellar) => false,
		}
	}

	fn is_stellar_bridged(self) -> bool {
		matches!(
			self,
			ChainId::Ethereum | ChainId::Polygon | ChainId::Arbitrum | ChainId::Base
		)
	}

	/// Normalize a token address or symbol for registry lookups
	///
	/// EVM identifiers are case-insensitive and stored lowercase; Stellar
	/// asset codes and issuer keys are case-sensitive and kept as given.
	pub fn normalize_identifier(self, raw: &str) -> String {
		let trimmed = raw.trim();
		match self.kind() {
			ChainKind::Evm => trimmed.to_ascii_lowercase(),
			ChainKind::Stellar => trimmed.to_string(),
		}
	}
}

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for ChainId {
	type Err = ChainParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lowered = s.trim().to_ascii_lowercase();
		Self::ALL
			.into_iter()
			.find(|chain| chain.as_str() == lowered)
			.ok_or_else(|| ChainParseError {
				value: s.to_string(),
			})
	}
}
