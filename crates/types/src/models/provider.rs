//! Bridge provider identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown bridge provider: {value}")]
pub struct ProviderParseError {
	pub value: String,
}

/// Closed set of bridge providers, each backed by exactly one adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgeProvider {
	Hop,
	LayerZero,
	Stellar,
	Mock,
}

impl BridgeProvider {
	pub const ALL: [BridgeProvider; 4] = [
		BridgeProvider::Hop,
		BridgeProvider::LayerZero,
		BridgeProvider::Stellar,
		BridgeProvider::Mock,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			BridgeProvider::Hop => "hop",
			BridgeProvider::LayerZero => "layerzero",
			BridgeProvider::Stellar => "stellar",
			BridgeProvider::Mock => "mock",
		}
	}

	pub fn display_name(self) -> &'static str {
		match self {
			BridgeProvider::Hop => "Hop Protocol",
			BridgeProvider::LayerZero => "LayerZero",
			BridgeProvider::Stellar => "Stellar Bridge",
			BridgeProvider::Mock => "Mock Bridge",
		}
	}

	/// Fixed preference order used to break liquidity ties (lower wins)
	pub fn preference_rank(self) -> u32 {
		match self {
			BridgeProvider::LayerZero => 0,
			BridgeProvider::Hop => 1,
			BridgeProvider::Stellar => 2,
			BridgeProvider::Mock => 3,
		}
	}
}

impl fmt::Display for BridgeProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for BridgeProvider {
	type Err = ProviderParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lowered = s.trim().to_ascii_lowercase();
		Self::ALL
			.into_iter()
			.find(|provider| provider.as_str() == lowered)
			.ok_or_else(|| ProviderParseError {
				value: s.to_string(),
			})
	}
}
