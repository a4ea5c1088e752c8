//! Types shared by the compatibility engine

use bridge_types::constants::limits::{DEFAULT_LIQUIDITY_SCORE, DEFAULT_MAX_ALTERNATIVES};
use bridge_types::{
	AggregatedRoutes, Amount, BridgeProvider, ChainId, FeeEstimate, LatencyEstimate,
	TokenMappingEntry, ValidationError, ValidationResult,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when registering tokens or mappings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
	#[error("Invalid token: {reason}")]
	InvalidToken { reason: String },

	#[error("Token is on {actual} but the mapping expects {expected}")]
	ChainMismatch { expected: ChainId, actual: ChainId },

	#[error("Source and destination chain are both {chain}")]
	SameChain { chain: ChainId },

	#[error("Minimum amount {min} exceeds maximum amount {max}")]
	InvalidBounds { min: Amount, max: Amount },

	#[error("Conversion rate must be a positive finite number, got {rate}")]
	InvalidConversionRate { rate: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityConfig {
	/// Treat unresolvable wrapped tokens as a warning instead of an error
	pub allow_wrapped_tokens: bool,
	pub suggest_alternatives: bool,
	pub max_alternatives: usize,
	/// Score used when the liquidity store has no snapshot
	pub default_liquidity_score: f64,
}

impl Default for CompatibilityConfig {
	fn default() -> Self {
		Self {
			allow_wrapped_tokens: true,
			suggest_alternatives: true,
			max_alternatives: DEFAULT_MAX_ALTERNATIVES,
			default_liquidity_score: DEFAULT_LIQUIDITY_SCORE,
		}
	}
}

/// Operational state of a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeStatus {
	pub available: bool,
	pub paused: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
}

impl Default for BridgeStatus {
	fn default() -> Self {
		Self::available()
	}
}

impl BridgeStatus {
	pub fn available() -> Self {
		Self {
			available: true,
			paused: false,
			reason: None,
		}
	}

	pub fn paused(reason: impl Into<String>) -> Self {
		Self {
			available: true,
			paused: true,
			reason: Some(reason.into()),
		}
	}

	pub fn unavailable(reason: impl Into<String>) -> Self {
		Self {
			available: false,
			paused: false,
			reason: Some(reason.into()),
		}
	}

	pub fn is_usable(&self) -> bool {
		self.available && !self.paused
	}
}

/// Request for locally known routes between two tokens
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityRequest {
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	/// Address or symbol on the source chain
	pub source_token: String,
	/// Address or symbol on the destination chain; any mapped token when `None`
	pub destination_token: Option<String>,
	pub amount: Amount,
	/// Limit the search to these providers
	pub providers: Option<Vec<BridgeProvider>>,
	pub slippage_percent: Option<f64>,
}

impl CompatibilityRequest {
	pub fn new(
		source_chain: ChainId,
		destination_chain: ChainId,
		source_token: impl Into<String>,
		amount: Amount,
	) -> Self {
		Self {
			source_chain,
			destination_chain,
			source_token: source_token.into(),
			destination_token: None,
			amount,
			providers: None,
			slippage_percent: None,
		}
	}

	pub fn with_destination_token(mut self, token: impl Into<String>) -> Self {
		self.destination_token = Some(token.into());
		self
	}

	pub fn with_providers(mut self, providers: Vec<BridgeProvider>) -> Self {
		self.providers = Some(providers);
		self
	}

	pub fn with_slippage(mut self, slippage_percent: f64) -> Self {
		self.slippage_percent = Some(slippage_percent);
		self
	}
}

/// A provider able to move the requested tokens, with local estimates
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibleRoute {
	pub provider: BridgeProvider,
	pub mapping: TokenMappingEntry,
	/// Lower is better
	pub priority: f64,
	pub liquidity_score: f64,
	pub fee_estimate: FeeEstimate,
	pub latency_estimate: LatencyEstimate,
}

/// An aggregated route dropped by re-validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRoute {
	pub route_id: String,
	pub provider: BridgeProvider,
	pub errors: Vec<ValidationError>,
}

/// Outcome of validated aggregation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibleRoutesResult {
	/// Pre-validation findings plus warnings raised while re-validating routes
	pub validation: ValidationResult,
	pub routes: AggregatedRoutes,
	pub rejected: Vec<RejectedRoute>,
}
