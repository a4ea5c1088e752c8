//! Route request model

use serde::{Deserialize, Serialize};

use crate::constants::limits::DEFAULT_SLIPPAGE_PERCENT;
use crate::models::{Amount, ChainId};

/// Request to move `asset_amount` from `source_chain` to `target_chain`
///
/// `source_chain != target_chain` is enforced by the validators, not here,
/// so the aggregator can still be asked about degenerate pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
	pub source_chain: ChainId,
	pub target_chain: ChainId,
	pub asset_amount: Amount,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token_address: Option<String>,
	/// Slippage tolerance in percent (0-100)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slippage_tolerance: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub recipient_address: Option<String>,
}

impl RouteRequest {
	pub fn new(source_chain: ChainId, target_chain: ChainId, asset_amount: Amount) -> Self {
		Self {
			source_chain,
			target_chain,
			asset_amount,
			token_address: None,
			slippage_tolerance: None,
			recipient_address: None,
		}
	}

	pub fn with_token(mut self, token_address: impl Into<String>) -> Self {
		self.token_address = Some(token_address.into());
		self
	}

	pub fn with_slippage(mut self, slippage_percent: f64) -> Self {
		self.slippage_tolerance = Some(slippage_percent);
		self
	}

	pub fn with_recipient(mut self, recipient: impl Into<String>) -> Self {
		self.recipient_address = Some(recipient.into());
		self
	}

	/// Effective slippage tolerance in percent, clamped to `[0, 100]`
	pub fn slippage(&self) -> f64 {
		match self.slippage_tolerance {
			Some(value) if value.is_finite() => value.clamp(0.0, 100.0),
			_ => DEFAULT_SLIPPAGE_PERCENT,
		}
	}

	/// Slippage tolerance in basis points
	pub fn slippage_bps(&self) -> u64 {
		(self.slippage() * 100.0).round() as u64
	}

	/// Route id prefix shared by all routes answering this request
	pub fn pair_label(&self) -> String {
		format!("{}-{}", self.source_chain, self.target_chain)
	}
}
