//! Provider-native route model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{Amount, BridgeProvider, ChainId};

/// Raised when provider data violates `input_amount = output_amount + fee`
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouteIntegrityError {
	#[error("Output amount {output} exceeds input amount {input}")]
	OutputExceedsInput { input: Amount, output: Amount },
}

/// Unsigned transaction payload a provider returns for a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionData {
	pub to: String,
	pub data: String,
	#[serde(default)]
	pub value: Option<String>,
	#[serde(default)]
	pub gas_limit: Option<String>,
}

/// One leg of a route
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteHop {
	pub adapter: BridgeProvider,
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	pub token_in: String,
	pub token_out: String,
	/// Fee as reported by the provider, in smallest units
	pub fee: String,
	/// Seconds
	pub estimated_time: u64,
}

/// Route as produced by a single adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRoute {
	pub id: String,
	pub provider: BridgeProvider,
	pub source_chain: ChainId,
	pub target_chain: ChainId,
	pub token_in: String,
	pub token_out: String,
	pub input_amount: Amount,
	pub output_amount: Amount,
	pub fee: Amount,
	/// `fee / input_amount` in percent, clamped to `[0, 100]`
	pub fee_percentage: f64,
	/// Seconds, always greater than zero
	pub estimated_time: u64,
	/// Trust estimate in `[0, 1]`
	pub reliability: f64,
	pub min_amount_out: Amount,
	pub max_amount_out: Amount,
	/// Unix seconds after which the quote is void
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deadline: Option<i64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transaction_data: Option<TransactionData>,
	/// Explicit legs for multi-hop routes
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hops: Option<Vec<RouteHop>>,
	#[serde(default)]
	pub metadata: BTreeMap<String, serde_json::Value>,
}

impl BridgeRoute {
	/// Build a route from its input and output amounts
	///
	/// The fee is derived as `input - output`; an output larger than the
	/// input is rejected.
	pub fn from_amounts(
		id: impl Into<String>,
		provider: BridgeProvider,
		source_chain: ChainId,
		target_chain: ChainId,
		input_amount: Amount,
		output_amount: Amount,
	) -> Result<Self, RouteIntegrityError> {
		let fee = input_amount.checked_sub(&output_amount).ok_or_else(|| {
			RouteIntegrityError::OutputExceedsInput {
				input: input_amount.clone(),
				output: output_amount.clone(),
			}
		})?;
		let fee_percentage = fee.percentage_of(&input_amount);

		Ok(Self {
			id: id.into(),
			provider,
			source_chain,
			target_chain,
			token_in: String::new(),
			token_out: String::new(),
			min_amount_out: output_amount.clone(),
			max_amount_out: output_amount.clone(),
			input_amount,
			output_amount,
			fee,
			fee_percentage,
			estimated_time: 1,
			reliability: 1.0,
			deadline: None,
			transaction_data: None,
			hops: None,
			metadata: BTreeMap::new(),
		})
	}

	pub fn with_tokens(mut self, token_in: impl Into<String>, token_out: impl Into<String>) -> Self {
		self.token_in = token_in.into();
		self.token_out = token_out.into();
		self
	}

	pub fn with_estimated_time(mut self, seconds: u64) -> Self {
		self.estimated_time = seconds.max(1);
		self
	}

	pub fn with_reliability(mut self, reliability: f64) -> Self {
		self.reliability = if reliability.is_finite() {
			reliability.clamp(0.0, 1.0)
		} else {
			0.0
		};
		self
	}

	pub fn with_amount_out_bounds(mut self, min: Amount, max: Amount) -> Self {
		self.min_amount_out = min;
		self.max_amount_out = max;
		self
	}

	pub fn with_deadline(mut self, deadline: i64) -> Self {
		self.deadline = Some(deadline);
		self
	}

	pub fn with_transaction_data(mut self, tx: TransactionData) -> Self {
		self.transaction_data = Some(tx);
		self
	}

	pub fn with_hops(mut self, hops: Vec<RouteHop>) -> Self {
		self.hops = if hops.is_empty() { None } else { Some(hops) };
		self
	}

	pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
		self.metadata.insert(key.into(), value);
		self
	}

	/// Single hop describing the whole route
	pub fn synthesized_hop(&self) -> RouteHop {
		RouteHop {
			adapter: self.provider,
			source_chain: self.source_chain,
			destination_chain: self.target_chain,
			token_in: self.token_in.clone(),
			token_out: self.token_out.clone(),
			fee: self.fee.to_string(),
			estimated_time: self.estimated_time,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_fee_is_derived_from_amounts() {
		let route = BridgeRoute::from_amounts(
			"r1",
			BridgeProvider::Hop,
			ChainId::Ethereum,
			ChainId::Polygon,
			Amount::from(1_000_000u64),
			Amount::from(995_000u64),
		)
		.unwrap();

		assert_eq!(route.fee, Amount::from(5_000u64));
		assert_eq!(route.fee_percentage, 0.5);
		assert_eq!(
			route.output_amount.clone() + route.fee.clone(),
			route.input_amount
		);
	}

	#[test]
	fn test_output_above_input_is_integrity_error() {
		let result = BridgeRoute::from_amounts(
			"r1",
			BridgeProvider::Hop,
			ChainId::Ethereum,
			ChainId::Polygon,
			Amount::from(100u64),
			Amount::from(101u64),
		);
		assert!(matches!(
			result,
			Err(RouteIntegrityError::OutputExceedsInput { .. })
		));
	}

	#[test]
	fn test_builder_clamps_time_and_reliability() {
		let route = BridgeRoute::from_amounts(
			"r1",
			BridgeProvider::Mock,
			ChainId::Ethereum,
			ChainId::Base,
			Amount::from(100u64),
			Amount::from(90u64),
		)
		.unwrap()
		.with_estimated_time(0)
		.with_reliability(1.7);

		assert_eq!(route.estimated_time, 1);
		assert_eq!(route.reliability, 1.0);
	}
}
