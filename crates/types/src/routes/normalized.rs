//! Aggregator-level route shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::RouteHop;
use crate::models::{Amount, BridgeProvider, ChainId};

/// Route reshaped into the aggregator's canonical schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRoute {
	pub id: String,
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	pub token_in: String,
	pub token_out: String,
	pub input_amount: Amount,
	pub output_amount: Amount,
	/// Sum of the hop fees
	pub total_fees: Amount,
	pub fee_percentage: f64,
	/// Sum of the hop times, in seconds
	pub estimated_time: u64,
	pub reliability: f64,
	/// Ordered legs, never empty
	pub hops: Vec<RouteHop>,
	pub adapter: BridgeProvider,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub deadline: Option<i64>,
	#[serde(default)]
	pub metadata: BTreeMap<String, serde_json::Value>,
}

impl NormalizedRoute {
	pub fn is_multi_hop(&self) -> bool {
		self.hops.len() > 1
	}
}

/// Provider that failed or timed out during aggregation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
	pub provider: BridgeProvider,
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub code: Option<String>,
}

/// Ranked result of one aggregation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedRoutes {
	pub routes: Vec<NormalizedRoute>,
	pub timestamp: DateTime<Utc>,
	pub providers_queried: usize,
	pub providers_responded: usize,
	#[serde(default)]
	pub errors: Vec<ProviderFailure>,
}

impl AggregatedRoutes {
	/// Result for a pair no registered adapter supports
	pub fn empty() -> Self {
		Self {
			routes: Vec::new(),
			timestamp: Utc::now(),
			providers_queried: 0,
			providers_responded: 0,
			errors: Vec::new(),
		}
	}

	pub fn best(&self) -> Option<&NormalizedRoute> {
		self.routes.first()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}
