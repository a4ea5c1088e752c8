//! Stellar bridge adapter
//!
//! The Stellar bridge publishes pool liquidity and utilisation but no
//! quotes; fees and latency come from the deterministic estimators.

use async_trait::async_trait;
use bridge_types::{
	estimate_fees, estimate_latency, is_valid_amount, AdapterResult, Amount, BridgeAdapter,
	BridgeProvider, BridgeRoute, ChainId, RouteRequest,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::payload::{absorb_failure, amount_from, f64_from, route_id, str_from};
use crate::transport::{BridgeTransport, HttpTransport, ProviderEndpoint};

/// Source lock plus destination release
const BRIDGE_OPERATIONS: u32 = 2;

/// Quote validity window in seconds
const QUOTE_VALIDITY_SECS: i64 = 1_800;

const DEFAULT_ASSET: &str = "USDC";

/// Chain code used by the Stellar bridge pool API
fn bridge_chain_code(chain: ChainId) -> Option<&'static str> {
	match chain {
		ChainId::Stellar => Some("xlm"),
		ChainId::Ethereum => Some("eth"),
		ChainId::Polygon => Some("matic"),
		ChainId::Arbitrum => Some("arb"),
		ChainId::Base => Some("base"),
		_ => None,
	}
}

/// Liquidity state of the pool that pays out a transfer
#[derive(Debug, Clone, PartialEq)]
struct PoolState {
	available_liquidity: Amount,
	utilization: f64,
}

#[derive(Debug)]
pub struct StellarBridgeAdapter {
	endpoint: ProviderEndpoint,
	transport: Arc<dyn BridgeTransport>,
}

impl StellarBridgeAdapter {
	pub fn new(endpoint: ProviderEndpoint, transport: Arc<dyn BridgeTransport>) -> Self {
		Self {
			endpoint,
			transport,
		}
	}

	/// Create a Stellar bridge adapter backed by its own HTTP client
	pub fn with_http(endpoint: ProviderEndpoint) -> AdapterResult<Self> {
		let transport = Arc::new(HttpTransport::new(&endpoint)?);
		Ok(Self::new(endpoint, transport))
	}

	fn find_pool(&self, payload: &Value, chain_code: &str, asset: &str) -> Option<PoolState> {
		let pools = payload.get("pools")?.as_array()?;
		let pool = pools.iter().find(|pool| {
			str_from(pool.get("chain")) == Some(chain_code)
				&& str_from(pool.get("asset")).map_or(true, |a| a.eq_ignore_ascii_case(asset))
		})?;

		Some(PoolState {
			available_liquidity: amount_from(pool.get("availableLiquidity"))?,
			utilization: f64_from(pool.get("utilization")).unwrap_or(0.0),
		})
	}

	fn build_route(&self, request: &RouteRequest, asset: &str, pool: &PoolState) -> Option<BridgeRoute> {
		let from_stellar = !request.source_chain.is_evm();
		let fees = estimate_fees(
			&request.asset_amount,
			from_stellar,
			request.slippage(),
			BRIDGE_OPERATIONS,
		);
		let latency = estimate_latency(request.source_chain, request.target_chain, pool.utilization);

		let output = request.asset_amount.checked_sub(&fees.total_fee)?;
		if output > pool.available_liquidity {
			debug!(
				"Stellar pool liquidity {} below required {}, no route",
				pool.available_liquidity, output
			);
			return None;
		}

		let route = BridgeRoute::from_amounts(
			route_id(BridgeProvider::Stellar, request, 0),
			BridgeProvider::Stellar,
			request.source_chain,
			request.target_chain,
			request.asset_amount.clone(),
			output.clone(),
		)
		.ok()?;

		// slippage is already priced into the fee, so the minimum is the quote
		Some(
			route
				.with_tokens(asset, asset)
				.with_estimated_time(latency.estimated_seconds)
				.with_reliability(f64::from(latency.confidence) / 100.0)
				.with_amount_out_bounds(output.clone(), output)
				.with_deadline(Utc::now().timestamp() + QUOTE_VALIDITY_SECS)
				.with_metadata("networkFee", json!(fees.network_fee.to_string()))
				.with_metadata("bridgeFee", json!(fees.bridge_fee.to_string()))
				.with_metadata("slippageFee", json!(fees.slippage_fee.to_string()))
				.with_metadata("confidence", json!(latency.confidence))
				.with_metadata("poolUtilization", json!(pool.utilization))
				.with_metadata(
					"availableLiquidity",
					json!(pool.available_liquidity.to_string()),
				),
		)
	}
}

#[async_trait]
impl BridgeAdapter for StellarBridgeAdapter {
	fn provider(&self) -> BridgeProvider {
		BridgeProvider::Stellar
	}

	/// Exactly one side must be Stellar, the other a bridged EVM chain
	fn supports_chain_pair(&self, source: ChainId, target: ChainId) -> bool {
		source != target
			&& (source == ChainId::Stellar || target == ChainId::Stellar)
			&& bridge_chain_code(source).is_some()
			&& bridge_chain_code(target).is_some()
	}

	async fn fetch_routes(&self, request: &RouteRequest) -> AdapterResult<Vec<BridgeRoute>> {
		if !self.supports_chain_pair(request.source_chain, request.target_chain) {
			return Ok(Vec::new());
		}
		let Some(destination_code) = bridge_chain_code(request.target_chain) else {
			return Ok(Vec::new());
		};

		if !is_valid_amount(&request.asset_amount, !request.source_chain.is_evm()) {
			debug!(
				"Amount {} is dust for {}, no Stellar route",
				request.asset_amount, request.source_chain
			);
			return Ok(Vec::new());
		}

		let asset = request.token_address.as_deref().unwrap_or(DEFAULT_ASSET);
		let query = vec![
			("asset".to_string(), asset.to_string()),
			("chain".to_string(), destination_code.to_string()),
		];
		let result = self
			.transport
			.get_json(&self.endpoint.url("/v1/pools"), &query)
			.await;

		let Some(payload) = absorb_failure(BridgeProvider::Stellar, result)? else {
			return Ok(Vec::new());
		};
		let Some(pool) = self.find_pool(&payload, destination_code, asset) else {
			warn!(
				"Stellar pools response has no usable {} pool for {}",
				asset, destination_code
			);
			return Ok(Vec::new());
		};

		Ok(self.build_route(request, asset, &pool).into_iter().collect())
	}

	async fn health_check(&self) -> AdapterResult<bool> {
		let result = self
			.transport
			.get_json(&self.endpoint.url("/v1/pools"), &[])
			.await;
		Ok(match result {
			Ok(payload) => payload.get("pools").is_some(),
			Err(e) => {
				warn!("Stellar bridge health check failed: {}", e);
				false
			},
		})
	}
}
