//! Hop Protocol adapter
//!
//! Hop bonds transfers between EVM rollups. A quote is a single route whose
//! fee is the bonder fee plus the destination transaction fee.

use async_trait::async_trait;
use bridge_types::{
	AdapterResult, Amount, BridgeAdapter, BridgeProvider, BridgeRoute, ChainId, RouteRequest,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::payload::{absorb_failure, amount_from, route_id, seconds_from};
use crate::transport::{BridgeTransport, HttpTransport, ProviderEndpoint};

pub const HOP_RELIABILITY: f64 = 0.92;

/// Time for a bonder to front the transfer once the source tx is final
const BONDER_SECS: u64 = 60;

const DEFAULT_TOKEN: &str = "USDC";

/// Hop chain slug for a chain, if Hop serves it
fn hop_slug(chain: ChainId) -> Option<&'static str> {
	match chain {
		ChainId::Ethereum => Some("ethereum"),
		ChainId::Polygon => Some("polygon"),
		ChainId::Arbitrum => Some("arbitrum"),
		ChainId::Optimism => Some("optimism"),
		ChainId::Base => Some("base"),
		_ => None,
	}
}

#[derive(Debug)]
pub struct HopAdapter {
	endpoint: ProviderEndpoint,
	transport: Arc<dyn BridgeTransport>,
}

impl HopAdapter {
	pub fn new(endpoint: ProviderEndpoint, transport: Arc<dyn BridgeTransport>) -> Self {
		Self {
			endpoint,
			transport,
		}
	}

	/// Create a Hop adapter backed by its own HTTP client
	pub fn with_http(endpoint: ProviderEndpoint) -> AdapterResult<Self> {
		let transport = Arc::new(HttpTransport::new(&endpoint)?);
		Ok(Self::new(endpoint, transport))
	}

	fn quote_query(&self, request: &RouteRequest, from: &str, to: &str) -> Vec<(String, String)> {
		vec![
			("amount".to_string(), request.asset_amount.to_string()),
			(
				"token".to_string(),
				request
					.token_address
					.clone()
					.unwrap_or_else(|| DEFAULT_TOKEN.to_string()),
			),
			("fromChain".to_string(), from.to_string()),
			("toChain".to_string(), to.to_string()),
			("slippage".to_string(), request.slippage().to_string()),
		]
	}

	fn parse_quote(&self, request: &RouteRequest, payload: &Value) -> Option<BridgeRoute> {
		let Some(bonder_fee) = amount_from(payload.get("bonderFee")) else {
			warn!("Hop quote missing bonderFee, ignoring payload");
			return None;
		};
		let destination_fee = amount_from(payload.get("destinationTxFee")).unwrap_or_default();
		let fee = bonder_fee.clone() + &destination_fee;

		let Some(output) = request.asset_amount.checked_sub(&fee) else {
			debug!(
				"Hop fees {} exceed input {}, no route",
				fee, request.asset_amount
			);
			return None;
		};

		let route = BridgeRoute::from_amounts(
			route_id(BridgeProvider::Hop, request, 0),
			BridgeProvider::Hop,
			request.source_chain,
			request.target_chain,
			request.asset_amount.clone(),
			output.clone(),
		)
		.ok()?;

		let token = request
			.token_address
			.clone()
			.unwrap_or_else(|| DEFAULT_TOKEN.to_string());
		let min_out = amount_from(payload.get("amountOutMin"))
			.filter(|min| *min <= output)
			.unwrap_or_else(|| output.clone());

		let mut route = route
			.with_tokens(token.clone(), token)
			.with_estimated_time(request.source_chain.finality_secs() + BONDER_SECS)
			.with_reliability(HOP_RELIABILITY)
			.with_amount_out_bounds(min_out, output)
			.with_metadata("bonderFee", json!(bonder_fee.to_string()))
			.with_metadata("destinationTxFee", json!(destination_fee.to_string()));

		// Deadlines past i64 range are dropped
		let deadline = seconds_from(payload.get("deadline")).and_then(|d| i64::try_from(d).ok());
		if let Some(deadline) = deadline {
			route = route.with_deadline(deadline);
		}

		Some(route)
	}
}

#[async_trait]
impl BridgeAdapter for HopAdapter {
	fn provider(&self) -> BridgeProvider {
		BridgeProvider::Hop
	}

	fn supports_chain_pair(&self, source: ChainId, target: ChainId) -> bool {
		source != target && hop_slug(source).is_some() && hop_slug(target).is_some()
	}

	async fn fetch_routes(&self, request: &RouteRequest) -> AdapterResult<Vec<BridgeRoute>> {
		if !self.supports_chain_pair(request.source_chain, request.target_chain) {
			return Ok(Vec::new());
		}
		let (Some(from), Some(to)) = (hop_slug(request.source_chain), hop_slug(request.target_chain))
		else {
			return Ok(Vec::new());
		};

		debug!(
			"Hop adapter fetching quote {} -> {} for {}",
			from, to, request.asset_amount
		);

		let query = self.quote_query(request, from, to);
		let result = self
			.transport
			.get_json(&self.endpoint.url("/v1/quote"), &query)
			.await;

		let Some(payload) = absorb_failure(BridgeProvider::Hop, result)? else {
			return Ok(Vec::new());
		};

		Ok(self.parse_quote(request, &payload).into_iter().collect())
	}

	async fn health_check(&self) -> AdapterResult<bool> {
		let result = self
			.transport
			.get_json(&self.endpoint.url("/v1/available-routes"), &[])
			.await;
		Ok(match result {
			Ok(_) => true,
			Err(e) => {
				warn!("Hop health check failed: {}", e);
				false
			},
		})
	}
}
