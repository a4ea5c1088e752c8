//! LayerZero adapter
//!
//! LayerZero addresses chains by endpoint id (eid). The quote API can answer
//! with several quotes, some of which route through an intermediate chain
//! and carry explicit hops.

use async_trait::async_trait;
use bridge_types::{
	AdapterResult, BridgeAdapter, BridgeProvider, BridgeRoute, ChainId, RouteHop, RouteRequest,
	TransactionData,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::payload::{absorb_failure, amount_from, route_id, seconds_from, str_from};
use crate::transport::{BridgeTransport, HttpTransport, ProviderEndpoint};

pub const LAYERZERO_RELIABILITY: f64 = 0.95;

/// DVN verification and executor delivery on top of source finality
const MESSAGE_DELIVERY_SECS: u64 = 90;

const DEFAULT_TOKEN: &str = "USDC";

/// LayerZero V2 mainnet endpoint id for a chain
fn endpoint_id(chain: ChainId) -> Option<u32> {
	match chain {
		ChainId::Ethereum => Some(30101),
		ChainId::Bsc => Some(30102),
		ChainId::Avalanche => Some(30106),
		ChainId::Polygon => Some(30109),
		ChainId::Arbitrum => Some(30110),
		ChainId::Optimism => Some(30111),
		ChainId::Base => Some(30184),
		ChainId::Stellar => None,
	}
}

fn chain_for_endpoint_id(eid: u64) -> Option<ChainId> {
	ChainId::ALL
		.into_iter()
		.find(|chain| endpoint_id(*chain).map(u64::from) == Some(eid))
}

#[derive(Debug)]
pub struct LayerZeroAdapter {
	endpoint: ProviderEndpoint,
	transport: Arc<dyn BridgeTransport>,
}

impl LayerZeroAdapter {
	pub fn new(endpoint: ProviderEndpoint, transport: Arc<dyn BridgeTransport>) -> Self {
		Self {
			endpoint,
			transport,
		}
	}

	/// Create a LayerZero adapter backed by its own HTTP client
	pub fn with_http(endpoint: ProviderEndpoint) -> AdapterResult<Self> {
		let transport = Arc::new(HttpTransport::new(&endpoint)?);
		Ok(Self::new(endpoint, transport))
	}

	fn quote_body(&self, request: &RouteRequest, src_eid: u32, dst_eid: u32) -> Value {
		json!({
			"srcEid": src_eid,
			"dstEid": dst_eid,
			"amount": request.asset_amount.to_string(),
			"token": request.token_address.as_deref().unwrap_or(DEFAULT_TOKEN),
			"slippageBps": request.slippage_bps(),
			"recipient": request.recipient_address,
		})
	}

	fn parse_hops(&self, quote: &Value, token: &str) -> Option<Vec<RouteHop>> {
		let Some(raw_hops) = quote.get("hops").and_then(Value::as_array) else {
			return Some(Vec::new());
		};

		raw_hops
			.iter()
			.map(|hop| {
				let source = seconds_from(hop.get("srcEid")).and_then(chain_for_endpoint_id)?;
				let destination = seconds_from(hop.get("dstEid")).and_then(chain_for_endpoint_id)?;
				Some(RouteHop {
					adapter: BridgeProvider::LayerZero,
					source_chain: source,
					destination_chain: destination,
					token_in: str_from(hop.get("tokenIn")).unwrap_or(token).to_string(),
					token_out: str_from(hop.get("tokenOut")).unwrap_or(token).to_string(),
					// kept as reported; the normalizer decides whether it parses
					fee: match hop.get("fee") {
						Some(Value::String(s)) => s.clone(),
						Some(Value::Number(n)) => n.to_string(),
						_ => "0".to_string(),
					},
					estimated_time: seconds_from(hop.get("estimatedTime"))
						.unwrap_or(MESSAGE_DELIVERY_SECS)
						.max(1),
				})
			})
			.collect()
	}

	fn parse_quote(&self, request: &RouteRequest, index: usize, quote: &Value) -> Option<BridgeRoute> {
		let output = amount_from(quote.get("amountOut"))?;
		let token = request.token_address.as_deref().unwrap_or(DEFAULT_TOKEN);

		let route = match BridgeRoute::from_amounts(
			route_id(BridgeProvider::LayerZero, request, index),
			BridgeProvider::LayerZero,
			request.source_chain,
			request.target_chain,
			request.asset_amount.clone(),
			output.clone(),
		) {
			Ok(route) => route,
			Err(e) => {
				warn!("Dropping LayerZero quote {}: {}", index, e);
				return None;
			},
		};

		let Some(hops) = self.parse_hops(quote, token) else {
			warn!("Dropping LayerZero quote {} with unknown hop endpoint", index);
			return None;
		};

		let estimated_time = seconds_from(quote.get("estimatedTime")).unwrap_or_else(|| {
			request.source_chain.finality_secs() + MESSAGE_DELIVERY_SECS
		});
		let min_out = amount_from(quote.get("minAmountOut"))
			.filter(|min| *min <= output)
			.unwrap_or_else(|| output.mul_bps(10_000 - request.slippage_bps().min(10_000)));

		let mut route = route
			.with_tokens(token, token)
			.with_estimated_time(estimated_time)
			.with_reliability(LAYERZERO_RELIABILITY)
			.with_amount_out_bounds(min_out, output)
			.with_hops(hops);

		// Deadlines past i64 range are dropped
		let deadline = seconds_from(quote.get("deadline")).and_then(|d| i64::try_from(d).ok());
		if let Some(deadline) = deadline {
			route = route.with_deadline(deadline);
		}
		if let Some(tx) = quote
			.get("transaction")
			.and_then(|tx| serde_json::from_value::<TransactionData>(tx.clone()).ok())
		{
			route = route.with_transaction_data(tx);
		}
		if let Some(quote_id) = str_from(quote.get("id")) {
			route = route.with_metadata("quoteId", json!(quote_id));
		}

		Some(route)
	}
}

#[async_trait]
impl BridgeAdapter for LayerZeroAdapter {
	fn provider(&self) -> BridgeProvider {
		BridgeProvider::LayerZero
	}

	fn supports_chain_pair(&self, source: ChainId, target: ChainId) -> bool {
		source != target && endpoint_id(source).is_some() && endpoint_id(target).is_some()
	}

	async fn fetch_routes(&self, request: &RouteRequest) -> AdapterResult<Vec<BridgeRoute>> {
		if !self.supports_chain_pair(request.source_chain, request.target_chain) {
			return Ok(Vec::new());
		}
		let (Some(src_eid), Some(dst_eid)) = (
			endpoint_id(request.source_chain),
			endpoint_id(request.target_chain),
		) else {
			return Ok(Vec::new());
		};

		debug!(
			"LayerZero adapter fetching quotes eid {} -> {} for {}",
			src_eid, dst_eid, request.asset_amount
		);

		let body = self.quote_body(request, src_eid, dst_eid);
		let result = self
			.transport
			.post_json(&self.endpoint.url("/v1/quotes"), &body)
			.await;

		let Some(payload) = absorb_failure(BridgeProvider::LayerZero, result)? else {
			return Ok(Vec::new());
		};
		let Some(quotes) = payload.get("quotes").and_then(Value::as_array) else {
			warn!("LayerZero response has no quotes array, returning no routes");
			return Ok(Vec::new());
		};

		let routes: Vec<BridgeRoute> = quotes
			.iter()
			.enumerate()
			.filter_map(|(index, quote)| self.parse_quote(request, index, quote))
			.collect();

		debug!(
			"LayerZero returned {} usable routes out of {} quotes",
			routes.len(),
			quotes.len()
		);
		Ok(routes)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::transport::MockBridgeTransport;
	use bridge_types::Amount;

	fn adapter_with(payload: Value) -> LayerZeroAdapter {
		let mut transport = MockBridgeTransport::new();
		transport
			.expect_post_json()
			.withf(|url, body| {
				url == "https://lz.test/v1/quotes" && body["srcEid"] == 30101 && body["dstEid"] == 30110
			})
			.returning(move |_, _| Ok(payload.clone()));
		LayerZeroAdapter::new(
			ProviderEndpoint::new("https://lz.test", 1_000),
			Arc::new(transport),
		)
	}

	fn request() -> RouteRequest {
		RouteRequest::new(ChainId::Ethereum, ChainId::Arbitrum, Amount::from(10_000_000u64))
	}

	#[test]
	fn test_endpoint_id_table_round_trips() {
		for chain in ChainId::ALL {
			if let Some(eid) = endpoint_id(chain) {
				assert_eq!(chain_for_endpoint_id(u64::from(eid)), Some(chain));
			}
		}
		assert_eq!(chain_for_endpoint_id(1), None);
	}

	#[tokio::test]
	async fn test_multiple_quotes_with_explicit_hops() {
		let adapter = adapter_with(json!({
			"quotes": [
				{ "id": "direct", "amountOut": "9980000", "estimatedTime": 180 },
				{
					"id": "via-base",
					"amountOut": "9990000",
					"estimatedTime": 300,
					"hops": [
						{ "srcEid": 30101, "dstEid": 30184, "fee": "6000", "estimatedTime": 120 },
						{ "srcEid": 30184, "dstEid": 30110, "fee": "4000", "estimatedTime": 180 }
					]
				}
			]
		}));

		let routes = adapter.fetch_routes(&request()).await.unwrap();
		assert_eq!(routes.len(), 2);
		assert!(routes[0].hops.is_none());
		assert_eq!(routes[0].fee, Amount::from(20_000u64));

		let hops = routes[1].hops.as_ref().unwrap();
		assert_eq!(hops.len(), 2);
		assert_eq!(hops[0].destination_chain, ChainId::Base);
		assert_eq!(hops[1].fee, "4000");
		assert_eq!(routes[1].metadata["quoteId"], json!("via-base"));
	}

	#[tokio::test]
	async fn test_bad_quotes_are_dropped_individually() {
		let adapter = adapter_with(json!({
			"quotes": [
				{ "amountOut": "20000000" },
				{ "estimatedTime": 10 },
				{ "amountOut": "9000000", "hops": [{ "srcEid": 1, "dstEid": 30110 }] },
				{ "amountOut": "9500000" }
			]
		}));

		let routes = adapter.fetch_routes(&request()).await.unwrap();
		assert_eq!(routes.len(), 1);
		assert_eq!(routes[0].output_amount, Amount::from(9_500_000u64));
		assert_eq!(routes[0].id, "layerzero:ethereum-arbitrum:3");
	}

	#[tokio::test]
	async fn test_missing_quotes_array_yields_no_routes() {
		let adapter = adapter_with(json!({"error": "nope"}));
		assert!(adapter.fetch_routes(&request()).await.unwrap().is_empty());
	}

	#[test]
	fn test_stellar_is_not_a_layerzero_chain() {
		let adapter = LayerZeroAdapter::new(
			ProviderEndpoint::new("https://lz.test", 1_000),
			Arc::new(MockBridgeTransport::new()),
		);
		assert!(!adapter.supports_chain_pair(ChainId::Stellar, ChainId::Ethereum));
		assert!(adapter.supports_chain_pair(ChainId::Bsc, ChainId::Avalanche));
	}
}
