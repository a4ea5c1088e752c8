//! Timing-controlled adapters for aggregation e2e tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bridge_aggregator::adapters::AdapterResult;
use bridge_aggregator::{AdapterError, BridgeAdapter, BridgeProvider, BridgeRoute, ChainId, RouteRequest};

/// Call tracking for verifying which adapters were actually called
#[derive(Debug, Clone, Default)]
pub struct CallTracker {
	calls: Arc<AtomicUsize>,
}

impl CallTracker {
	pub fn record_call(&self) {
		self.calls.fetch_add(1, Ordering::SeqCst);
	}

	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

/// Adapter that answers every EVM pair after a configurable delay
#[derive(Debug, Clone)]
pub struct TimingControlledAdapter {
	pub provider: BridgeProvider,
	pub response_delay_ms: u64,
	pub should_fail: bool,
	pub fee_bps: u64,
	pub estimated_time: u64,
	pub reliability: f64,
	pub tracker: CallTracker,
}

impl TimingControlledAdapter {
	/// Responds in ~100ms
	pub fn fast(provider: BridgeProvider) -> Self {
		Self::new(provider, 100, false)
	}

	/// Responds in ~1500ms
	pub fn slow(provider: BridgeProvider) -> Self {
		Self::new(provider, 1500, false)
	}

	/// Responds in ~5000ms, past any timeout the tests configure
	pub fn timeout(provider: BridgeProvider) -> Self {
		Self::new(provider, 5000, false)
	}

	pub fn failing(provider: BridgeProvider) -> Self {
		Self::new(provider, 100, true)
	}

	pub fn new(provider: BridgeProvider, response_delay_ms: u64, should_fail: bool) -> Self {
		Self {
			provider,
			response_delay_ms,
			should_fail,
			fee_bps: 30,
			estimated_time: 300,
			reliability: 0.9,
			tracker: CallTracker::default(),
		}
	}

	pub fn with_quote(mut self, fee_bps: u64, estimated_time: u64, reliability: f64) -> Self {
		self.fee_bps = fee_bps;
		self.estimated_time = estimated_time;
		self.reliability = reliability;
		self
	}

	pub fn call_count(&self) -> usize {
		self.tracker.call_count()
	}

	pub fn route_id(&self, request: &RouteRequest) -> String {
		format!("{}:{}:timing", self.provider, request.pair_label())
	}
}

#[async_trait]
impl BridgeAdapter for TimingControlledAdapter {
	fn provider(&self) -> BridgeProvider {
		self.provider
	}

	fn supports_chain_pair(&self, source: ChainId, target: ChainId) -> bool {
		source != target && source.is_evm() && target.is_evm()
	}

	async fn fetch_routes(&self, request: &RouteRequest) -> AdapterResult<Vec<BridgeRoute>> {
		self.tracker.record_call();
		tokio::time::sleep(Duration::from_millis(self.response_delay_ms)).await;

		if self.should_fail {
			return Err(AdapterError::Http {
				reason: format!("{} upstream unavailable", self.provider),
			});
		}

		let fee = request.asset_amount.mul_bps(self.fee_bps);
		let output = request.asset_amount.checked_sub(&fee).unwrap_or_default();
		let route = BridgeRoute::from_amounts(
			self.route_id(request),
			self.provider,
			request.source_chain,
			request.target_chain,
			request.asset_amount.clone(),
			output,
		)
		.map_err(|e| AdapterError::InvalidResponse {
			reason: e.to_string(),
		})?
		.with_estimated_time(self.estimated_time)
		.with_reliability(self.reliability);

		Ok(vec![route])
	}
}
