//! Configurable in-process adapter for tests and demos

use async_trait::async_trait;
use bridge_types::{
	AdapterError, AdapterResult, BridgeAdapter, BridgeProvider, BridgeRoute, ChainId, RouteRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Adapter returning canned routes after an optional delay
///
/// Unlike the network adapters, a configured failure is returned as-is so
/// callers can exercise the aggregator's failure accounting.
#[derive(Debug)]
pub struct MockAdapter {
	provider: BridgeProvider,
	name: String,
	pairs: Vec<(ChainId, ChainId)>,
	routes: Vec<BridgeRoute>,
	delay: Option<Duration>,
	failure: Option<AdapterError>,
	healthy: bool,
	calls: AtomicUsize,
}

impl MockAdapter {
	pub fn new(provider: BridgeProvider) -> Self {
		Self {
			provider,
			name: format!("Mock {}", provider.display_name()),
			pairs: Vec::new(),
			routes: Vec::new(),
			delay: None,
			failure: None,
			healthy: true,
			calls: AtomicUsize::new(0),
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_pair(mut self, source: ChainId, target: ChainId) -> Self {
		self.pairs.push((source, target));
		self
	}

	/// Support every distinct ordered pair of the given chains
	pub fn with_all_pairs(mut self, chains: &[ChainId]) -> Self {
		for source in chains {
			for target in chains {
				if source != target {
					self.pairs.push((*source, *target));
				}
			}
		}
		self
	}

	pub fn with_route(mut self, route: BridgeRoute) -> Self {
		self.routes.push(route);
		self
	}

	pub fn with_delay(mut self, delay: Duration) -> Self {
		self.delay = Some(delay);
		self
	}

	pub fn with_failure(mut self, error: AdapterError) -> Self {
		self.failure = Some(error);
		self
	}

	pub fn unhealthy(mut self) -> Self {
		self.healthy = false;
		self
	}

	/// Number of `fetch_routes` calls made so far
	pub fn call_count(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl BridgeAdapter for MockAdapter {
	fn provider(&self) -> BridgeProvider {
		self.provider
	}

	fn name(&self) -> &str {
		&self.name
	}

	fn supports_chain_pair(&self, source: ChainId, target: ChainId) -> bool {
		self.pairs.contains(&(source, target))
	}

	async fn fetch_routes(&self, request: &RouteRequest) -> AdapterResult<Vec<BridgeRoute>> {
		self.calls.fetch_add(1, Ordering::SeqCst);
		debug!("{} serving {}", self.name, request.pair_label());

		if let Some(delay) = self.delay {
			tokio::time::sleep(delay).await;
		}
		if let Some(error) = &self.failure {
			return Err(error.clone());
		}
		if !self.supports_chain_pair(request.source_chain, request.target_chain) {
			return Ok(Vec::new());
		}

		Ok(self
			.routes
			.iter()
			.filter(|route| {
				route.source_chain == request.source_chain && route.target_chain == request.target_chain
			})
			.cloned()
			.collect())
	}

	async fn health_check(&self) -> AdapterResult<bool> {
		Ok(self.healthy)
	}
}
