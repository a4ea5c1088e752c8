//! Route aggregation service
//!
//! Fans a request out to every eligible adapter concurrently, bounds each
//! call with its own timeout, then normalizes and ranks whatever arrived.

use bridge_adapters::AdapterRegistry;
use bridge_types::constants::limits::DEFAULT_ADAPTER_TIMEOUT_MS;
use bridge_types::{
	AdapterError, AggregatedRoutes, BridgeAdapter, BridgeProvider, BridgeRoute, NormalizedRoute,
	ProviderFailure, RankingWeights, RouteRequest,
};
use chrono::Utc;
use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::compatibility::CompatibilityEngine;
use crate::normalizer::normalize_routes;
use crate::ranker::RouteRanker;

/// Configuration for the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
	/// Per-adapter timeout in milliseconds
	pub timeout_ms: u64,
	pub ranking_weights: RankingWeights,
	/// Restrict queries to these providers; `None` queries all of them
	pub enabled_providers: Option<Vec<BridgeProvider>>,
}

impl Default for AggregatorConfig {
	fn default() -> Self {
		Self {
			timeout_ms: DEFAULT_ADAPTER_TIMEOUT_MS,
			ranking_weights: RankingWeights::default(),
			enabled_providers: None,
		}
	}
}

/// Per-call overrides of [`AggregatorConfig`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationOptions {
	pub timeout_ms: Option<u64>,
	pub ranking_weights: Option<RankingWeights>,
	pub enabled_providers: Option<Vec<BridgeProvider>>,
}

impl AggregationOptions {
	pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
		self.timeout_ms = Some(timeout_ms);
		self
	}

	pub fn with_weights(mut self, weights: RankingWeights) -> Self {
		self.ranking_weights = Some(weights);
		self
	}

	pub fn with_providers(mut self, providers: Vec<BridgeProvider>) -> Self {
		self.enabled_providers = Some(providers);
		self
	}
}

/// Summary of the aggregator's wiring
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorStats {
	pub total_adapters: usize,
	pub providers: Vec<BridgeProvider>,
	pub timeout_ms: u64,
}

/// Service for aggregating routes from multiple bridge adapters
#[derive(Debug, Clone)]
pub struct RouteAggregator {
	registry: Arc<AdapterRegistry>,
	config: AggregatorConfig,
	compatibility: Option<Arc<CompatibilityEngine>>,
}

impl RouteAggregator {
	pub fn new(registry: Arc<AdapterRegistry>, config: AggregatorConfig) -> Self {
		Self {
			registry,
			config,
			compatibility: None,
		}
	}

	/// Skip providers the engine reports as unavailable or paused
	pub fn with_compatibility(mut self, engine: Arc<CompatibilityEngine>) -> Self {
		self.compatibility = Some(engine);
		self
	}

	pub fn config(&self) -> &AggregatorConfig {
		&self.config
	}

	pub fn registry(&self) -> &Arc<AdapterRegistry> {
		&self.registry
	}

	/// Adapters that would be queried for this request
	fn eligible_adapters(
		&self,
		request: &RouteRequest,
		enabled: Option<&[BridgeProvider]>,
	) -> Vec<Arc<dyn BridgeAdapter>> {
		self.registry
			.supporting(request.source_chain, request.target_chain)
			.into_iter()
			.filter(|adapter| enabled.map_or(true, |list| list.contains(&adapter.provider())))
			.filter(|adapter| {
				self.compatibility
					.as_ref()
					.map_or(true, |engine| engine.bridge_status(adapter.provider()).is_usable())
			})
			.collect()
	}

	/// Fetch, normalize and rank routes from every eligible adapter
	///
	/// Adapter failures and timeouts never fail the call; they are reported
	/// in [`AggregatedRoutes::errors`].
	pub async fn get_routes(
		&self,
		request: &RouteRequest,
		options: Option<&AggregationOptions>,
	) -> AggregatedRoutes {
		let timeout_ms = options
			.and_then(|o| o.timeout_ms)
			.unwrap_or(self.config.timeout_ms);
		let weights = options
			.and_then(|o| o.ranking_weights)
			.unwrap_or(self.config.ranking_weights);
		let enabled = options
			.and_then(|o| o.enabled_providers.as_deref())
			.or(self.config.enabled_providers.as_deref());

		let aggregation_id = Uuid::new_v4();
		let adapters = self.eligible_adapters(request, enabled);

		if adapters.is_empty() {
			info!(
				"Aggregation {}: no adapters support {}",
				aggregation_id,
				request.pair_label()
			);
			return AggregatedRoutes::empty();
		}

		info!(
			"Aggregation {}: fetching routes for {} from {} adapters",
			aggregation_id,
			request.pair_label(),
			adapters.len()
		);

		let providers: Vec<BridgeProvider> = adapters.iter().map(|a| a.provider()).collect();
		let tasks: Vec<_> = adapters
			.into_iter()
			.map(|adapter| {
				let request = request.clone();
				tokio::spawn(async move {
					debug!("Fetching routes from adapter {}", adapter.name());
					match timeout(Duration::from_millis(timeout_ms), adapter.fetch_routes(&request)).await
					{
						Ok(result) => result,
						Err(_) => Err(AdapterError::Timeout { timeout_ms }),
					}
				})
			})
			.collect();

		let results = join_all(tasks).await;

		let mut routes: Vec<BridgeRoute> = Vec::new();
		let mut errors: Vec<ProviderFailure> = Vec::new();
		let mut providers_responded = 0;

		for (provider, joined) in providers.iter().zip(results) {
			match joined {
				Ok(Ok(provider_routes)) => {
					debug!("Adapter {} returned {} routes", provider, provider_routes.len());
					providers_responded += 1;
					routes.extend(provider_routes);
				},
				Ok(Err(e)) => {
					warn!("Adapter {} returned error: {}", provider, e);
					errors.push(ProviderFailure {
						provider: *provider,
						message: e.to_string(),
						code: Some(e.code().to_string()),
					});
				},
				Err(e) => {
					warn!("Adapter {} task failed: {}", provider, e);
					errors.push(ProviderFailure {
						provider: *provider,
						message: format!("Adapter task failed: {}", e),
						code: Some("TASK_FAILED".to_string()),
					});
				},
			}
		}

		let ranked = RouteRanker::new(weights).rank_routes(normalize_routes(routes));

		info!(
			"Aggregation {} completed: {} routes from {}/{} adapters",
			aggregation_id,
			ranked.len(),
			providers_responded,
			providers.len()
		);

		AggregatedRoutes {
			routes: ranked,
			timestamp: Utc::now(),
			providers_queried: providers.len(),
			providers_responded,
			errors,
		}
	}

	/// Best-ranked route for the request, if any adapter produced one
	pub async fn best_route(&self, request: &RouteRequest) -> Option<NormalizedRoute> {
		self.get_routes(request, None).await.routes.into_iter().next()
	}

	/// Health check all registered adapters; errors and timeouts read as unhealthy
	pub async fn health_check_all(&self) -> HashMap<BridgeProvider, bool> {
		let timeout_ms = self.config.timeout_ms;
		let checks = self.registry.all().iter().map(|adapter| {
			let adapter = Arc::clone(adapter);
			async move {
				let healthy =
					match timeout(Duration::from_millis(timeout_ms), adapter.health_check()).await {
						Ok(Ok(healthy)) => healthy,
						Ok(Err(e)) => {
							warn!("Health check for {} failed: {}", adapter.provider(), e);
							false
						},
						Err(_) => {
							warn!("Health check for {} timed out", adapter.provider());
							false
						},
					};
				(adapter.provider(), healthy)
			}
		});

		join_all(checks).await.into_iter().collect()
	}

	pub fn stats(&self) -> AggregatorStats {
		AggregatorStats {
			total_adapters: self.registry.len(),
			providers: self.registry.providers(),
			timeout_ms: self.config.timeout_ms,
		}
	}
}
