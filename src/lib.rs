//! Bridge Route Aggregator Library
//!
//! Discovers, normalizes, ranks and validates transfer routes across
//! cross-chain bridge providers.

use bridge_adapters::{
	AdapterEndpoints, AdapterRegistry, BridgeTransport, ProviderEndpoint,
};
use bridge_config::{ConfigLoadError, ConfigValidationError, LogFormat, LoggingSettings};
use bridge_service::{
	AggregatorConfig, CompatibilityConfig, CompatibilityEngine, ExecutionValidator,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

// Core domain types
pub use bridge_types::{
	chrono, serde_json, AdapterError, AggregatedRoutes, Amount, BridgeAdapter, BridgeProvider,
	BridgeRoute, ChainId, ExecutionContext, NormalizedRoute, NormalizedToken, ProviderFailure,
	RankingWeights, RouteHop, RouteRequest, TokenMappingEntry, TokenPair, TokenRef,
	ValidationError, ValidationErrorCode, ValidationResult, WeightsError, WeightsUpdate,
};

// Service layer
pub use bridge_service::{
	AggregationOptions, BridgeStatus, CompatibilityRequest, CompatibleRoute,
	CompatibleRoutesResult, RouteAggregator, RouteRanker, RouteScore,
};

// Storage layer
pub use bridge_storage::{LiquiditySnapshot, LiquidityStore, MemoryStore, SnapshotKey};

// Config
pub use bridge_config::{load_config, load_config_from, Settings};

pub mod types {
	pub use bridge_types::*;
}
pub mod adapters {
	pub use bridge_adapters::*;
}
pub mod storage {
	pub use bridge_storage::*;
}
pub mod config {
	pub use bridge_config::*;
}
pub mod service {
	pub use bridge_service::*;
}

pub use async_trait;

#[derive(Debug, Error)]
pub enum BuildError {
	#[error(transparent)]
	Config(#[from] ConfigLoadError),

	#[error("Invalid settings: {0}")]
	Validation(#[from] ConfigValidationError),

	#[error("Adapter setup failed: {0}")]
	Adapter(#[from] AdapterError),

	#[error("Invalid ranking weights: {0}")]
	Weights(#[from] WeightsError),

	#[error("Failed to initialize tracing: {0}")]
	Tracing(String),
}

/// Fully wired services
#[derive(Debug, Clone)]
pub struct BridgeAggregator {
	pub settings: Settings,
	pub registry: Arc<AdapterRegistry>,
	pub aggregator: Arc<RouteAggregator>,
	pub compatibility: Arc<CompatibilityEngine>,
	pub ranker: RouteRanker,
	pub validator: ExecutionValidator,
	pub liquidity: Arc<dyn LiquidityStore>,
}

impl BridgeAggregator {
	pub async fn get_routes(
		&self,
		request: &RouteRequest,
		options: Option<&AggregationOptions>,
	) -> AggregatedRoutes {
		self.aggregator.get_routes(request, options).await
	}

	/// Pre-validated aggregation with per-route re-validation
	pub async fn get_compatible_routes(
		&self,
		request: &RouteRequest,
		options: Option<&AggregationOptions>,
	) -> CompatibleRoutesResult {
		self.compatibility
			.get_compatible_routes(request, &self.aggregator, options)
			.await
	}

	pub fn validate_execution(
		&self,
		request: &RouteRequest,
		context: &ExecutionContext,
	) -> ValidationResult {
		self.validator.validate_execution_request(request, context)
	}
}

/// Builder wiring settings into adapters and services
pub struct AggregatorBuilder {
	settings: Option<Settings>,
	adapters: Vec<Arc<dyn BridgeAdapter>>,
	transport: Option<Arc<dyn BridgeTransport>>,
	liquidity_store: Option<Arc<dyn LiquidityStore>>,
	network_adapters: bool,
}

impl Default for AggregatorBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl AggregatorBuilder {
	pub fn new() -> Self {
		Self {
			settings: None,
			adapters: Vec::new(),
			transport: None,
			liquidity_store: None,
			network_adapters: true,
		}
	}

	/// Load `.env`, then `config/config.*` and `BRIDGE__*` overrides
	pub fn from_config() -> Result<Self, BuildError> {
		if let Err(e) = dotenvy::dotenv() {
			if !e.not_found() {
				warn!("Failed to load .env: {}", e);
			}
		}
		Ok(Self::new().with_settings(load_config()?))
	}

	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Register an additional adapter; providers must stay unique
	pub fn with_adapter(mut self, adapter: Arc<dyn BridgeAdapter>) -> Self {
		self.adapters.push(adapter);
		self
	}

	/// Share one transport across the network adapters
	pub fn with_transport(mut self, transport: Arc<dyn BridgeTransport>) -> Self {
		self.transport = Some(transport);
		self
	}

	pub fn with_liquidity_store(mut self, store: Arc<dyn LiquidityStore>) -> Self {
		self.liquidity_store = Some(store);
		self
	}

	/// Skip the Hop, LayerZero and Stellar adapters
	pub fn without_network_adapters(mut self) -> Self {
		self.network_adapters = false;
		self
	}

	/// Wire everything without side effects on global state
	pub fn build(self) -> Result<BridgeAggregator, BuildError> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let mut registry = if self.network_adapters {
			let endpoints = endpoints_from_settings(&settings)?;
			match self.transport {
				Some(transport) => AdapterRegistry::with_transport(transport, &endpoints)?,
				None => AdapterRegistry::with_defaults(&endpoints)?,
			}
		} else {
			AdapterRegistry::new()
		};
		for adapter in self.adapters {
			registry.register(adapter)?;
		}
		let registry = Arc::new(registry);

		let liquidity: Arc<dyn LiquidityStore> = self.liquidity_store.unwrap_or_else(|| {
			Arc::new(MemoryStore::with_ttl(settings.liquidity.snapshot_ttl_secs))
		});

		let compatibility = Arc::new(
			CompatibilityEngine::new(compatibility_config(&settings))
				.with_liquidity_store(Arc::clone(&liquidity)),
		);
		let seeded = compatibility.register_registry_pairs(&registry);
		info!("Seeded {} chain pairs from {} adapters", seeded, registry.len());

		let weights = settings.ranking.weights()?;
		let aggregator = Arc::new(
			RouteAggregator::new(
				Arc::clone(&registry),
				AggregatorConfig {
					timeout_ms: settings.aggregation.timeout_ms,
					ranking_weights: weights,
					enabled_providers: settings.aggregation.enabled_providers.clone(),
				},
			)
			.with_compatibility(Arc::clone(&compatibility)),
		);

		Ok(BridgeAggregator {
			settings,
			registry,
			aggregator,
			compatibility,
			ranker: RouteRanker::new(weights),
			validator: ExecutionValidator::new(),
			liquidity,
		})
	}

	/// Initialize tracing, log startup details and build
	///
	/// Without a custom liquidity store, a memory store is created and its
	/// TTL cleanup task is spawned on the current runtime.
	pub async fn start(mut self) -> Result<BridgeAggregator, BuildError> {
		let settings = self.settings.clone().unwrap_or_default();
		init_tracing(&settings.logging)?;
		bridge_config::log_service_info();
		bridge_config::log_settings_summary(&settings);

		if self.liquidity_store.is_none() {
			let store = MemoryStore::with_ttl(settings.liquidity.snapshot_ttl_secs);
			store.start_ttl_cleanup();
			self.liquidity_store = Some(Arc::new(store));
		}

		let bridge = self.build()?;
		bridge_config::log_startup_complete(bridge.registry.len());
		Ok(bridge)
	}
}

/// Install the global tracing subscriber; `RUST_LOG` overrides the level
pub fn init_tracing(logging: &LoggingSettings) -> Result<(), BuildError> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.level));

	let result = match logging.format {
		LogFormat::Json => {
			let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init()
			} else {
				subscriber.try_init()
			}
		},
		LogFormat::Pretty => {
			let subscriber = tracing_subscriber::fmt().pretty().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init()
			} else {
				subscriber.try_init()
			}
		},
		LogFormat::Compact => {
			let subscriber = tracing_subscriber::fmt().compact().with_env_filter(env_filter);
			if logging.structured {
				subscriber.with_target(true).with_thread_ids(true).try_init()
			} else {
				subscriber.try_init()
			}
		},
	};
	result.map_err(|e| BuildError::Tracing(e.to_string()))?;

	info!(
		"Logging configuration applied: level={}, format={:?}, structured={}",
		logging.level, logging.format, logging.structured
	);
	Ok(())
}

/// Endpoints for every enabled network provider
pub fn endpoints_from_settings(settings: &Settings) -> Result<AdapterEndpoints, BuildError> {
	let mut endpoints = AdapterEndpoints::default();
	for provider in settings.providers.enabled() {
		let Some(provider_settings) = settings.providers.get(provider) else {
			continue;
		};
		let mut endpoint =
			ProviderEndpoint::new(provider_settings.endpoint.clone(), provider_settings.timeout_ms);
		for (name, value) in settings.provider_headers(provider)? {
			endpoint = endpoint.with_header(name, value);
		}

		match provider {
			BridgeProvider::Hop => endpoints.hop = Some(endpoint),
			BridgeProvider::LayerZero => endpoints.layerzero = Some(endpoint),
			BridgeProvider::Stellar => endpoints.stellar = Some(endpoint),
			BridgeProvider::Mock => {},
		}
	}
	Ok(endpoints)
}

pub fn compatibility_config(settings: &Settings) -> CompatibilityConfig {
	CompatibilityConfig {
		allow_wrapped_tokens: settings.compatibility.allow_wrapped_tokens,
		suggest_alternatives: settings.compatibility.suggest_alternatives,
		max_alternatives: settings.compatibility.max_alternatives,
		default_liquidity_score: settings.compatibility.default_liquidity_score,
	}
}
