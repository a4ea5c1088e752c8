//! Bridge Adapters
//!
//! Provider-specific adapters for the bridge route aggregator, plus the
//! registry the aggregator fans out over.

pub mod hop_adapter;
pub mod layerzero_adapter;
pub mod mock_adapter;
pub mod payload;
pub mod stellar_adapter;
pub mod transport;

pub use bridge_types::{AdapterError, AdapterResult, BridgeAdapter};
pub use hop_adapter::HopAdapter;
pub use layerzero_adapter::LayerZeroAdapter;
pub use mock_adapter::MockAdapter;
pub use stellar_adapter::StellarBridgeAdapter;
pub use transport::{BridgeTransport, HttpTransport, ProviderEndpoint};

use bridge_types::{BridgeProvider, ChainId};
use std::sync::Arc;
use tracing::info;

/// Endpoints for the network adapters; `None` leaves a provider out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdapterEndpoints {
	pub hop: Option<ProviderEndpoint>,
	pub layerzero: Option<ProviderEndpoint>,
	pub stellar: Option<ProviderEndpoint>,
}

/// Registry mapping each provider to exactly one adapter
#[derive(Debug, Clone, Default)]
pub struct AdapterRegistry {
	adapters: Vec<Arc<dyn BridgeAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build the network adapters, each with its own HTTP client
	pub fn with_defaults(endpoints: &AdapterEndpoints) -> AdapterResult<Self> {
		let mut registry = Self::new();
		if let Some(endpoint) = &endpoints.hop {
			registry.register(Arc::new(HopAdapter::with_http(endpoint.clone())?))?;
		}
		if let Some(endpoint) = &endpoints.layerzero {
			registry.register(Arc::new(LayerZeroAdapter::with_http(endpoint.clone())?))?;
		}
		if let Some(endpoint) = &endpoints.stellar {
			registry.register(Arc::new(StellarBridgeAdapter::with_http(endpoint.clone())?))?;
		}
		Ok(registry)
	}

	/// Build the network adapters over a shared transport
	pub fn with_transport(
		transport: Arc<dyn BridgeTransport>,
		endpoints: &AdapterEndpoints,
	) -> AdapterResult<Self> {
		let mut registry = Self::new();
		if let Some(endpoint) = &endpoints.hop {
			registry.register(Arc::new(HopAdapter::new(endpoint.clone(), transport.clone())))?;
		}
		if let Some(endpoint) = &endpoints.layerzero {
			registry.register(Arc::new(LayerZeroAdapter::new(
				endpoint.clone(),
				transport.clone(),
			)))?;
		}
		if let Some(endpoint) = &endpoints.stellar {
			registry.register(Arc::new(StellarBridgeAdapter::new(
				endpoint.clone(),
				transport,
			)))?;
		}
		Ok(registry)
	}

	/// Register an adapter; a second adapter for the same provider is rejected
	pub fn register(&mut self, adapter: Arc<dyn BridgeAdapter>) -> AdapterResult<()> {
		let provider = adapter.provider();
		if self.get(provider).is_some() {
			return Err(AdapterError::AlreadyRegistered { provider });
		}
		info!("Registered adapter {} ({})", adapter.name(), provider);
		self.adapters.push(adapter);
		Ok(())
	}

	pub fn get(&self, provider: BridgeProvider) -> Option<Arc<dyn BridgeAdapter>> {
		self.adapters
			.iter()
			.find(|adapter| adapter.provider() == provider)
			.cloned()
	}

	pub fn all(&self) -> &[Arc<dyn BridgeAdapter>] {
		&self.adapters
	}

	pub fn providers(&self) -> Vec<BridgeProvider> {
		self.adapters.iter().map(|adapter| adapter.provider()).collect()
	}

	/// Adapters that can serve `source -> target`
	pub fn supporting(&self, source: ChainId, target: ChainId) -> Vec<Arc<dyn BridgeAdapter>> {
		self.adapters
			.iter()
			.filter(|adapter| adapter.supports_chain_pair(source, target))
			.cloned()
			.collect()
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}
