//! Core adapter trait implemented once per bridge provider

use async_trait::async_trait;
use std::fmt::Debug;

use super::AdapterResult;
use crate::models::{BridgeProvider, ChainId};
use crate::routes::{BridgeRoute, RouteRequest};

/// Core trait for bridge adapter implementations
///
/// An adapter translates a generic [`RouteRequest`] into provider-specific
/// calls and reshapes the answer into [`BridgeRoute`]s. "No route" is never
/// an error: unsupported pairs, empty quotes and malformed payloads all
/// produce an empty list.
#[async_trait]
pub trait BridgeAdapter: Send + Sync + Debug {
	/// Provider this adapter speaks for
	fn provider(&self) -> BridgeProvider;

	/// Human-readable name for this adapter
	fn name(&self) -> &str {
		self.provider().display_name()
	}

	/// Whether the provider can move funds from `source` to `target`
	///
	/// Must be pure; the aggregator calls it before any I/O.
	fn supports_chain_pair(&self, source: ChainId, target: ChainId) -> bool;

	/// Every ordered chain pair this adapter supports
	fn supported_chain_pairs(&self) -> Vec<(ChainId, ChainId)> {
		ChainId::ALL
			.iter()
			.flat_map(|source| ChainId::ALL.iter().map(move |target| (*source, *target)))
			.filter(|(source, target)| source != target && self.supports_chain_pair(*source, *target))
			.collect()
	}

	/// Fetch routes for the request
	async fn fetch_routes(&self, request: &RouteRequest) -> AdapterResult<Vec<BridgeRoute>>;

	/// Health check for the provider
	async fn health_check(&self) -> AdapterResult<bool> {
		Ok(true)
	}
}
