//! Route-level compatibility: pre-validation, local route discovery and
//! validated aggregation

use bridge_storage::SnapshotKey;
use bridge_types::{
	estimate_fees, estimate_latency, is_valid_amount, AggregatedRoutes, Amount, BridgeProvider,
	NormalizedRoute, RouteRequest, TokenMappingEntry, ValidationError,
	ValidationErrorCode, ValidationResult,
};
use bridge_types::constants::limits::DEFAULT_SLIPPAGE_PERCENT;
use serde_json::json;
use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::engine::CompatibilityEngine;
use super::types::{CompatibilityRequest, CompatibleRoute, CompatibleRoutesResult, RejectedRoute};
use crate::aggregator::{AggregationOptions, RouteAggregator};

/// On-chain operations charged for a local fee estimate: lock and release
const ESTIMATE_OP_COUNT: u32 = 2;

impl CompatibilityEngine {
	/// Cheap checks run before any adapter is queried
	///
	/// Liquidity is only consulted when a token is named and every usable
	/// provider has a snapshot for it.
	pub async fn pre_validate_route(&self, request: &RouteRequest) -> ValidationResult {
		let mut result = ValidationResult::valid();
		let (source, target) = (request.source_chain, request.target_chain);

		if source == target {
			result.push(
				ValidationError::new(ValidationErrorCode::UnsupportedChainPair, "targetChain")
					.with_message(format!("Source and destination are both {}", source)),
			);
		}

		if request.asset_amount.is_zero() {
			result.push(
				ValidationError::new(ValidationErrorCode::InvalidAmount, "assetAmount")
					.with_message("Amount must be greater than zero"),
			);
		} else if !is_valid_amount(&request.asset_amount, !source.is_evm()) {
			result.push(
				ValidationError::new(ValidationErrorCode::AmountTooLow, "assetAmount")
					.with_message(format!(
						"Amount {} is below the dust threshold for {}",
						request.asset_amount, source
					)),
			);
		}

		let supporting: Vec<BridgeProvider> = BridgeProvider::ALL
			.into_iter()
			.filter(|p| self.supports_chain_pair(*p, source, target))
			.collect();
		let usable: Vec<BridgeProvider> = supporting
			.iter()
			.copied()
			.filter(|p| self.bridge_status(*p).is_usable())
			.collect();

		if source != target && supporting.is_empty() {
			result.push(
				ValidationError::new(ValidationErrorCode::RouteNotSupported, "targetChain")
					.with_message(format!("No bridge supports {} -> {}", source, target)),
			);
		} else if !supporting.is_empty() && usable.is_empty() {
			let all_paused = supporting
				.iter()
				.all(|p| self.bridge_status(*p).available);
			let code = if all_paused {
				ValidationErrorCode::BridgePaused
			} else {
				ValidationErrorCode::BridgeUnavailable
			};
			let names: Vec<&str> = supporting.iter().map(|p| p.as_str()).collect();
			result.push(
				ValidationError::new(code, "provider")
					.with_message(format!(
						"Every bridge for {} -> {} is out of service",
						source, target
					))
					.with_context(json!({ "providers": names })),
			);
		}

		if let Some(identifier) = &request.token_address {
			match self.get_token(source, identifier) {
				None => result.push(
					ValidationError::new(ValidationErrorCode::TokenNotRegistered, "tokenAddress")
						.with_message(format!("Token {} is not registered on {}", identifier, source)),
				),
				Some(token) if !usable.is_empty() => {
					let mappings: Vec<TokenMappingEntry> = usable
						.iter()
						.flat_map(|p| self.active_mappings_from(source, target, *p, identifier))
						.collect();
					if let Some(finding) = bounds_finding(&mappings, &request.asset_amount) {
						result.push(finding);
					}
					let keys: Vec<SnapshotKey> = usable
						.iter()
						.map(|p| SnapshotKey::new(*p, source, target, &token.address))
						.collect();
					if let Some(finding) = self.liquidity_finding(&keys, &request.asset_amount).await {
						result.push(finding);
					}
				},
				Some(_) => {},
			}
		}

		result
	}

	/// Routes the local registries can satisfy, best priority first
	///
	/// Nothing is fetched from providers; estimates come from the local fee
	/// and latency models.
	pub async fn find_compatible_routes(&self, request: &CompatibilityRequest) -> Vec<CompatibleRoute> {
		let Some(source_token) = self.get_token(request.source_chain, &request.source_token) else {
			debug!(
				"Source token {} not registered on {}",
				request.source_token, request.source_chain
			);
			return Vec::new();
		};
		let destination_token = match &request.destination_token {
			Some(identifier) => match self.get_token(request.destination_chain, identifier) {
				Some(token) => Some(token),
				None => return Vec::new(),
			},
			None => None,
		};

		let candidates = request
			.providers
			.clone()
			.unwrap_or_else(|| BridgeProvider::ALL.to_vec());
		let slippage = request.slippage_percent.unwrap_or(DEFAULT_SLIPPAGE_PERCENT);

		let mut routes = Vec::new();
		for provider in candidates {
			if !self.provider_usable(provider, request.source_chain, request.destination_chain) {
				continue;
			}

			let mapping = match &destination_token {
				Some(destination) => self.find_mapping(provider, &source_token, destination),
				None => self.get_mapping(
					request.source_chain,
					request.destination_chain,
					provider,
					&source_token.address,
				),
			};
			let Some(mapping) = mapping else {
				continue;
			};
			if !mapping.accepts_amount(&request.amount) {
				debug!(
					"{} mapping rejects amount {} (bounds {}..={})",
					provider, request.amount, mapping.min_amount, mapping.max_amount
				);
				continue;
			}

			let key = SnapshotKey::new(
				provider,
				request.source_chain,
				request.destination_chain,
				&source_token.address,
			);
			let liquidity_score = match self.liquidity_snapshot(&key).await {
				Some((available, _)) if available < request.amount => {
					debug!("{} lacks liquidity for {} ({} available)", key, request.amount, available);
					continue;
				},
				Some((_, score)) => score,
				None => self.config.default_liquidity_score,
			};

			let fee_estimate = estimate_fees(
				&request.amount,
				!request.source_chain.is_evm(),
				slippage,
				ESTIMATE_OP_COUNT,
			);
			let latency_estimate = estimate_latency(
				request.source_chain,
				request.destination_chain,
				1.0 - liquidity_score,
			);

			routes.push(CompatibleRoute {
				provider,
				priority: f64::from(provider.preference_rank()) + (1.0 - liquidity_score),
				liquidity_score,
				fee_estimate,
				latency_estimate,
				mapping,
			});
		}

		routes.sort_by(|a, b| match a.priority.total_cmp(&b.priority) {
			Ordering::Equal => a.provider.preference_rank().cmp(&b.provider.preference_rank()),
			other => other,
		});
		routes
	}

	/// Available liquidity and score, if the store holds a snapshot
	async fn liquidity_snapshot(&self, key: &SnapshotKey) -> Option<(Amount, f64)> {
		let store = self.liquidity.as_ref()?;
		match store.get_snapshot(key).await {
			Ok(snapshot) => snapshot.map(|s| (s.available_liquidity, s.score)),
			Err(e) => {
				warn!("Liquidity lookup for {} failed: {}", key, e);
				None
			},
		}
	}

	/// `InsufficientLiquidity` when every key has a snapshot below `amount`
	async fn liquidity_finding(&self, keys: &[SnapshotKey], amount: &Amount) -> Option<ValidationError> {
		if keys.is_empty() {
			return None;
		}
		let mut best: Option<Amount> = None;
		for key in keys {
			let (available, _) = self.liquidity_snapshot(key).await?;
			if available >= *amount {
				return None;
			}
			if best.as_ref().map_or(true, |b| available > *b) {
				best = Some(available);
			}
		}
		let available = best?;
		Some(
			ValidationError::new(ValidationErrorCode::InsufficientLiquidity, "assetAmount")
				.with_message(format!(
					"Amount {} exceeds the largest available pool of {}",
					amount, available
				))
				.with_context(json!({ "available": available, "required": amount })),
		)
	}

	/// Re-check an aggregated route against current registry state
	pub async fn revalidate_route(&self, route: &NormalizedRoute, request: &RouteRequest) -> ValidationResult {
		let mut result = ValidationResult::valid();
		let provider = route.adapter;

		if route.source_chain != request.source_chain
			|| route.destination_chain != request.target_chain
		{
			result.push(
				ValidationError::new(ValidationErrorCode::RouteMismatch, "route")
					.with_message(format!(
						"Route {} goes {} -> {}, request asked for {} -> {}",
						route.id,
						route.source_chain,
						route.destination_chain,
						request.source_chain,
						request.target_chain
					)),
			);
		}

		let status = self.bridge_status(provider);
		if !status.is_usable() {
			let code = if status.available {
				ValidationErrorCode::BridgePaused
			} else {
				ValidationErrorCode::BridgeUnavailable
			};
			result.push(
				ValidationError::new(code, "provider")
					.with_message(format!("{} is out of service", provider.display_name())),
			);
		}

		if !self.supports_chain_pair(provider, route.source_chain, route.destination_chain) {
			result.push(
				ValidationError::new(ValidationErrorCode::UnsupportedChainPair, "route")
					.with_message(format!(
						"{} is not registered for {} -> {}",
						provider.display_name(),
						route.source_chain,
						route.destination_chain
					)),
			);
		}

		if let Some(token) = &request.token_address {
			let mappings =
				self.active_mappings_from(route.source_chain, route.destination_chain, provider, token);
			if mappings.is_empty() {
				result.push(
					ValidationError::new(ValidationErrorCode::UnsupportedTokenPair, "tokenAddress")
						.with_message(format!(
							"{} has no active mapping for {}",
							provider.display_name(),
							token
						)),
				);
			} else if let Some(finding) = bounds_finding(&mappings, &route.input_amount) {
				result.push(finding);
			}

			if let Some(token) = self.get_token(route.source_chain, token) {
				let key =
					SnapshotKey::new(provider, route.source_chain, route.destination_chain, &token.address);
				if let Some(finding) = self.liquidity_finding(&[key], &route.input_amount).await {
					result.push(finding);
				}
			}
		}

		result
	}

	/// Pre-validate, aggregate, then drop routes that fail re-validation
	pub async fn get_compatible_routes(
		&self,
		request: &RouteRequest,
		aggregator: &RouteAggregator,
		options: Option<&AggregationOptions>,
	) -> CompatibleRoutesResult {
		let mut validation = self.pre_validate_route(request).await;
		if !validation.is_valid {
			info!(
				"Pre-validation rejected {}: {:?}",
				request.pair_label(),
				validation.error_codes()
			);
			return CompatibleRoutesResult {
				validation,
				routes: AggregatedRoutes::empty(),
				rejected: Vec::new(),
			};
		}

		let mut routes = aggregator.get_routes(request, options).await;
		let mut rejected = Vec::new();
		let mut kept = Vec::with_capacity(routes.routes.len());

		for route in routes.routes {
			let findings = self.revalidate_route(&route, request).await;
			if findings.is_valid {
				validation.warnings.extend(findings.warnings);
				kept.push(route);
			} else {
				debug!("Dropping route {}: {:?}", route.id, findings.error_codes());
				rejected.push(RejectedRoute {
					route_id: route.id,
					provider: route.adapter,
					errors: findings.errors,
				});
			}
		}
		routes.routes = kept;

		if routes.routes.is_empty() && !rejected.is_empty() {
			validation.push(
				ValidationError::new(ValidationErrorCode::ValidationFailed, "routes").with_message(
					format!("All {} aggregated routes failed re-validation", rejected.len()),
				),
			);
		}

		CompatibleRoutesResult {
			validation,
			routes,
			rejected,
		}
	}
}

/// Amount-bounds finding when no mapping accepts `amount`
fn bounds_finding(mappings: &[TokenMappingEntry], amount: &Amount) -> Option<ValidationError> {
	if mappings.is_empty() || mappings.iter().any(|m| m.accepts_amount(amount)) {
		return None;
	}

	let min = mappings.iter().map(|m| &m.min_amount).min()?;
	if amount < min {
		return Some(
			ValidationError::new(ValidationErrorCode::AmountTooLow, "assetAmount")
				.with_message(format!("Amount {} is below the minimum {}", amount, min))
				.with_context(json!({ "minAmount": min })),
		);
	}

	let max = mappings.iter().map(|m| &m.max_amount).max()?;
	Some(
		ValidationError::new(ValidationErrorCode::AmountTooHigh, "assetAmount")
			.with_message(format!("Amount {} exceeds the maximum {}", amount, max))
			.with_context(json!({ "maxAmount": max })),
	)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::aggregator::AggregatorConfig;
	use crate::compatibility::{BridgeStatus, CompatibilityConfig};
	use bridge_adapters::{AdapterRegistry, MockAdapter};
	use bridge_storage::{LiquiditySnapshot, LiquidityStore, MemoryStore};
	use bridge_types::{BridgeRoute, ChainId, NormalizedToken};
	use std::sync::Arc;

	const MIN: u64 = 2_000_000_000_000;
	const MAX: u64 = 1_000_000_000_000_000;

	fn mapping(provider: BridgeProvider) -> TokenMappingEntry {
		TokenMappingEntry::new(
			NormalizedToken::usdc_ethereum(),
			NormalizedToken::usdc_polygon(),
			provider,
			Amount::from(MIN),
			Amount::from(MAX),
		)
	}

	fn engine() -> CompatibilityEngine {
		let engine = CompatibilityEngine::new(CompatibilityConfig::default());
		engine.register_token(NormalizedToken::usdc_ethereum()).unwrap();
		engine.register_token(NormalizedToken::usdc_polygon()).unwrap();
		for provider in [BridgeProvider::Hop, BridgeProvider::LayerZero] {
			engine.register_chain_pair(provider, ChainId::Ethereum, ChainId::Polygon);
			engine.register_token_mapping(mapping(provider)).unwrap();
		}
		engine
	}

	fn request(amount: u64) -> RouteRequest {
		RouteRequest::new(ChainId::Ethereum, ChainId::Polygon, Amount::from(amount)).with_token("USDC")
	}

	#[tokio::test]
	async fn test_pre_validation_passes_for_known_route() {
		let result = engine().pre_validate_route(&request(MIN * 10)).await;
		assert!(result.is_valid, "{:?}", result.errors);
	}

	#[tokio::test]
	async fn test_pre_validation_accumulates() {
		let engine = engine();
		let same_chain = RouteRequest::new(ChainId::Ethereum, ChainId::Ethereum, Amount::zero());
		let codes = engine.pre_validate_route(&same_chain).await.error_codes();
		assert!(codes.contains(&ValidationErrorCode::UnsupportedChainPair));
		assert!(codes.contains(&ValidationErrorCode::InvalidAmount));

		let unknown = RouteRequest::new(ChainId::Stellar, ChainId::Base, Amount::from(10u64)).with_token("DOGE");
		let codes = engine.pre_validate_route(&unknown).await.error_codes();
		assert!(codes.contains(&ValidationErrorCode::AmountTooLow));
		assert!(codes.contains(&ValidationErrorCode::RouteNotSupported));
		assert!(codes.contains(&ValidationErrorCode::TokenNotRegistered));
	}

	#[tokio::test]
	async fn test_pre_validation_amount_bounds() {
		let engine = engine();
		let too_low = engine.pre_validate_route(&request(MIN - 1)).await;
		assert_eq!(too_low.error_codes(), vec![ValidationErrorCode::AmountTooLow]);

		let too_high = engine.pre_validate_route(&request(MAX + 1)).await;
		assert_eq!(too_high.error_codes(), vec![ValidationErrorCode::AmountTooHigh]);
	}

	#[tokio::test]
	async fn test_pre_validation_when_all_bridges_paused() {
		let engine = engine();
		engine.set_bridge_status(BridgeProvider::Hop, BridgeStatus::paused("upgrade"));
		engine.set_bridge_status(BridgeProvider::LayerZero, BridgeStatus::paused("upgrade"));
		let result = engine.pre_validate_route(&request(MIN * 10)).await;
		assert_eq!(result.error_codes(), vec![ValidationErrorCode::BridgePaused]);

		engine.set_bridge_status(BridgeProvider::Hop, BridgeStatus::unavailable("outage"));
		let result = engine.pre_validate_route(&request(MIN * 10)).await;
		assert_eq!(result.error_codes(), vec![ValidationErrorCode::BridgeUnavailable]);
	}

	async fn liquidity(pools: &[(BridgeProvider, u64)]) -> Arc<MemoryStore> {
		let store = Arc::new(MemoryStore::new());
		for (provider, available) in pools {
			let key = SnapshotKey::new(
				*provider,
				ChainId::Ethereum,
				ChainId::Polygon,
				&NormalizedToken::usdc_ethereum().address,
			);
			store
				.put_snapshot(LiquiditySnapshot::new(key, Amount::from(*available), 0.9))
				.await
				.unwrap();
		}
		store
	}

	#[tokio::test]
	async fn test_pre_validation_reports_insufficient_liquidity() {
		let amount = MIN * 10;
		let short = liquidity(&[(BridgeProvider::Hop, MIN), (BridgeProvider::LayerZero, MIN * 2)]).await;
		let result = engine().with_liquidity_store(short).pre_validate_route(&request(amount)).await;
		assert_eq!(result.error_codes(), vec![ValidationErrorCode::InsufficientLiquidity]);
		assert_eq!(result.errors[0].field, "assetAmount");
		assert!(result.errors[0].context.is_some());

		// One pool deep enough is sufficient
		let mixed = liquidity(&[(BridgeProvider::Hop, MIN), (BridgeProvider::LayerZero, MAX)]).await;
		let result = engine().with_liquidity_store(mixed).pre_validate_route(&request(amount)).await;
		assert!(result.is_valid, "{:?}", result.errors);

		// A provider without a snapshot is not assumed short
		let partial = liquidity(&[(BridgeProvider::Hop, MIN)]).await;
		let result = engine().with_liquidity_store(partial).pre_validate_route(&request(amount)).await;
		assert!(result.is_valid, "{:?}", result.errors);
	}

	#[tokio::test]
	async fn test_compatible_routes_ordered_by_priority() {
		let engine = engine();
		let routes = engine
			.find_compatible_routes(
				&CompatibilityRequest::new(ChainId::Ethereum, ChainId::Polygon, "USDC", Amount::from(MIN * 10))
					.with_destination_token("USDC"),
			)
			.await;

		assert_eq!(routes.len(), 2);
		assert_eq!(routes[0].provider, BridgeProvider::LayerZero);
		assert_eq!(routes[0].priority, 0.5);
		assert_eq!(routes[1].priority, 1.5);
		assert!(routes[0].fee_estimate.fee_percentage > 0.0);
		assert!(routes[0].latency_estimate.estimated_seconds > 0);
	}

	#[tokio::test]
	async fn test_liquidity_snapshots_shape_priority() {
		let store = Arc::new(MemoryStore::new());
		let amount = Amount::from(MIN * 10);
		store
			.put_snapshot(LiquiditySnapshot::new(
				SnapshotKey::new(
					BridgeProvider::Hop,
					ChainId::Ethereum,
					ChainId::Polygon,
					&NormalizedToken::usdc_ethereum().address,
				),
				Amount::from(MAX),
				1.0,
			))
			.await
			.unwrap();
		store
			.put_snapshot(LiquiditySnapshot::new(
				SnapshotKey::new(
					BridgeProvider::LayerZero,
					ChainId::Ethereum,
					ChainId::Polygon,
					&NormalizedToken::usdc_ethereum().address,
				),
				Amount::from(1u64),
				0.9,
			))
			.await
			.unwrap();

		let engine = engine().with_liquidity_store(store);
		let routes = engine
			.find_compatible_routes(&CompatibilityRequest::new(
				ChainId::Ethereum,
				ChainId::Polygon,
				"USDC",
				amount,
			))
			.await;

		// LayerZero's pool cannot cover the amount
		assert_eq!(routes.len(), 1);
		assert_eq!(routes[0].provider, BridgeProvider::Hop);
		assert_eq!(routes[0].liquidity_score, 1.0);
		assert_eq!(routes[0].priority, 1.0);
	}

	#[tokio::test]
	async fn test_compatible_routes_respect_bounds_and_status() {
		let engine = engine();
		engine.set_bridge_status(BridgeProvider::LayerZero, BridgeStatus::unavailable("outage"));

		let in_bounds = CompatibilityRequest::new(ChainId::Ethereum, ChainId::Polygon, "USDC", Amount::from(MIN))
			.with_providers(vec![BridgeProvider::Hop, BridgeProvider::LayerZero]);
		let routes = engine.find_compatible_routes(&in_bounds).await;
		assert_eq!(routes.len(), 1);
		assert_eq!(routes[0].provider, BridgeProvider::Hop);

		let too_large =
			CompatibilityRequest::new(ChainId::Ethereum, ChainId::Polygon, "USDC", Amount::from(MAX + 1));
		assert!(engine.find_compatible_routes(&too_large).await.is_empty());

		let unknown = CompatibilityRequest::new(ChainId::Ethereum, ChainId::Polygon, "DOGE", Amount::from(MIN));
		assert!(engine.find_compatible_routes(&unknown).await.is_empty());
	}

	fn mock(provider: BridgeProvider) -> MockAdapter {
		let route = BridgeRoute::from_amounts(
			format!("{}-route", provider),
			provider,
			ChainId::Ethereum,
			ChainId::Polygon,
			Amount::from(MIN * 10),
			Amount::from(MIN * 10 - MIN / 100),
		)
		.unwrap()
		.with_estimated_time(120);
		MockAdapter::new(provider)
			.with_pair(ChainId::Ethereum, ChainId::Polygon)
			.with_route(route)
	}

	#[tokio::test]
	async fn test_get_compatible_routes_drops_unmapped_providers() {
		let mut registry = AdapterRegistry::new();
		for provider in [BridgeProvider::Hop, BridgeProvider::LayerZero, BridgeProvider::Mock] {
			registry.register(Arc::new(mock(provider))).unwrap();
		}
		let registry = Arc::new(registry);

		let engine = engine();
		engine.register_registry_pairs(&registry);
		let aggregator = RouteAggregator::new(registry, AggregatorConfig::default());

		let result = engine
			.get_compatible_routes(&request(MIN * 10), &aggregator, None)
			.await;

		assert!(result.validation.is_valid);
		assert_eq!(result.routes.providers_queried, 3);
		assert_eq!(result.routes.routes.len(), 2);
		assert_eq!(result.rejected.len(), 1);
		assert_eq!(result.rejected[0].provider, BridgeProvider::Mock);
		assert_eq!(
			result.rejected[0].errors[0].code,
			ValidationErrorCode::UnsupportedTokenPair
		);
	}

	#[tokio::test]
	async fn test_get_compatible_routes_stops_on_failed_pre_validation() {
		let mock = Arc::new(mock(BridgeProvider::Hop));
		let mut registry = AdapterRegistry::new();
		registry.register(mock.clone()).unwrap();
		let aggregator = RouteAggregator::new(Arc::new(registry), AggregatorConfig::default());

		let result = engine()
			.get_compatible_routes(&request(MIN - 1), &aggregator, None)
			.await;

		assert!(!result.validation.is_valid);
		assert!(result.routes.routes.is_empty());
		assert_eq!(result.routes.providers_queried, 0);
		assert_eq!(mock.call_count(), 0);
	}

	#[tokio::test]
	async fn test_revalidation_rejects_route_with_short_pool() {
		let mut registry = AdapterRegistry::new();
		for provider in [BridgeProvider::Hop, BridgeProvider::LayerZero] {
			registry.register(Arc::new(mock(provider))).unwrap();
		}
		let registry = Arc::new(registry);

		let store = liquidity(&[(BridgeProvider::Hop, MIN), (BridgeProvider::LayerZero, MAX)]).await;
		let engine = engine().with_liquidity_store(store);
		engine.register_registry_pairs(&registry);
		let aggregator = RouteAggregator::new(registry, AggregatorConfig::default());

		let result = engine
			.get_compatible_routes(&request(MIN * 10), &aggregator, None)
			.await;

		assert!(result.validation.is_valid, "{:?}", result.validation.errors);
		assert_eq!(result.routes.routes.len(), 1);
		assert_eq!(result.routes.routes[0].adapter, BridgeProvider::LayerZero);
		assert_eq!(result.rejected.len(), 1);
		assert_eq!(result.rejected[0].provider, BridgeProvider::Hop);
		assert_eq!(
			result.rejected[0].errors[0].code,
			ValidationErrorCode::InsufficientLiquidity
		);
	}
}
