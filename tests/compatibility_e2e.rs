//! Validated aggregation through the wired services

mod mocks;

use std::sync::Arc;

use bridge_aggregator::adapters::MockAdapter;
use bridge_aggregator::{
	AggregatorBuilder, Amount, BridgeAggregator, BridgeProvider, BridgeStatus, ChainId,
	CompatibilityRequest, LiquiditySnapshot, LiquidityStore, NormalizedToken, SnapshotKey, TokenPair,
	ValidationErrorCode,
};
use mocks::{eth_to_polygon, mock_route, offline_settings, usdc_mapping, ONE_UNIT};

const MIN: u64 = 2_000_000_000_000;
const MAX: u64 = 10 * ONE_UNIT;

fn provider_adapter(provider: BridgeProvider, id: &str, output: u64) -> Arc<MockAdapter> {
	Arc::new(
		MockAdapter::new(provider)
			.with_pair(ChainId::Ethereum, ChainId::Polygon)
			.with_route(mock_route(provider, id, ONE_UNIT, output, 300, 0.9)),
	)
}

fn bridge(adapters: Vec<Arc<MockAdapter>>) -> BridgeAggregator {
	let mut builder = AggregatorBuilder::new()
		.with_settings(offline_settings())
		.without_network_adapters();
	for adapter in adapters {
		builder = builder.with_adapter(adapter);
	}
	let bridge = builder.build().unwrap();
	bridge
		.compatibility
		.register_token(NormalizedToken::usdc_ethereum())
		.unwrap();
	bridge
		.compatibility
		.register_token(NormalizedToken::usdc_polygon())
		.unwrap();
	bridge
}

#[tokio::test]
async fn test_routes_without_a_mapping_are_rejected() {
	let bridge = bridge(vec![
		provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000),
		provider_adapter(BridgeProvider::LayerZero, "lz-1", ONE_UNIT - 1_000),
	]);
	bridge
		.compatibility
		.register_token_mapping(usdc_mapping(BridgeProvider::Hop, MIN, MAX))
		.unwrap();

	let request = eth_to_polygon(ONE_UNIT).with_token("USDC");
	let result = bridge.get_compatible_routes(&request, None).await;

	assert!(result.validation.is_valid, "{:?}", result.validation.errors);
	assert_eq!(result.routes.routes.len(), 1);
	assert_eq!(result.routes.routes[0].id, "hop-1");

	assert_eq!(result.rejected.len(), 1);
	let rejected = &result.rejected[0];
	assert_eq!(rejected.route_id, "lz-1");
	assert_eq!(rejected.provider, BridgeProvider::LayerZero);
	assert_eq!(rejected.errors[0].code, ValidationErrorCode::UnsupportedTokenPair);
}

#[tokio::test]
async fn test_all_routes_rejected_fails_validation() {
	let bridge = bridge(vec![provider_adapter(BridgeProvider::LayerZero, "lz-1", ONE_UNIT - 1_000)]);

	let request = eth_to_polygon(ONE_UNIT).with_token("USDC");
	let result = bridge.get_compatible_routes(&request, None).await;

	assert!(!result.validation.is_valid);
	assert!(result.validation.has_code(ValidationErrorCode::ValidationFailed));
	assert!(result.routes.routes.is_empty());
	assert_eq!(result.routes.providers_responded, 1);
}

#[tokio::test]
async fn test_paused_bridge_short_circuits_aggregation() {
	let hop = provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000);
	let bridge = bridge(vec![Arc::clone(&hop)]);
	bridge
		.compatibility
		.set_bridge_status(BridgeProvider::Hop, BridgeStatus::paused("maintenance"));

	let result = bridge
		.get_compatible_routes(&eth_to_polygon(ONE_UNIT), None)
		.await;

	assert_eq!(result.validation.error_codes(), vec![ValidationErrorCode::BridgePaused]);
	assert!(result.routes.routes.is_empty());
	assert_eq!(hop.call_count(), 0);

	// Plain aggregation skips the paused provider too
	let plain = bridge.get_routes(&eth_to_polygon(ONE_UNIT), None).await;
	assert_eq!(plain.providers_queried, 0);
	assert_eq!(hop.call_count(), 0);
}

#[tokio::test]
async fn test_pre_validation_accumulates_findings() {
	let bridge = bridge(vec![provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000)]);
	bridge
		.compatibility
		.register_token_mapping(usdc_mapping(BridgeProvider::Hop, MIN, MAX))
		.unwrap();

	let too_much = eth_to_polygon(100 * ONE_UNIT).with_token("USDC");
	let result = bridge.compatibility.pre_validate_route(&too_much).await;
	assert_eq!(result.error_codes(), vec![ValidationErrorCode::AmountTooHigh]);

	let unknown = eth_to_polygon(ONE_UNIT).with_token("DAI");
	let result = bridge.compatibility.pre_validate_route(&unknown).await;
	assert_eq!(result.error_codes(), vec![ValidationErrorCode::TokenNotRegistered]);

	let nowhere = bridge
		.compatibility
		.pre_validate_route(&mocks::eth_to_polygon(0).with_token("DAI"))
		.await;
	assert!(nowhere.has_code(ValidationErrorCode::InvalidAmount));
	assert!(nowhere.has_code(ValidationErrorCode::TokenNotRegistered));

	let unsupported = bridge.compatibility.pre_validate_route(&bridge_aggregator::RouteRequest::new(
		ChainId::Stellar,
		ChainId::Bsc,
		Amount::from(ONE_UNIT),
	))
	.await;
	assert_eq!(unsupported.error_codes(), vec![ValidationErrorCode::RouteNotSupported]);
}

#[tokio::test]
async fn test_shallow_pools_fail_pre_validation() {
	let hop = provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000);
	let bridge = bridge(vec![Arc::clone(&hop)]);
	bridge
		.compatibility
		.register_token_mapping(usdc_mapping(BridgeProvider::Hop, MIN, MAX))
		.unwrap();
	let key = SnapshotKey::new(
		BridgeProvider::Hop,
		ChainId::Ethereum,
		ChainId::Polygon,
		&NormalizedToken::usdc_ethereum().address,
	);
	bridge
		.liquidity
		.put_snapshot(LiquiditySnapshot::new(key, Amount::from(ONE_UNIT / 2), 0.9))
		.await
		.unwrap();

	let request = eth_to_polygon(ONE_UNIT).with_token("USDC");
	let result = bridge.get_compatible_routes(&request, None).await;

	assert_eq!(
		result.validation.error_codes(),
		vec![ValidationErrorCode::InsufficientLiquidity]
	);
	assert!(result.routes.routes.is_empty());
	assert_eq!(hop.call_count(), 0);
}

#[tokio::test]
async fn test_local_discovery_uses_liquidity_snapshots() {
	let bridge = bridge(vec![
		provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000),
		provider_adapter(BridgeProvider::LayerZero, "lz-1", ONE_UNIT - 1_000),
		provider_adapter(BridgeProvider::Mock, "mock-1", ONE_UNIT - 2_000),
	]);
	for provider in [BridgeProvider::Hop, BridgeProvider::LayerZero, BridgeProvider::Mock] {
		bridge
			.compatibility
			.register_token_mapping(usdc_mapping(provider, MIN, MAX))
			.unwrap();
	}

	let usdc = NormalizedToken::usdc_ethereum();
	let key = |provider| SnapshotKey::new(provider, ChainId::Ethereum, ChainId::Polygon, &usdc.address);
	bridge
		.liquidity
		.put_snapshot(LiquiditySnapshot::new(
			key(BridgeProvider::LayerZero),
			Amount::from(ONE_UNIT / 2),
			0.9,
		))
		.await
		.unwrap();
	bridge
		.liquidity
		.put_snapshot(LiquiditySnapshot::new(
			key(BridgeProvider::Hop),
			Amount::from(50 * ONE_UNIT),
			0.8,
		))
		.await
		.unwrap();

	let request = CompatibilityRequest::new(
		ChainId::Ethereum,
		ChainId::Polygon,
		"USDC",
		Amount::from(ONE_UNIT),
	);
	let routes = bridge.compatibility.find_compatible_routes(&request).await;

	// LayerZero lacks liquidity; Mock has no snapshot and takes the default score
	let providers: Vec<BridgeProvider> = routes.iter().map(|r| r.provider).collect();
	assert_eq!(providers, vec![BridgeProvider::Hop, BridgeProvider::Mock]);
	assert!((routes[0].liquidity_score - 0.8).abs() < 1e-9);
	assert!((routes[1].liquidity_score - 0.5).abs() < 1e-9);
	assert!(routes.windows(2).all(|w| w[0].priority <= w[1].priority));
	assert!(routes.iter().all(|r| !r.fee_estimate.total_fee.is_zero()));
}

#[tokio::test]
async fn test_token_pair_validation_suggests_alternatives() {
	let bridge = bridge(vec![
		provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000),
		provider_adapter(BridgeProvider::LayerZero, "lz-1", ONE_UNIT - 1_000),
	]);
	bridge
		.compatibility
		.register_token_mapping(usdc_mapping(BridgeProvider::LayerZero, MIN, MAX))
		.unwrap();

	let pair = TokenPair::new(
		ChainId::Ethereum,
		ChainId::Polygon,
		"USDC",
		"USDC",
		BridgeProvider::Hop,
	);
	let result = bridge.compatibility.validate_token_pair(&pair);
	assert_eq!(result.error_codes(), vec![ValidationErrorCode::UnsupportedTokenPair]);
	assert_eq!(result.alternatives.len(), 1);
	assert_eq!(result.alternatives[0].provider, BridgeProvider::LayerZero);

	let stellar = pair.with_provider(BridgeProvider::Stellar);
	let result = bridge.compatibility.validate_token_pair(&stellar);
	assert!(result.has_code(ValidationErrorCode::UnsupportedChainPair));
	assert!(result.has_code(ValidationErrorCode::UnsupportedTokenPair));
	assert!(result
		.alternatives
		.iter()
		.any(|a| a.provider == BridgeProvider::LayerZero));

	let mapped = pair.with_provider(BridgeProvider::LayerZero);
	let result = bridge.compatibility.validate_token_pair(&mapped);
	assert!(result.is_valid);
	assert!(result.alternatives.is_empty());
}

#[tokio::test]
async fn test_mapping_lookup_returns_registered_tokens() {
	let bridge = bridge(vec![provider_adapter(BridgeProvider::Hop, "hop-1", ONE_UNIT - 3_000)]);
	let entry = usdc_mapping(BridgeProvider::Hop, MIN, MAX).with_conversion_rate(0.999);
	bridge
		.compatibility
		.register_token_mapping(entry.clone())
		.unwrap();

	let by_symbol = bridge
		.compatibility
		.get_mapping(ChainId::Ethereum, ChainId::Polygon, BridgeProvider::Hop, "usdc")
		.unwrap();
	assert_eq!(by_symbol, entry);

	let by_address = bridge
		.compatibility
		.get_mapping(
			ChainId::Ethereum,
			ChainId::Polygon,
			BridgeProvider::Hop,
			&NormalizedToken::usdc_ethereum().address.to_lowercase(),
		)
		.unwrap();
	assert_eq!(by_address.max_amount, Amount::from(MAX));

	assert!(bridge
		.compatibility
		.get_mapping(ChainId::Polygon, ChainId::Ethereum, BridgeProvider::Hop, "USDC")
		.is_none());
}
