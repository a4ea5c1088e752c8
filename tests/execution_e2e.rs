//! Pre-flight checks on aggregated routes

mod mocks;

use std::sync::Arc;

use bridge_aggregator::adapters::MockAdapter;
use bridge_aggregator::chrono::Utc;
use bridge_aggregator::{
	AggregatorBuilder, Amount, BridgeAggregator, BridgeProvider, ChainId, ExecutionContext,
	ValidationErrorCode,
};
use mocks::{eth_to_polygon, mock_route, offline_settings, ONE_UNIT};

fn bridge_with_deadline(deadline: i64) -> BridgeAggregator {
	let adapter = MockAdapter::new(BridgeProvider::Hop)
		.with_pair(ChainId::Ethereum, ChainId::Polygon)
		.with_route(
			mock_route(BridgeProvider::Hop, "hop-1", ONE_UNIT, ONE_UNIT - 4_000, 240, 0.92)
				.with_deadline(deadline),
		);
	AggregatorBuilder::new()
		.with_settings(offline_settings())
		.with_adapter(Arc::new(adapter))
		.build()
		.unwrap()
}

#[tokio::test]
async fn test_best_route_passes_route_checks() {
	let bridge = bridge_with_deadline(Utc::now().timestamp() + 600);
	let request = eth_to_polygon(ONE_UNIT);

	let best = bridge.aggregator.best_route(&request).await.unwrap();
	let result = bridge.validator.validate_route(&best, &request);
	assert!(result.is_valid, "{:?}", result.errors);
	assert!(result.warnings.is_empty());
}

#[tokio::test]
async fn test_expiring_and_expired_quotes() {
	let request = eth_to_polygon(ONE_UNIT);

	let soon = bridge_with_deadline(Utc::now().timestamp() + 30);
	let best = soon.aggregator.best_route(&request).await.unwrap();
	let result = soon.validator.validate_route(&best, &request);
	assert!(result.is_valid);
	assert_eq!(result.warnings[0].code, ValidationErrorCode::DeadlineApproaching);

	let stale = bridge_with_deadline(Utc::now().timestamp() - 5);
	let best = stale.aggregator.best_route(&request).await.unwrap();
	let result = stale.validator.validate_route(&best, &request);
	assert_eq!(result.error_codes(), vec![ValidationErrorCode::DeadlineExpired]);
}

#[tokio::test]
async fn test_route_for_another_request_is_a_mismatch() {
	let bridge = bridge_with_deadline(Utc::now().timestamp() + 600);
	let best = bridge
		.aggregator
		.best_route(&eth_to_polygon(ONE_UNIT))
		.await
		.unwrap();

	let other = bridge_aggregator::RouteRequest::new(
		ChainId::Ethereum,
		ChainId::Arbitrum,
		Amount::from(ONE_UNIT),
	);
	let result = bridge.validator.validate_route(&best, &other);
	assert_eq!(result.error_codes(), vec![ValidationErrorCode::RouteMismatch]);
}

#[test]
fn test_wallet_state_checks_accumulate() {
	let bridge = bridge_with_deadline(Utc::now().timestamp() + 600);
	let request = eth_to_polygon(ONE_UNIT);

	let ready = ExecutionContext::new("0xabc", ChainId::Ethereum, Amount::from(2 * ONE_UNIT))
		.with_allowance(Amount::from(ONE_UNIT));
	assert!(bridge.validate_execution(&request, &ready).is_valid);

	let wrong_network = ExecutionContext::new("0xabc", ChainId::Polygon, Amount::from(ONE_UNIT / 2));
	let result = bridge.validate_execution(&request, &wrong_network);
	assert_eq!(
		result.error_codes(),
		vec![
			ValidationErrorCode::NetworkMismatch,
			ValidationErrorCode::InsufficientBalance,
			ValidationErrorCode::InsufficientAllowance,
		]
	);
	assert!(result.errors.iter().all(|e| !e.message.is_empty()));
}
