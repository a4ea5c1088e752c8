//! Shared requests, routes, tokens and settings

use bridge_aggregator::{
	Amount, BridgeProvider, BridgeRoute, ChainId, NormalizedToken, RouteRequest, Settings,
	TokenMappingEntry,
};

/// 1 USDC-equivalent in 18-decimal units, above every dust threshold
pub const ONE_UNIT: u64 = 1_000_000_000_000_000;

pub fn eth_to_polygon(amount: u64) -> RouteRequest {
	RouteRequest::new(ChainId::Ethereum, ChainId::Polygon, Amount::from(amount))
}

pub fn mock_route(
	provider: BridgeProvider,
	id: &str,
	input: u64,
	output: u64,
	estimated_time: u64,
	reliability: f64,
) -> BridgeRoute {
	BridgeRoute::from_amounts(
		id,
		provider,
		ChainId::Ethereum,
		ChainId::Polygon,
		Amount::from(input),
		Amount::from(output),
	)
	.unwrap()
	.with_estimated_time(estimated_time)
	.with_reliability(reliability)
}

/// USDC mapping Ethereum -> Polygon with the given bounds
pub fn usdc_mapping(provider: BridgeProvider, min: u64, max: u64) -> TokenMappingEntry {
	TokenMappingEntry::new(
		NormalizedToken::usdc_ethereum(),
		NormalizedToken::usdc_polygon(),
		provider,
		Amount::from(min),
		Amount::from(max),
	)
}

/// Default settings with every network provider switched off
pub fn offline_settings() -> Settings {
	let mut settings = Settings::default();
	settings.providers.hop.enabled = false;
	settings.providers.layerzero.enabled = false;
	settings.providers.stellar.enabled = false;
	settings
}

/// Only Hop enabled, pointed at a test host
pub fn hop_only_settings() -> Settings {
	let mut settings = offline_settings();
	settings.providers.hop.enabled = true;
	settings.providers.hop.endpoint = "https://hop.test".to_string();
	settings
}
