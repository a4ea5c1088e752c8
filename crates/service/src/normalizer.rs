//! Conversion of adapter routes into the uniform normalized shape

use bridge_types::{Amount, BridgeRoute, NormalizedRoute};
use tracing::warn;

/// Normalize one adapter route
///
/// Routes without hops get a single synthesized hop. Total fees are the sum
/// of hop fees; if any hop fee is not a valid amount the route's own fee is
/// used instead.
pub fn normalize_route(route: BridgeRoute) -> NormalizedRoute {
	let hops = match route.hops.as_ref() {
		Some(hops) if !hops.is_empty() => hops.clone(),
		_ => vec![route.synthesized_hop()],
	};

	let parsed: Result<Vec<Amount>, _> = hops.iter().map(|hop| Amount::parse(&hop.fee)).collect();
	let total_fees = match parsed {
		Ok(fees) => fees.into_iter().sum(),
		Err(e) => {
			warn!(
				"Route {} has an unparseable hop fee ({}), using route fee {}",
				route.id, e, route.fee
			);
			route.fee.clone()
		},
	};

	let estimated_time = hops
		.iter()
		.fold(0u64, |acc, hop| acc.saturating_add(hop.estimated_time))
		.max(1);
	let fee_percentage = total_fees.percentage_of(&route.input_amount);

	NormalizedRoute {
		id: route.id,
		source_chain: route.source_chain,
		destination_chain: route.target_chain,
		token_in: route.token_in,
		token_out: route.token_out,
		input_amount: route.input_amount,
		output_amount: route.output_amount,
		total_fees,
		fee_percentage,
		estimated_time,
		reliability: route.reliability,
		hops,
		adapter: route.provider,
		deadline: route.deadline,
		metadata: route.metadata,
	}
}

pub fn normalize_routes(routes: Vec<BridgeRoute>) -> Vec<NormalizedRoute> {
	routes.into_iter().map(normalize_route).collect()
}
