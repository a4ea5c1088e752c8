//! Multi-criteria route ranking
//!
//! `score = cost_weight * normalize_cost(fee%) + latency_weight *
//! normalize_latency(seconds) + reliability_weight * reliability`, sorted
//! descending with route id as the tie-breaker.

use bridge_types::constants::limits::{
	LATENCY_DECAY_SECS, MAX_RANKED_LATENCY_SECS, MIN_RANKED_LATENCY_SECS,
};
use bridge_types::{RankableRoute, RankingWeights, WeightsError, WeightsUpdate};
use serde::Serialize;
use std::cmp::Ordering;
use tracing::{debug, info};

/// Linear cost score: 0% fee scores 1, 100% scores 0
pub fn normalize_cost(fee_percentage: f64) -> f64 {
	let fee = if fee_percentage.is_nan() {
		100.0
	} else {
		fee_percentage.clamp(0.0, 100.0)
	};
	1.0 - fee / 100.0
}

/// Exponential latency score, clamped to `[1, 3600]` seconds before decay
pub fn normalize_latency(estimated_seconds: u64) -> f64 {
	let seconds = (estimated_seconds as f64).clamp(MIN_RANKED_LATENCY_SECS, MAX_RANKED_LATENCY_SECS);
	(-seconds / LATENCY_DECAY_SECS).exp()
}

fn normalize_reliability(reliability: f64) -> f64 {
	if reliability.is_nan() {
		0.0
	} else {
		reliability.clamp(0.0, 1.0)
	}
}

/// Per-criterion breakdown of a route's score
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteScore {
	pub route_id: String,
	pub cost_score: f64,
	pub latency_score: f64,
	pub reliability_score: f64,
	/// Weighted sum of the three criteria
	pub total: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RouteRanker {
	weights: RankingWeights,
}

impl RouteRanker {
	pub fn new(weights: RankingWeights) -> Self {
		Self { weights }
	}

	pub fn weights(&self) -> RankingWeights {
		self.weights
	}

	/// Apply a partial weight update; on error the current weights are kept
	pub fn update_weights(&mut self, update: &WeightsUpdate) -> Result<RankingWeights, WeightsError> {
		let weights = self.weights.apply(update)?;
		info!(
			"Ranking weights updated: cost={} latency={} reliability={}",
			weights.cost_weight(),
			weights.latency_weight(),
			weights.reliability_weight()
		);
		self.weights = weights;
		Ok(weights)
	}

	pub fn score_route<R: RankableRoute>(&self, route: &R) -> RouteScore {
		let cost_score = normalize_cost(route.fee_percentage());
		let latency_score = normalize_latency(route.estimated_time());
		let reliability_score = normalize_reliability(route.reliability());

		RouteScore {
			route_id: route.route_id().to_string(),
			cost_score,
			latency_score,
			reliability_score,
			total: self.weights.cost_weight() * cost_score
				+ self.weights.latency_weight() * latency_score
				+ self.weights.reliability_weight() * reliability_score,
		}
	}

	/// Order routes best-first
	pub fn rank_routes<R: RankableRoute>(&self, routes: Vec<R>) -> Vec<R> {
		if routes.len() < 2 {
			return routes;
		}

		let mut scored: Vec<(f64, R)> = routes
			.into_iter()
			.map(|route| (self.score_route(&route).total, route))
			.collect();

		scored.sort_by(|(score_a, route_a), (score_b, route_b)| {
			match score_b.total_cmp(score_a) {
				Ordering::Equal => route_a.route_id().cmp(route_b.route_id()),
				other => other,
			}
		});

		debug!(
			"Ranked {} routes, best {} ({:.4})",
			scored.len(),
			scored[0].1.route_id(),
			scored[0].0
		);

		scored.into_iter().map(|(_, route)| route).collect()
	}
}
