//! Ranking weights and the route view the ranker scores

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::limits::WEIGHT_SUM_EPSILON;
use crate::routes::{BridgeRoute, NormalizedRoute};

/// Rejected ranking weight configurations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightsError {
	#[error("Weight {name} must be a finite number in [0, 1], got {value}")]
	OutOfRange { name: &'static str, value: f64 },

	#[error("Weights must sum to 1 (±{epsilon}), got {sum}")]
	InvalidSum { sum: f64, epsilon: f64 },
}

/// Relative importance of cost, latency and reliability when ranking routes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingWeights {
	cost_weight: f64,
	latency_weight: f64,
	reliability_weight: f64,
}

impl RankingWeights {
	/// Validate and construct a weight set
	pub fn new(
		cost_weight: f64,
		latency_weight: f64,
		reliability_weight: f64,
	) -> Result<Self, WeightsError> {
		for (name, value) in [
			("cost_weight", cost_weight),
			("latency_weight", latency_weight),
			("reliability_weight", reliability_weight),
		] {
			if !value.is_finite() || !(0.0..=1.0).contains(&value) {
				return Err(WeightsError::OutOfRange { name, value });
			}
		}

		let sum = cost_weight + latency_weight + reliability_weight;
		if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
			return Err(WeightsError::InvalidSum {
				sum,
				epsilon: WEIGHT_SUM_EPSILON,
			});
		}

		Ok(Self {
			cost_weight,
			latency_weight,
			reliability_weight,
		})
	}

	pub fn cost_weight(&self) -> f64 {
		self.cost_weight
	}

	pub fn latency_weight(&self) -> f64 {
		self.latency_weight
	}

	pub fn reliability_weight(&self) -> f64 {
		self.reliability_weight
	}

	/// Merge a partial update, validating the combined result
	pub fn apply(&self, update: &WeightsUpdate) -> Result<Self, WeightsError> {
		Self::new(
			update.cost_weight.unwrap_or(self.cost_weight),
			update.latency_weight.unwrap_or(self.latency_weight),
			update.reliability_weight.unwrap_or(self.reliability_weight),
		)
	}
}

impl Default for RankingWeights {
	fn default() -> Self {
		Self {
			cost_weight: 0.4,
			latency_weight: 0.4,
			reliability_weight: 0.2,
		}
	}
}

impl<'de> Deserialize<'de> for RankingWeights {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct Raw {
			cost_weight: f64,
			latency_weight: f64,
			reliability_weight: f64,
		}

		let raw = Raw::deserialize(deserializer)?;
		RankingWeights::new(raw.cost_weight, raw.latency_weight, raw.reliability_weight)
			.map_err(serde::de::Error::custom)
	}
}

/// Partial weight update; unspecified weights keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightsUpdate {
	pub cost_weight: Option<f64>,
	pub latency_weight: Option<f64>,
	pub reliability_weight: Option<f64>,
}

/// Fields the ranker needs from a route
pub trait RankableRoute {
	fn route_id(&self) -> &str;
	fn fee_percentage(&self) -> f64;
	fn estimated_time(&self) -> u64;
	fn reliability(&self) -> f64;
}

impl RankableRoute for BridgeRoute {
	fn route_id(&self) -> &str {
		&self.id
	}

	fn fee_percentage(&self) -> f64 {
		self.fee_percentage
	}

	fn estimated_time(&self) -> u64 {
		self.estimated_time
	}

	fn reliability(&self) -> f64 {
		self.reliability
	}
}

impl RankableRoute for NormalizedRoute {
	fn route_id(&self) -> &str {
		&self.id
	}

	fn fee_percentage(&self) -> f64 {
		self.fee_percentage
	}

	fn estimated_time(&self) -> u64 {
		self.estimated_time
	}

	fn reliability(&self) -> f64 {
		self.reliability
	}
}
