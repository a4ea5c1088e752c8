//! Deterministic latency estimation

use serde::{Deserialize, Serialize};

use crate::models::ChainId;

/// Bridge relay time between two EVM chains (seconds)
pub const EVM_BRIDGE_PROCESSING_SECS: u64 = 120;
/// Bridge relay time when a non-EVM chain is involved (seconds)
pub const NON_EVM_BRIDGE_PROCESSING_SECS: u64 = 180;

const MAX_CONFIDENCE: u8 = 95;
const MIN_CONFIDENCE: u8 = 40;

/// Per-stage latency contribution, in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyBreakdown {
	pub source_confirmation: u64,
	pub bridge_processing: u64,
	pub destination_confirmation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatencyEstimate {
	pub estimated_seconds: u64,
	/// Percent, between 40 and 95
	pub confidence: u8,
	pub breakdown: LatencyBreakdown,
}

/// Estimate the end-to-end transfer time between two chains
///
/// `load` is the bridge utilisation in `[0, 1]`; out-of-range values are
/// clamped. Full load stretches every stage by 1.5x.
pub fn estimate_latency(source: ChainId, target: ChainId, load: f64) -> LatencyEstimate {
	let load = if load.is_finite() {
		load.clamp(0.0, 1.0)
	} else {
		0.0
	};
	let factor = 1.0 + 0.5 * load;
	let scale = |secs: u64| (secs as f64 * factor).round() as u64;

	let processing = if source.is_evm() && target.is_evm() {
		EVM_BRIDGE_PROCESSING_SECS
	} else {
		NON_EVM_BRIDGE_PROCESSING_SECS
	};

	let breakdown = LatencyBreakdown {
		source_confirmation: scale(source.finality_secs()),
		bridge_processing: scale(processing),
		destination_confirmation: scale(target.finality_secs()),
	};

	let penalty = (load * 30.0).floor() as u8;
	let confidence = MAX_CONFIDENCE.saturating_sub(penalty).max(MIN_CONFIDENCE);

	LatencyEstimate {
		estimated_seconds: breakdown.source_confirmation
			+ breakdown.bridge_processing
			+ breakdown.destination_confirmation,
		confidence,
		breakdown,
	}
}
