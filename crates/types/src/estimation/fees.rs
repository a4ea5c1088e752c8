//! Deterministic fee estimation

use serde::{Deserialize, Serialize};

use crate::models::Amount;

/// Network fee per on-chain operation when leaving a non-EVM chain (bps)
pub const NON_EVM_NETWORK_FEE_BPS: u64 = 1;
/// Bridge protocol fee when leaving a non-EVM chain (bps)
pub const NON_EVM_BRIDGE_FEE_BPS: u64 = 25;
/// Network fee per on-chain operation when leaving an EVM chain (bps)
pub const EVM_NETWORK_FEE_BPS: u64 = 5;
/// Bridge protocol fee when leaving an EVM chain (bps)
pub const EVM_BRIDGE_FEE_BPS: u64 = 30;

/// Smallest transfer accepted from a non-EVM chain (7-decimal units)
pub const NON_EVM_DUST_THRESHOLD: u64 = 1_000_000;
/// Smallest transfer accepted from an EVM chain (18-decimal units)
pub const EVM_DUST_THRESHOLD: u64 = 1_000_000_000_000;

/// Fee breakdown for a transfer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimate {
	pub network_fee: Amount,
	pub bridge_fee: Amount,
	pub slippage_fee: Amount,
	pub total_fee: Amount,
	/// `total_fee / input` in percent, never above 100
	pub fee_percentage: f64,
}

/// Estimate fees for moving `input` across a bridge
///
/// `op_count` is the number of on-chain operations the transfer needs (at
/// least one is always charged). Slippage is given in percent and clamped
/// to `[0, 100]`.
pub fn estimate_fees(
	input: &Amount,
	is_from_non_evm: bool,
	slippage_percent: f64,
	op_count: u32,
) -> FeeEstimate {
	let (network_bps, bridge_bps) = if is_from_non_evm {
		(NON_EVM_NETWORK_FEE_BPS, NON_EVM_BRIDGE_FEE_BPS)
	} else {
		(EVM_NETWORK_FEE_BPS, EVM_BRIDGE_FEE_BPS)
	};

	let ops = u64::from(op_count.max(1));
	let network_fee = input.mul_bps(network_bps * ops);
	let bridge_fee = input.mul_bps(bridge_bps);
	let slippage_fee = input.mul_bps(slippage_bps(slippage_percent));

	let total_fee = network_fee.clone() + &bridge_fee + &slippage_fee;
	let fee_percentage = total_fee.percentage_of(input);

	FeeEstimate {
		network_fee,
		bridge_fee,
		slippage_fee,
		total_fee,
		fee_percentage,
	}
}

/// Whether `amount` clears the dust threshold for its chain kind
pub fn is_valid_amount(amount: &Amount, is_non_evm: bool) -> bool {
	let threshold = if is_non_evm {
		NON_EVM_DUST_THRESHOLD
	} else {
		EVM_DUST_THRESHOLD
	};
	*amount >= Amount::from(threshold)
}

fn slippage_bps(slippage_percent: f64) -> u64 {
	if !slippage_percent.is_finite() {
		return 0;
	}
	(slippage_percent.clamp(0.0, 100.0) * 100.0).round() as u64
}
