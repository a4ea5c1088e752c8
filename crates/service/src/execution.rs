//! Pre-flight checks against the caller's wallet state

use bridge_types::constants::limits::DEADLINE_WARNING_SECS;
use bridge_types::{
	ExecutionContext, NormalizedRoute, RouteRequest, ValidationError, ValidationErrorCode,
	ValidationResult,
};
use chrono::Utc;
use serde_json::json;

/// Stateless validator for execution requests and selected routes
#[derive(Debug, Clone, Copy)]
pub struct ExecutionValidator {
	deadline_warning_secs: i64,
}

impl Default for ExecutionValidator {
	fn default() -> Self {
		Self {
			deadline_warning_secs: DEADLINE_WARNING_SECS,
		}
	}
}

impl ExecutionValidator {
	pub fn new() -> Self {
		Self::default()
	}

	/// Check that the wallet can execute the request; findings accumulate
	pub fn validate_execution_request(
		&self,
		request: &RouteRequest,
		context: &ExecutionContext,
	) -> ValidationResult {
		let mut result = ValidationResult::valid();
		let (source, target) = (request.source_chain, request.target_chain);
		let amount = &request.asset_amount;

		if source == target {
			result.push(
				ValidationError::new(ValidationErrorCode::UnsupportedChainPair, "targetChain")
					.with_message(format!("Source and destination are both {}", source)),
			);
		} else if !source.can_reach(target) {
			result.push(
				ValidationError::new(ValidationErrorCode::UnsupportedChainPair, "targetChain")
					.with_message(format!("{} cannot reach {}", source, target)),
			);
		}

		if context.connected_chain != Some(source) {
			let connected = context
				.connected_chain
				.map(|chain| chain.to_string())
				.unwrap_or_else(|| "no network".to_string());
			result.push(
				ValidationError::new(ValidationErrorCode::NetworkMismatch, "connectedChain")
					.with_message(format!("Wallet is on {}, switch to {}", connected, source))
					.with_context(json!({ "expected": source, "actual": context.connected_chain })),
			);
		}

		if amount.is_zero() {
			result.push(
				ValidationError::new(ValidationErrorCode::InvalidAmount, "assetAmount")
					.with_message("Amount must be greater than zero"),
			);
		}

		if context.balance < *amount {
			result.push(
				ValidationError::new(ValidationErrorCode::InsufficientBalance, "balance")
					.with_message(format!("Balance {} is below {}", context.balance, amount))
					.with_context(json!({ "balance": context.balance, "required": amount })),
			);
		}

		if source.is_evm() && !context.is_native_token {
			let allowance_ok = context.allowance.as_ref().map_or(false, |a| a >= amount);
			if !allowance_ok {
				let granted = context
					.allowance
					.as_ref()
					.map(|a| a.to_string())
					.unwrap_or_else(|| "0".to_string());
				result.push(
					ValidationError::new(ValidationErrorCode::InsufficientAllowance, "allowance")
						.with_message(format!("Allowance {} is below {}", granted, amount)),
				);
			}
		}

		result
	}

	/// Check a selected route against the request at the current time
	pub fn validate_route(&self, route: &NormalizedRoute, request: &RouteRequest) -> ValidationResult {
		self.validate_route_at(route, request, Utc::now().timestamp())
	}

	/// Check a selected route against the request at `now` (unix seconds)
	pub fn validate_route_at(
		&self,
		route: &NormalizedRoute,
		request: &RouteRequest,
		now: i64,
	) -> ValidationResult {
		let mut result = ValidationResult::valid();

		if route.source_chain != request.source_chain {
			result.push(
				ValidationError::new(ValidationErrorCode::RouteMismatch, "sourceChain").with_message(
					format!(
						"Route starts on {} but the request starts on {}",
						route.source_chain, request.source_chain
					),
				),
			);
		}
		if route.destination_chain != request.target_chain {
			result.push(
				ValidationError::new(ValidationErrorCode::RouteMismatch, "targetChain").with_message(
					format!(
						"Route ends on {} but the request ends on {}",
						route.destination_chain, request.target_chain
					),
				),
			);
		}

		if let Some(deadline) = route.deadline {
			let remaining = deadline.saturating_sub(now);
			if remaining <= 0 {
				result.push(
					ValidationError::new(ValidationErrorCode::DeadlineExpired, "deadline")
						.with_message(format!("Quote expired {}s ago", remaining.unsigned_abs())),
				);
			} else if remaining <= self.deadline_warning_secs {
				result.push(
					ValidationError::new(ValidationErrorCode::DeadlineApproaching, "deadline")
						.with_message(format!("Quote expires in {}s", remaining))
						.as_warning(),
				);
			}
		}

		result
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::normalizer::normalize_route;
	use bridge_types::{Amount, BridgeProvider, BridgeRoute, ChainId};

	fn request() -> RouteRequest {
		RouteRequest::new(ChainId::Ethereum, ChainId::Polygon, Amount::from(1_000u64))
	}

	fn route(deadline: Option<i64>) -> NormalizedRoute {
		let mut route = BridgeRoute::from_amounts(
			"r",
			BridgeProvider::Hop,
			ChainId::Ethereum,
			ChainId::Polygon,
			Amount::from(1_000u64),
			Amount::from(990u64),
		)
		.unwrap();
		route.deadline = deadline;
		normalize_route(route)
	}

	#[test]
	fn test_ready_wallet_passes() {
		let context = ExecutionContext::new("0xabc", ChainId::Ethereum, Amount::from(5_000u64))
			.with_allowance(Amount::from(1_000u64));
		let result = ExecutionValidator::new().validate_execution_request(&request(), &context);
		assert!(result.is_valid, "{:?}", result.errors);
	}

	#[test]
	fn test_every_failure_is_reported() {
		let context = ExecutionContext::new("0xabc", ChainId::Base, Amount::from(10u64));
		let result = ExecutionValidator::new().validate_execution_request(&request(), &context);

		assert_eq!(
			result.error_codes(),
			vec![
				ValidationErrorCode::NetworkMismatch,
				ValidationErrorCode::InsufficientBalance,
				ValidationErrorCode::InsufficientAllowance,
			]
		);
	}

	#[test]
	fn test_native_and_non_evm_skip_allowance() {
		let validator = ExecutionValidator::new();
		let native = ExecutionContext::new("0xabc", ChainId::Ethereum, Amount::from(5_000u64)).native();
		assert!(validator.validate_execution_request(&request(), &native).is_valid);

		let stellar_request =
			RouteRequest::new(ChainId::Stellar, ChainId::Ethereum, Amount::from(1_000u64));
		let stellar = ExecutionContext::new("GABC", ChainId::Stellar, Amount::from(5_000u64));
		assert!(validator
			.validate_execution_request(&stellar_request, &stellar)
			.is_valid);
	}

	#[test]
	fn test_unreachable_and_zero_amount() {
		let request = RouteRequest::new(ChainId::Stellar, ChainId::Bsc, Amount::zero());
		let context = ExecutionContext::new("GABC", ChainId::Stellar, Amount::zero()).disconnected();
		let codes = ExecutionValidator::new()
			.validate_execution_request(&request, &context)
			.error_codes();

		assert!(codes.contains(&ValidationErrorCode::UnsupportedChainPair));
		assert!(codes.contains(&ValidationErrorCode::NetworkMismatch));
		assert!(codes.contains(&ValidationErrorCode::InvalidAmount));
		assert!(!codes.contains(&ValidationErrorCode::InsufficientBalance));
	}

	#[test]
	fn test_deadline_boundaries() {
		let validator = ExecutionValidator::new();
		let now = 1_700_000_000;

		let fresh = validator.validate_route_at(&route(Some(now + 600)), &request(), now);
		assert!(fresh.is_valid);
		assert!(fresh.warnings.is_empty());

		let soon = validator.validate_route_at(&route(Some(now + 60)), &request(), now);
		assert!(soon.is_valid);
		assert_eq!(soon.warnings[0].code, ValidationErrorCode::DeadlineApproaching);

		let expired = validator.validate_route_at(&route(Some(now)), &request(), now);
		assert_eq!(expired.error_codes(), vec![ValidationErrorCode::DeadlineExpired]);

		let open = validator.validate_route_at(&route(None), &request(), now);
		assert!(open.is_valid);
	}

	#[test]
	fn test_extreme_deadlines_do_not_overflow() {
		let validator = ExecutionValidator::new();
		let now = 1_700_000_000;

		let ancient = validator.validate_route_at(&route(Some(i64::MIN)), &request(), now);
		assert_eq!(ancient.error_codes(), vec![ValidationErrorCode::DeadlineExpired]);

		let distant = validator.validate_route_at(&route(Some(i64::MAX)), &request(), now);
		assert!(distant.is_valid);
		assert!(distant.warnings.is_empty());
	}

	#[test]
	fn test_route_mismatch() {
		let other = RouteRequest::new(ChainId::Arbitrum, ChainId::Base, Amount::from(1_000u64));
		let result = ExecutionValidator::new().validate_route(&route(None), &other);
		assert_eq!(
			result.error_codes(),
			vec![ValidationErrorCode::RouteMismatch, ValidationErrorCode::RouteMismatch]
		);
	}
}
