//! Closed validation error taxonomy and its static descriptor table

use serde::{Deserialize, Serialize};
use std::fmt;

/// How serious a validation finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Warning,
	Info,
}

/// Machine-readable validation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorCode {
	UnsupportedChainPair,
	UnsupportedTokenPair,
	TokenNotRegistered,
	AmountTooLow,
	AmountTooHigh,
	InsufficientLiquidity,
	BridgeUnavailable,
	BridgePaused,
	WrappedTokenMismatch,
	RouteNotSupported,
	ValidationFailed,
	// pre-flight
	InsufficientBalance,
	InsufficientAllowance,
	NetworkMismatch,
	InvalidAmount,
	RouteMismatch,
	DeadlineExpired,
	DeadlineApproaching,
}

/// Stable message, severity and remediation text for a code
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorDescriptor {
	pub message: &'static str,
	pub severity: Severity,
	pub suggestions: &'static [&'static str],
}

static UNSUPPORTED_CHAIN_PAIR: ErrorDescriptor = ErrorDescriptor {
	message: "The selected chain pair is not supported by this bridge",
	severity: Severity::Error,
	suggestions: &[
		"Choose a different source or destination chain",
		"Try another bridge provider",
	],
};

static UNSUPPORTED_TOKEN_PAIR: ErrorDescriptor = ErrorDescriptor {
	message: "No active mapping exists between these tokens",
	severity: Severity::Error,
	suggestions: &[
		"Select a token supported on both chains",
		"Check the alternatives for a supported pair",
	],
};

static TOKEN_NOT_REGISTERED: ErrorDescriptor = ErrorDescriptor {
	message: "Token is not registered for this chain",
	severity: Severity::Error,
	suggestions: &["Verify the token address or symbol", "Pick a listed token"],
};

static AMOUNT_TOO_LOW: ErrorDescriptor = ErrorDescriptor {
	message: "Amount is below the minimum accepted by the bridge",
	severity: Severity::Error,
	suggestions: &["Increase the transfer amount"],
};

static AMOUNT_TOO_HIGH: ErrorDescriptor = ErrorDescriptor {
	message: "Amount exceeds the maximum accepted by the bridge",
	severity: Severity::Error,
	suggestions: &["Reduce the transfer amount", "Split the transfer"],
};

static INSUFFICIENT_LIQUIDITY: ErrorDescriptor = ErrorDescriptor {
	message: "The bridge does not have enough liquidity for this transfer",
	severity: Severity::Error,
	suggestions: &["Reduce the transfer amount", "Try another bridge provider"],
};

static BRIDGE_UNAVAILABLE: ErrorDescriptor = ErrorDescriptor {
	message: "The bridge is currently unavailable",
	severity: Severity::Error,
	suggestions: &["Try again later", "Try another bridge provider"],
};

static BRIDGE_PAUSED: ErrorDescriptor = ErrorDescriptor {
	message: "The bridge is paused",
	severity: Severity::Error,
	suggestions: &["Wait for the bridge to resume", "Try another bridge provider"],
};

static WRAPPED_TOKEN_MISMATCH: ErrorDescriptor = ErrorDescriptor {
	message: "Wrapped token does not resolve to a known underlying token",
	severity: Severity::Warning,
	suggestions: &["Use the canonical token instead of the wrapped version"],
};

static ROUTE_NOT_SUPPORTED: ErrorDescriptor = ErrorDescriptor {
	message: "This route is not supported",
	severity: Severity::Error,
	suggestions: &["Request fresh routes"],
};

static VALIDATION_FAILED: ErrorDescriptor = ErrorDescriptor {
	message: "Validation failed",
	severity: Severity::Error,
	suggestions: &["Review the request parameters"],
};

static INSUFFICIENT_BALANCE: ErrorDescriptor = ErrorDescriptor {
	message: "Balance is lower than the transfer amount",
	severity: Severity::Error,
	suggestions: &["Top up the source account", "Reduce the transfer amount"],
};

static INSUFFICIENT_ALLOWANCE: ErrorDescriptor = ErrorDescriptor {
	message: "Token allowance is lower than the transfer amount",
	severity: Severity::Error,
	suggestions: &["Approve the bridge contract to spend the token"],
};

static NETWORK_MISMATCH: ErrorDescriptor = ErrorDescriptor {
	message: "Wallet is connected to a different network than the source chain",
	severity: Severity::Error,
	suggestions: &["Switch the wallet to the source chain"],
};

static INVALID_AMOUNT: ErrorDescriptor = ErrorDescriptor {
	message: "Transfer amount must be greater than zero",
	severity: Severity::Error,
	suggestions: &["Enter a positive amount"],
};

static ROUTE_MISMATCH: ErrorDescriptor = ErrorDescriptor {
	message: "Selected route does not match the requested chains",
	severity: Severity::Error,
	suggestions: &["Select a route for the requested chain pair"],
};

static DEADLINE_EXPIRED: ErrorDescriptor = ErrorDescriptor {
	message: "The route quote has expired",
	severity: Severity::Error,
	suggestions: &["Request a fresh quote"],
};

static DEADLINE_APPROACHING: ErrorDescriptor = ErrorDescriptor {
	message: "The route quote expires soon",
	severity: Severity::Warning,
	suggestions: &["Submit promptly or request a fresh quote"],
};

impl ValidationErrorCode {
	pub const ALL: [ValidationErrorCode; 18] = [
		ValidationErrorCode::UnsupportedChainPair,
		ValidationErrorCode::UnsupportedTokenPair,
		ValidationErrorCode::TokenNotRegistered,
		ValidationErrorCode::AmountTooLow,
		ValidationErrorCode::AmountTooHigh,
		ValidationErrorCode::InsufficientLiquidity,
		ValidationErrorCode::BridgeUnavailable,
		ValidationErrorCode::BridgePaused,
		ValidationErrorCode::WrappedTokenMismatch,
		ValidationErrorCode::RouteNotSupported,
		ValidationErrorCode::ValidationFailed,
		ValidationErrorCode::InsufficientBalance,
		ValidationErrorCode::InsufficientAllowance,
		ValidationErrorCode::NetworkMismatch,
		ValidationErrorCode::InvalidAmount,
		ValidationErrorCode::RouteMismatch,
		ValidationErrorCode::DeadlineExpired,
		ValidationErrorCode::DeadlineApproaching,
	];

	/// Static descriptor for this code
	pub fn descriptor(self) -> &'static ErrorDescriptor {
		match self {
			ValidationErrorCode::UnsupportedChainPair => &UNSUPPORTED_CHAIN_PAIR,
			ValidationErrorCode::UnsupportedTokenPair => &UNSUPPORTED_TOKEN_PAIR,
			ValidationErrorCode::TokenNotRegistered => &TOKEN_NOT_REGISTERED,
			ValidationErrorCode::AmountTooLow => &AMOUNT_TOO_LOW,
			ValidationErrorCode::AmountTooHigh => &AMOUNT_TOO_HIGH,
			ValidationErrorCode::InsufficientLiquidity => &INSUFFICIENT_LIQUIDITY,
			ValidationErrorCode::BridgeUnavailable => &BRIDGE_UNAVAILABLE,
			ValidationErrorCode::BridgePaused => &BRIDGE_PAUSED,
			ValidationErrorCode::WrappedTokenMismatch => &WRAPPED_TOKEN_MISMATCH,
			ValidationErrorCode::RouteNotSupported => &ROUTE_NOT_SUPPORTED,
			ValidationErrorCode::ValidationFailed => &VALIDATION_FAILED,
			ValidationErrorCode::InsufficientBalance => &INSUFFICIENT_BALANCE,
			ValidationErrorCode::InsufficientAllowance => &INSUFFICIENT_ALLOWANCE,
			ValidationErrorCode::NetworkMismatch => &NETWORK_MISMATCH,
			ValidationErrorCode::InvalidAmount => &INVALID_AMOUNT,
			ValidationErrorCode::RouteMismatch => &ROUTE_MISMATCH,
			ValidationErrorCode::DeadlineExpired => &DEADLINE_EXPIRED,
			ValidationErrorCode::DeadlineApproaching => &DEADLINE_APPROACHING,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			ValidationErrorCode::UnsupportedChainPair => "UNSUPPORTED_CHAIN_PAIR",
			ValidationErrorCode::UnsupportedTokenPair => "UNSUPPORTED_TOKEN_PAIR",
			ValidationErrorCode::TokenNotRegistered => "TOKEN_NOT_REGISTERED",
			ValidationErrorCode::AmountTooLow => "AMOUNT_TOO_LOW",
			ValidationErrorCode::AmountTooHigh => "AMOUNT_TOO_HIGH",
			ValidationErrorCode::InsufficientLiquidity => "INSUFFICIENT_LIQUIDITY",
			ValidationErrorCode::BridgeUnavailable => "BRIDGE_UNAVAILABLE",
			ValidationErrorCode::BridgePaused => "BRIDGE_PAUSED",
			ValidationErrorCode::WrappedTokenMismatch => "WRAPPED_TOKEN_MISMATCH",
			ValidationErrorCode::RouteNotSupported => "ROUTE_NOT_SUPPORTED",
			ValidationErrorCode::ValidationFailed => "VALIDATION_FAILED",
			ValidationErrorCode::InsufficientBalance => "INSUFFICIENT_BALANCE",
			ValidationErrorCode::InsufficientAllowance => "INSUFFICIENT_ALLOWANCE",
			ValidationErrorCode::NetworkMismatch => "NETWORK_MISMATCH",
			ValidationErrorCode::InvalidAmount => "INVALID_AMOUNT",
			ValidationErrorCode::RouteMismatch => "ROUTE_MISMATCH",
			ValidationErrorCode::DeadlineExpired => "DEADLINE_EXPIRED",
			ValidationErrorCode::DeadlineApproaching => "DEADLINE_APPROACHING",
		}
	}
}

impl fmt::Display for ValidationErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
