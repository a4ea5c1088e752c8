//! Error types for adapter operations

use thiserror::Error;

use crate::models::BridgeProvider;

/// Adapter operation errors
///
/// Adapters absorb most of these internally and answer with an empty route
/// list; only `Timeout` is expected to reach the aggregator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
	#[error("Adapter already registered: {provider}")]
	AlreadyRegistered { provider: BridgeProvider },

	#[error("Adapter not found: {provider}")]
	NotFound { provider: BridgeProvider },

	#[error("HTTP request failed: {reason}")]
	Http { reason: String },

	#[error("HTTP {status_code}: {reason}")]
	HttpStatusError { status_code: u16, reason: String },

	#[error("Timeout occurred after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("Invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("Configuration error: {reason}")]
	ConfigError { reason: String },

	#[error("Adapter is unhealthy: {provider} - {reason}")]
	Unhealthy {
		provider: BridgeProvider,
		reason: String,
	},

	#[error("Serialization error: {0}")]
	Serialization(String),
}

impl AdapterError {
	/// Extract HTTP status code from the error if available
	pub fn status_code(&self) -> Option<u16> {
		match self {
			AdapterError::HttpStatusError { status_code, .. } => Some(*status_code),
			_ => None,
		}
	}

	/// Create an HTTP failure error from response status with default reason
	pub fn from_http_failure(status_code: u16) -> Self {
		let reason = match status_code {
			400 => "Bad Request".to_string(),
			401 => "Unauthorized".to_string(),
			403 => "Forbidden".to_string(),
			404 => "Not Found".to_string(),
			408 => "Request Timeout".to_string(),
			429 => "Too Many Requests".to_string(),
			500 => "Internal Server Error".to_string(),
			502 => "Bad Gateway".to_string(),
			503 => "Service Unavailable".to_string(),
			504 => "Gateway Timeout".to_string(),
			_ => format!("HTTP Error {}", status_code),
		};

		Self::HttpStatusError {
			status_code,
			reason,
		}
	}

	/// Machine-readable code recorded in provider failure entries
	pub fn code(&self) -> &'static str {
		match self {
			AdapterError::AlreadyRegistered { .. } => "ALREADY_REGISTERED",
			AdapterError::NotFound { .. } => "NOT_FOUND",
			AdapterError::Http { .. } => "HTTP_ERROR",
			AdapterError::HttpStatusError { .. } => "HTTP_STATUS",
			AdapterError::Timeout { .. } => "TIMEOUT",
			AdapterError::InvalidResponse { .. } => "INVALID_RESPONSE",
			AdapterError::ConfigError { .. } => "CONFIG_ERROR",
			AdapterError::Unhealthy { .. } => "UNHEALTHY",
			AdapterError::Serialization(_) => "SERIALIZATION_ERROR",
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, AdapterError::Timeout { .. })
	}
}

impl From<serde_json::Error> for AdapterError {
	fn from(err: serde_json::Error) -> Self {
		AdapterError::Serialization(err.to_string())
	}
}
