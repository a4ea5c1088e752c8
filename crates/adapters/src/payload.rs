//! Lenient helpers for reading provider payloads
//!
//! Provider APIs disagree on whether amounts are strings or numbers and
//! routinely omit fields. Every helper here answers `None` rather than
//! failing, so adapters can degrade to "no route".

use bridge_types::{AdapterResult, Amount, BridgeProvider, RouteRequest};
use serde_json::Value;
use tracing::warn;

/// Apply the adapter failure policy to a transport result
///
/// Timeouts propagate; every other transport failure is logged and turned
/// into "no payload".
pub fn absorb_failure(
	provider: BridgeProvider,
	result: AdapterResult<Value>,
) -> AdapterResult<Option<Value>> {
	match result {
		Ok(payload) => Ok(Some(payload)),
		Err(e) if e.is_timeout() => Err(e),
		Err(e) => {
			warn!("{} request failed, returning no routes: {}", provider, e);
			Ok(None)
		},
	}
}

/// Read an amount encoded as a decimal string or a non-negative integer
pub fn amount_from(value: Option<&Value>) -> Option<Amount> {
	match value? {
		Value::String(s) => Amount::parse(s).ok(),
		Value::Number(n) => n.as_u64().map(Amount::from),
		_ => None,
	}
}

/// Read a non-negative whole number of seconds
pub fn seconds_from(value: Option<&Value>) -> Option<u64> {
	match value? {
		Value::Number(n) => n
			.as_u64()
			.or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f.round() as u64)),
		Value::String(s) => s.parse().ok(),
		_ => None,
	}
}

pub fn f64_from(value: Option<&Value>) -> Option<f64> {
	match value? {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.parse().ok(),
		_ => None,
	}
	.filter(|f| f.is_finite())
}

pub fn str_from(value: Option<&Value>) -> Option<&str> {
	value?.as_str()
}

/// Deterministic route id for the `index`th route a provider returns
pub fn route_id(provider: BridgeProvider, request: &RouteRequest, index: usize) -> String {
	format!("{}:{}:{}", provider, request.pair_label(), index)
}
