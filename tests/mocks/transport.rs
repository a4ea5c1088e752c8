//! Canned provider responses behind the shared transport seam

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bridge_aggregator::adapters::{AdapterResult, BridgeTransport};
use bridge_aggregator::serde_json::Value;
use bridge_aggregator::AdapterError;

/// Transport answering by URL path suffix; unknown paths return 404
#[derive(Debug, Default)]
pub struct CannedTransport {
	responses: HashMap<String, Value>,
	calls: Mutex<Vec<String>>,
}

impl CannedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_response(mut self, path: &str, body: Value) -> Self {
		self.responses.insert(path.to_string(), body);
		self
	}

	/// URLs requested so far, in order
	pub fn calls(&self) -> Vec<String> {
		self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
	}

	fn respond(&self, url: &str) -> AdapterResult<Value> {
		if let Ok(mut calls) = self.calls.lock() {
			calls.push(url.to_string());
		}
		self.responses
			.iter()
			.find(|(path, _)| url.ends_with(path.as_str()))
			.map(|(_, body)| body.clone())
			.ok_or_else(|| AdapterError::from_http_failure(404))
	}
}

#[async_trait]
impl BridgeTransport for CannedTransport {
	async fn get_json(&self, url: &str, _query: &[(String, String)]) -> AdapterResult<Value> {
		self.respond(url)
	}

	async fn post_json(&self, url: &str, _body: &Value) -> AdapterResult<Value> {
		self.respond(url)
	}
}
