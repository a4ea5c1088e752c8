//! HTTP transport used by the network adapters
//!
//! Adapters never talk to reqwest directly; they go through
//! [`BridgeTransport`] so tests can substitute canned payloads.

use async_trait::async_trait;
use bridge_types::{AdapterError, AdapterResult};
use reqwest::{
	header::{HeaderMap, HeaderName, HeaderValue},
	Client,
};
use serde_json::Value;
use std::fmt::Debug;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for one provider API
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEndpoint {
	/// Base URL, without trailing slash
	pub base_url: String,
	pub timeout_ms: u64,
	pub headers: Vec<(String, String)>,
}

impl ProviderEndpoint {
	pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
		let base_url = base_url.into();
		Self {
			base_url: base_url.trim_end_matches('/').to_string(),
			timeout_ms,
			headers: Vec::new(),
		}
	}

	pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((key.into(), value.into()));
		self
	}

	/// Join a path onto the base URL
	pub fn url(&self, path: &str) -> String {
		format!("{}/{}", self.base_url, path.trim_start_matches('/'))
	}
}

/// "Make an HTTP call and parse JSON"
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BridgeTransport: Send + Sync + Debug {
	async fn get_json(&self, url: &str, query: &[(String, String)]) -> AdapterResult<Value>;

	async fn post_json(&self, url: &str, body: &Value) -> AdapterResult<Value>;
}

/// reqwest-backed transport with a shared client per provider
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	timeout_ms: u64,
}

impl HttpTransport {
	/// Create a transport with the endpoint's headers and request timeout
	pub fn new(endpoint: &ProviderEndpoint) -> AdapterResult<Self> {
		let mut headers = HeaderMap::new();
		headers.insert("Content-Type", HeaderValue::from_static("application/json"));
		headers.insert("Accept", HeaderValue::from_static("application/json"));
		headers.insert("User-Agent", HeaderValue::from_static("Bridge-Aggregator/1.0"));

		for (key, value) in &endpoint.headers {
			match (HeaderName::from_str(key), HeaderValue::from_str(value)) {
				(Ok(name), Ok(value)) => {
					headers.insert(name, value);
				},
				_ => warn!("Skipping invalid header '{}' for {}", key, endpoint.base_url),
			}
		}

		let client = Client::builder()
			.default_headers(headers)
			.timeout(Duration::from_millis(endpoint.timeout_ms))
			.pool_idle_timeout(Duration::from_secs(90))
			.build()
			.map_err(|e| AdapterError::ConfigError {
				reason: format!("Failed to build HTTP client: {}", e),
			})?;

		Ok(Self {
			client,
			timeout_ms: endpoint.timeout_ms,
		})
	}

	fn map_request_error(&self, err: reqwest::Error) -> AdapterError {
		if err.is_timeout() {
			AdapterError::Timeout {
				timeout_ms: self.timeout_ms,
			}
		} else if let Some(status) = err.status() {
			AdapterError::from_http_failure(status.as_u16())
		} else {
			AdapterError::Http {
				reason: err.to_string(),
			}
		}
	}

	async fn read_json(&self, response: reqwest::Response) -> AdapterResult<Value> {
		let status = response.status();
		if !status.is_success() {
			return Err(AdapterError::from_http_failure(status.as_u16()));
		}

		response
			.json::<Value>()
			.await
			.map_err(|e| match self.map_request_error(e) {
				AdapterError::Http { reason } => AdapterError::InvalidResponse { reason },
				other => other,
			})
	}
}

#[async_trait]
impl BridgeTransport for HttpTransport {
	async fn get_json(&self, url: &str, query: &[(String, String)]) -> AdapterResult<Value> {
		debug!("GET {} ({} query params)", url, query.len());
		let response = self
			.client
			.get(url)
			.query(query)
			.send()
			.await
			.map_err(|e| self.map_request_error(e))?;

		self.read_json(response).await
	}

	async fn post_json(&self, url: &str, body: &Value) -> AdapterResult<Value> {
		debug!("POST {}", url);
		let response = self
			.client
			.post(url)
			.json(body)
			.send()
			.await
			.map_err(|e| self.map_request_error(e))?;

		self.read_json(response).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_endpoint_url_joining() {
		let endpoint = ProviderEndpoint::new("https://api.hop.exchange/", 5_000);
		assert_eq!(endpoint.base_url, "https://api.hop.exchange");
		assert_eq!(endpoint.url("/v1/quote"), "https://api.hop.exchange/v1/quote");
		assert_eq!(endpoint.url("v1/quote"), "https://api.hop.exchange/v1/quote");
	}

	#[test]
	fn test_transport_construction_skips_bad_headers() {
		let endpoint = ProviderEndpoint::new("https://example.com", 1_000)
			.with_header("X-Api-Key", "secret")
			.with_header("bad header", "value");
		assert!(HttpTransport::new(&endpoint).is_ok());
	}
}
