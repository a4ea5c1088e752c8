//! Configuration settings structures

use bridge_types::constants::limits::{
	DEFAULT_ADAPTER_TIMEOUT_MS, DEFAULT_LIQUIDITY_SCORE, DEFAULT_MAX_ALTERNATIVES,
	DEFAULT_SNAPSHOT_TTL_SECS, MAX_ADAPTER_TIMEOUT_MS, MIN_ADAPTER_TIMEOUT_MS,
};
use bridge_types::{BridgeProvider, RankingWeights, WeightsError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

use crate::configurable_value::{ConfigurableValue, ConfigurableValueError};

/// Rejected configuration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigValidationError {
	#[error("{field} must be between {min} and {max} ms, got {value}")]
	InvalidTimeout {
		field: String,
		value: u64,
		min: u64,
		max: u64,
	},

	#[error("Invalid ranking weights: {0}")]
	InvalidWeights(#[from] WeightsError),

	#[error("Invalid endpoint for {provider}: {reason}")]
	InvalidEndpoint {
		provider: BridgeProvider,
		reason: String,
	},

	#[error("Invalid header {header} for {provider}: {source}")]
	UnresolvedHeader {
		provider: BridgeProvider,
		header: String,
		source: ConfigurableValueError,
	},

	#[error("Invalid value for {field}: {reason}")]
	InvalidValue { field: String, reason: String },
}

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
	pub aggregation: AggregationSettings,
	pub ranking: RankingSettings,
	pub providers: ProvidersSettings,
	pub compatibility: CompatibilitySettings,
	pub liquidity: LiquiditySettings,
	pub logging: LoggingSettings,
}

/// Fan-out behavior of the aggregator
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AggregationSettings {
	/// Per-adapter timeout in milliseconds
	pub timeout_ms: u64,
	/// Restrict aggregation to these providers; `None` queries all registered
	pub enabled_providers: Option<Vec<BridgeProvider>>,
}

impl Default for AggregationSettings {
	fn default() -> Self {
		Self {
			timeout_ms: DEFAULT_ADAPTER_TIMEOUT_MS,
			enabled_providers: None,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RankingSettings {
	pub cost_weight: f64,
	pub latency_weight: f64,
	pub reliability_weight: f64,
}

impl Default for RankingSettings {
	fn default() -> Self {
		let weights = RankingWeights::default();
		Self {
			cost_weight: weights.cost_weight(),
			latency_weight: weights.latency_weight(),
			reliability_weight: weights.reliability_weight(),
		}
	}
}

impl RankingSettings {
	pub fn weights(&self) -> Result<RankingWeights, WeightsError> {
		RankingWeights::new(self.cost_weight, self.latency_weight, self.reliability_weight)
	}
}

/// Connection settings for one provider API
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
	pub endpoint: String,
	#[serde(default = "default_enabled")]
	pub enabled: bool,
	#[serde(default = "default_provider_timeout")]
	pub timeout_ms: u64,
	#[serde(default)]
	pub headers: BTreeMap<String, ConfigurableValue>,
}

fn default_enabled() -> bool {
	true
}

fn default_provider_timeout() -> u64 {
	DEFAULT_ADAPTER_TIMEOUT_MS
}

impl ProviderSettings {
	pub fn new(endpoint: impl Into<String>) -> Self {
		Self {
			endpoint: endpoint.into(),
			enabled: true,
			timeout_ms: DEFAULT_ADAPTER_TIMEOUT_MS,
			headers: BTreeMap::new(),
		}
	}

	/// Header values with environment references resolved
	pub fn resolved_headers(&self) -> Result<Vec<(String, String)>, (String, ConfigurableValueError)> {
		self.headers
			.iter()
			.map(|(name, value)| {
				value
					.resolve()
					.map(|resolved| (name.clone(), resolved))
					.map_err(|e| (name.clone(), e))
			})
			.collect()
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProvidersSettings {
	pub hop: ProviderSettings,
	pub layerzero: ProviderSettings,
	pub stellar: ProviderSettings,
}

impl Default for ProvidersSettings {
	fn default() -> Self {
		Self {
			hop: ProviderSettings::new("https://api.hop.exchange"),
			layerzero: ProviderSettings::new("https://api.layerzero.network"),
			stellar: ProviderSettings::new("https://bridge.stellar.org/api"),
		}
	}
}

impl ProvidersSettings {
	pub fn get(&self, provider: BridgeProvider) -> Option<&ProviderSettings> {
		match provider {
			BridgeProvider::Hop => Some(&self.hop),
			BridgeProvider::LayerZero => Some(&self.layerzero),
			BridgeProvider::Stellar => Some(&self.stellar),
			BridgeProvider::Mock => None,
		}
	}

	/// Network providers that are switched on
	pub fn enabled(&self) -> Vec<BridgeProvider> {
		BridgeProvider::ALL
			.into_iter()
			.filter(|provider| self.get(*provider).is_some_and(|p| p.enabled))
			.collect()
	}
}

/// Behavior of token-pair validation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CompatibilitySettings {
	pub allow_wrapped_tokens: bool,
	pub suggest_alternatives: bool,
	pub max_alternatives: usize,
	/// Liquidity score assumed when no snapshot is known
	pub default_liquidity_score: f64,
}

impl Default for CompatibilitySettings {
	fn default() -> Self {
		Self {
			allow_wrapped_tokens: true,
			suggest_alternatives: true,
			max_alternatives: DEFAULT_MAX_ALTERNATIVES,
			default_liquidity_score: DEFAULT_LIQUIDITY_SCORE,
		}
	}
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LiquiditySettings {
	/// Snapshot time-to-live in seconds; zero keeps snapshots forever
	pub snapshot_ttl_secs: u64,
}

impl Default for LiquiditySettings {
	fn default() -> Self {
		Self {
			snapshot_ttl_secs: DEFAULT_SNAPSHOT_TTL_SECS,
		}
	}
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Settings {
	/// Reject settings the services could not run with
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		check_timeout("aggregation.timeout_ms", self.aggregation.timeout_ms)?;
		self.ranking.weights()?;

		for provider in BridgeProvider::ALL {
			let Some(settings) = self.providers.get(provider) else {
				continue;
			};
			if !settings.enabled {
				continue;
			}
			check_timeout(
				&format!("providers.{}.timeout_ms", provider),
				settings.timeout_ms,
			)?;
			check_endpoint(provider, &settings.endpoint)?;
		}

		if let Some(enabled) = &self.aggregation.enabled_providers {
			if enabled.is_empty() {
				return Err(ConfigValidationError::InvalidValue {
					field: "aggregation.enabled_providers".to_string(),
					reason: "must list at least one provider when set".to_string(),
				});
			}
		}

		let score = self.compatibility.default_liquidity_score;
		if !score.is_finite() || !(0.0..=1.0).contains(&score) {
			return Err(ConfigValidationError::InvalidValue {
				field: "compatibility.default_liquidity_score".to_string(),
				reason: format!("{} is outside [0, 1]", score),
			});
		}

		Ok(())
	}

	/// Resolved headers for an enabled provider
	pub fn provider_headers(
		&self,
		provider: BridgeProvider,
	) -> Result<Vec<(String, String)>, ConfigValidationError> {
		let Some(settings) = self.providers.get(provider) else {
			return Ok(Vec::new());
		};
		settings
			.resolved_headers()
			.map_err(|(header, source)| ConfigValidationError::UnresolvedHeader {
				provider,
				header,
				source,
			})
	}
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigValidationError> {
	if !(MIN_ADAPTER_TIMEOUT_MS..=MAX_ADAPTER_TIMEOUT_MS).contains(&value) {
		return Err(ConfigValidationError::InvalidTimeout {
			field: field.to_string(),
			value,
			min: MIN_ADAPTER_TIMEOUT_MS,
			max: MAX_ADAPTER_TIMEOUT_MS,
		});
	}
	Ok(())
}

fn check_endpoint(provider: BridgeProvider, endpoint: &str) -> Result<(), ConfigValidationError> {
	let url = Url::parse(endpoint).map_err(|e| ConfigValidationError::InvalidEndpoint {
		provider,
		reason: format!("'{}' is not a valid URL: {}", endpoint, e),
	})?;
	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigValidationError::InvalidEndpoint {
			provider,
			reason: format!("unsupported scheme '{}'", url.scheme()),
		});
	}
	Ok(())
}
