//! Configuration loading utilities

use config::{Config, ConfigError, Environment, File};
use thiserror::Error;
use tracing::debug;

use crate::settings::{ConfigValidationError, Settings};

#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("Failed to load configuration: {0}")]
	Source(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load configuration from `config/config.*` plus `BRIDGE__*` overrides
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	load_config_from("config/config")
}

/// Load configuration from the given file stem plus environment overrides
///
/// The file is optional; every section falls back to its defaults. Nested
/// keys are separated by `__`, e.g. `BRIDGE__AGGREGATION__TIMEOUT_MS=5000`.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	debug!("Loading configuration from '{}' and BRIDGE__* environment", path);

	let source = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix("BRIDGE")
				.prefix_separator("__")
				.separator("__")
				.list_separator(",")
				.with_list_parse_key("aggregation.enabled_providers")
				.try_parsing(true),
		)
		.build()?;

	let settings: Settings = source.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}
