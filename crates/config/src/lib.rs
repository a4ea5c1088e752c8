//! Bridge Configuration
//!
//! Configuration management and startup utilities for the bridge route
//! aggregator.

pub mod configurable_value;
pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use configurable_value::{ConfigurableValue, ConfigurableValueError, ValueType};
pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	AggregationSettings, CompatibilitySettings, ConfigValidationError, LiquiditySettings,
	LogFormat, LoggingSettings, ProviderSettings, ProvidersSettings, RankingSettings, Settings,
};
pub use startup_logger::{log_service_info, log_settings_summary, log_startup_complete};
