//! Startup logging for the bridge route aggregator
//!
//! Logs build and environment details plus a summary of the effective
//! settings once tracing is initialized.

use std::env;
use tracing::{info, warn};

use crate::settings::Settings;

/// Logs service information at startup
pub fn log_service_info() {
	// Use the root package name, not the current crate
	let service_name = "bridge-aggregator";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Bridge Route Aggregator Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}
	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Filter: {}", rust_log);
	}

	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the effective configuration without header values
pub fn log_settings_summary(settings: &Settings) {
	info!(
		"⏱️ Adapter timeout: {}ms",
		settings.aggregation.timeout_ms
	);
	info!(
		"⚖️ Ranking weights: cost={} latency={} reliability={}",
		settings.ranking.cost_weight,
		settings.ranking.latency_weight,
		settings.ranking.reliability_weight
	);

	let enabled = settings.providers.enabled();
	if enabled.is_empty() {
		warn!("⚠️ No network providers enabled");
	}
	for provider in enabled {
		if let Some(provider_settings) = settings.providers.get(provider) {
			let headers: Vec<String> = provider_settings
				.headers
				.iter()
				.map(|(name, value)| format!("{}={}", name, value))
				.collect();
			info!(
				"🌉 {}: {} (timeout {}ms, headers [{}])",
				provider,
				provider_settings.endpoint,
				provider_settings.timeout_ms,
				headers.join(", ")
			);
		}
	}

	if let Some(filter) = &settings.aggregation.enabled_providers {
		let names: Vec<&str> = filter.iter().map(|p| p.as_str()).collect();
		info!("🔎 Aggregation restricted to: {}", names.join(", "));
	}
}

/// Logs completion of service wiring
pub fn log_startup_complete(adapter_count: usize) {
	info!("✅ Bridge Route Aggregator ready");
	info!("📡 {} adapters registered", adapter_count);
}
