//! Global limits and defaults for configuration and runtime

/// Default per-adapter timeout for route queries in milliseconds
pub const DEFAULT_ADAPTER_TIMEOUT_MS: u64 = 15_000; // 15s

/// Minimum allowed per-adapter timeout in milliseconds
pub const MIN_ADAPTER_TIMEOUT_MS: u64 = 100; // 100ms

/// Maximum allowed per-adapter timeout in milliseconds
pub const MAX_ADAPTER_TIMEOUT_MS: u64 = 60_000; // 60s

/// Tolerance for ranking weights summing to one
pub const WEIGHT_SUM_EPSILON: f64 = 1e-3;

/// Default slippage tolerance in percent
pub const DEFAULT_SLIPPAGE_PERCENT: f64 = 0.5;

/// Routes whose deadline falls within this window produce a warning
pub const DEADLINE_WARNING_SECS: i64 = 60;

/// Default cap on suggested alternatives per validation call
pub const DEFAULT_MAX_ALTERNATIVES: usize = 3;

/// Liquidity score used when no snapshot exists for a route
pub const DEFAULT_LIQUIDITY_SCORE: f64 = 0.5;

/// Default time-to-live for liquidity snapshots in seconds
pub const DEFAULT_SNAPSHOT_TTL_SECS: u64 = 300; // 5 minutes

/// Latency clamp bounds used by the ranker (seconds)
pub const MIN_RANKED_LATENCY_SECS: f64 = 1.0;
pub const MAX_RANKED_LATENCY_SECS: f64 = 3600.0;

/// Decay constant for latency normalization (seconds)
pub const LATENCY_DECAY_SECS: f64 = 60.0;
