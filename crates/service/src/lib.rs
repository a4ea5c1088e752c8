//! Bridge Service
//!
//! Core logic for route aggregation, ranking, compatibility validation and
//! execution pre-flight checks.

pub mod aggregator;
pub mod compatibility;
pub mod execution;
pub mod normalizer;
pub mod ranker;

pub use aggregator::{AggregationOptions, AggregatorConfig, AggregatorStats, RouteAggregator};
pub use compatibility::{
	BridgeStatus, CompatibilityConfig, CompatibilityEngine, CompatibilityRequest, CompatibleRoute,
	CompatibleRoutesResult, RegistryError, RejectedRoute,
};
pub use execution::ExecutionValidator;
pub use normalizer::{normalize_route, normalize_routes};
pub use ranker::{normalize_cost, normalize_latency, RouteRanker, RouteScore};
