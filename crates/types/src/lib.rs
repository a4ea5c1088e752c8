//! Bridge Types
//!
//! Shared models and traits for the cross-chain bridge route aggregator.
//! This crate contains the domain models, the validation taxonomy, the
//! adapter contract and the pure fee/latency estimators.

pub mod adapters;
pub mod constants;
pub mod estimation;
pub mod execution;
pub mod models;
pub mod ranking;
pub mod routes;
pub mod validation;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

pub use adapters::{AdapterError, AdapterResult, BridgeAdapter};

pub use models::{
	Amount, AmountParseError, BridgeProvider, ChainId, ChainKind, ChainParseError,
	NormalizedToken, ProviderParseError, TokenMappingEntry, TokenPair, TokenRef,
};

pub use routes::{
	AggregatedRoutes, BridgeRoute, NormalizedRoute, ProviderFailure, RouteHop,
	RouteIntegrityError, RouteRequest, TransactionData,
};

pub use ranking::{RankableRoute, RankingWeights, WeightsError, WeightsUpdate};

pub use validation::{
	AlternativeRoute, ErrorDescriptor, Severity, ValidationError, ValidationErrorCode,
	ValidationResult,
};

pub use estimation::{
	estimate_fees, estimate_latency, is_valid_amount, FeeEstimate, LatencyBreakdown,
	LatencyEstimate,
};

pub use execution::ExecutionContext;
