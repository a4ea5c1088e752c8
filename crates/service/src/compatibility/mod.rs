//! Token/chain compatibility and route validation

pub mod engine;
pub mod routes;
pub mod types;

pub use engine::CompatibilityEngine;
pub use types::{
	BridgeStatus, CompatibilityConfig, CompatibilityRequest, CompatibleRoute,
	CompatibleRoutesResult, RegistryError, RejectedRoute,
};
