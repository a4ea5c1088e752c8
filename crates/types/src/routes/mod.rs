//! Route request and response models

pub mod normalized;
pub mod request;
pub mod route;

pub use normalized::{AggregatedRoutes, NormalizedRoute, ProviderFailure};
pub use request::RouteRequest;
pub use route::{BridgeRoute, RouteHop, RouteIntegrityError, TransactionData};
