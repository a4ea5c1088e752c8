//! Adapter contract shared by every bridge provider

pub mod errors;
pub mod traits;

pub use errors::AdapterError;
pub use traits::BridgeAdapter;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;
