//! Centralized mocks and fixtures for integration tests

#![allow(dead_code)]

pub mod adapters;
pub mod fixtures;
pub mod transport;

#[allow(unused_imports)]
pub use adapters::{CallTracker, TimingControlledAdapter};
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use transport::CannedTransport;
