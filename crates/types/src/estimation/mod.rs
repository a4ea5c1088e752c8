//! Pure fee and latency estimators
//!
//! No I/O and no shared state: identical inputs always give identical
//! outputs.

pub mod fees;
pub mod latency;

pub use fees::{estimate_fees, is_valid_amount, FeeEstimate};
pub use latency::{estimate_latency, LatencyBreakdown, LatencyEstimate};
