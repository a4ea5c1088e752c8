//! Shared domain models

pub mod amount;
pub mod chain;
pub mod provider;
pub mod token;

pub use amount::{Amount, AmountParseError};
pub use chain::{ChainId, ChainKind, ChainParseError};
pub use provider::{BridgeProvider, ProviderParseError};
pub use token::{NormalizedToken, TokenMappingEntry, TokenPair, TokenRef};
