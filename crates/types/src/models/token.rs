//! Token identity and cross-chain token mapping models

use serde::{Deserialize, Serialize};

use super::{Amount, BridgeProvider, ChainId};

/// Lookup key for a token on a specific chain
///
/// Used to point a wrapped token at its underlying asset; it carries no
/// ownership of the referenced token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenRef {
	pub chain: ChainId,
	pub address: String,
}

impl TokenRef {
	pub fn new(chain: ChainId, address: impl AsRef<str>) -> Self {
		Self {
			chain,
			address: chain.normalize_identifier(address.as_ref()),
		}
	}
}

/// Token metadata with chain-normalized identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedToken {
	pub chain: ChainId,
	/// Contract address (EVM) or `CODE:ISSUER` asset id (Stellar), normalized per chain
	pub address: String,
	pub symbol: String,
	pub name: String,
	pub decimals: u8,
	pub is_native: bool,
	pub is_wrapped: bool,
	pub underlying_token: Option<TokenRef>,
}

impl NormalizedToken {
	pub fn new(
		chain: ChainId,
		address: impl AsRef<str>,
		symbol: impl Into<String>,
		name: impl Into<String>,
		decimals: u8,
	) -> Self {
		Self {
			chain,
			address: chain.normalize_identifier(address.as_ref()),
			symbol: symbol.into(),
			name: name.into(),
			decimals,
			is_native: false,
			is_wrapped: false,
			underlying_token: None,
		}
	}

	/// Mark the token as the chain's native asset
	pub fn native(mut self) -> Self {
		self.is_native = true;
		self
	}

	/// Mark the token as a wrapped claim on `underlying`
	pub fn wrapping(mut self, underlying: TokenRef) -> Self {
		self.is_wrapped = true;
		self.underlying_token = Some(underlying);
		self
	}

	pub fn token_ref(&self) -> TokenRef {
		TokenRef {
			chain: self.chain,
			address: self.address.clone(),
		}
	}

	pub fn address_key(&self) -> String {
		self.chain.normalize_identifier(&self.address)
	}

	pub fn symbol_key(&self) -> String {
		self.chain.normalize_identifier(&self.symbol)
	}

	/// True when `identifier` names this token by address or symbol
	pub fn matches(&self, identifier: &str) -> bool {
		let key = self.chain.normalize_identifier(identifier);
		key == self.address_key() || key == self.symbol_key()
	}
}

/// Common token definitions
impl NormalizedToken {
	pub fn usdc_ethereum() -> Self {
		Self::new(
			ChainId::Ethereum,
			"0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48",
			"USDC",
			"USD Coin",
			6,
		)
	}

	pub fn usdc_polygon() -> Self {
		Self::new(
			ChainId::Polygon,
			"0x3c499c542cEF5E3811e1192ce70d8cC03d5c3359",
			"USDC",
			"USD Coin",
			6,
		)
	}

	pub fn usdc_arbitrum() -> Self {
		Self::new(
			ChainId::Arbitrum,
			"0xaf88d065e77c8cC2239327C5EDb3A432268e5831",
			"USDC",
			"USD Coin",
			6,
		)
	}

	pub fn usdc_stellar() -> Self {
		Self::new(
			ChainId::Stellar,
			"USDC:GA5ZSEJYB37JRC5AVCIA5MOP4RHTM335X2KGX3IHOJAPP5RE34K4KZVN",
			"USDC",
			"USD Coin",
			7,
		)
	}

	pub fn xlm() -> Self {
		Self::new(ChainId::Stellar, "native", "XLM", "Stellar Lumens", 7).native()
	}

	pub fn eth() -> Self {
		Self::new(
			ChainId::Ethereum,
			"0x0000000000000000000000000000000000000000",
			"ETH",
			"Ether",
			18,
		)
		.native()
	}
}

/// A proposed source/destination token pair on one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	/// Address or symbol of the token on the source chain
	pub source_token: String,
	/// Address or symbol of the token on the destination chain
	pub destination_token: String,
	pub provider: BridgeProvider,
}

impl TokenPair {
	pub fn new(
		source_chain: ChainId,
		destination_chain: ChainId,
		source_token: impl Into<String>,
		destination_token: impl Into<String>,
		provider: BridgeProvider,
	) -> Self {
		Self {
			source_chain,
			destination_chain,
			source_token: source_token.into(),
			destination_token: destination_token.into(),
			provider,
		}
	}

	pub fn with_provider(&self, provider: BridgeProvider) -> Self {
		Self {
			provider,
			..self.clone()
		}
	}
}

/// Registered mapping between a source and destination token on one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMappingEntry {
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	pub source_token: NormalizedToken,
	pub destination_token: NormalizedToken,
	pub provider: BridgeProvider,
	pub is_active: bool,
	pub min_amount: Amount,
	pub max_amount: Amount,
	/// Destination units received per source unit
	pub conversion_rate: f64,
	pub bridge_token_id: Option<String>,
}

impl TokenMappingEntry {
	pub fn new(
		source_token: NormalizedToken,
		destination_token: NormalizedToken,
		provider: BridgeProvider,
		min_amount: Amount,
		max_amount: Amount,
	) -> Self {
		Self {
			source_chain: source_token.chain,
			destination_chain: destination_token.chain,
			source_token,
			destination_token,
			provider,
			is_active: true,
			min_amount,
			max_amount,
			conversion_rate: 1.0,
			bridge_token_id: None,
		}
	}

	pub fn with_conversion_rate(mut self, rate: f64) -> Self {
		self.conversion_rate = rate;
		self
	}

	pub fn with_bridge_token_id(mut self, id: impl Into<String>) -> Self {
		self.bridge_token_id = Some(id.into());
		self
	}

	pub fn inactive(mut self) -> Self {
		self.is_active = false;
		self
	}

	pub fn accepts_amount(&self, amount: &Amount) -> bool {
		amount >= &self.min_amount && amount <= &self.max_amount
	}

	/// True when this entry maps exactly the given token pair
	pub fn connects(&self, source: &NormalizedToken, destination: &NormalizedToken) -> bool {
		self.source_token.address_key() == source.address_key()
			&& self.destination_token.address_key() == destination.address_key()
	}
}
