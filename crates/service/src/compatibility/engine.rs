//! Token and chain compatibility registries
//!
//! Every registry is a [`DashMap`], so updates are atomic per key and
//! readers never block writers on unrelated keys. There is no atomicity
//! across keys: a token registered concurrently with a mapping may be
//! observed before the mapping.

use bridge_adapters::AdapterRegistry;
use bridge_storage::LiquidityStore;
use bridge_types::{
	AlternativeRoute, BridgeAdapter, BridgeProvider, ChainId, NormalizedToken, TokenMappingEntry,
	TokenPair, TokenRef, ValidationError, ValidationErrorCode, ValidationResult,
};
use dashmap::DashMap;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use super::types::{BridgeStatus, CompatibilityConfig, RegistryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct MappingKey {
	pub source_chain: ChainId,
	pub destination_chain: ChainId,
	pub provider: BridgeProvider,
}

#[derive(Debug)]
pub struct CompatibilityEngine {
	pub(crate) config: CompatibilityConfig,
	chain_pairs: DashMap<BridgeProvider, HashSet<(ChainId, ChainId)>>,
	statuses: DashMap<BridgeProvider, BridgeStatus>,
	/// Keyed by chain and normalized address
	tokens: DashMap<(ChainId, String), NormalizedToken>,
	/// Normalized symbol to normalized address; the last registration wins
	symbols: DashMap<(ChainId, String), String>,
	mappings: DashMap<MappingKey, Vec<TokenMappingEntry>>,
	/// Underlying token to its wrapped variants
	wrapped: DashMap<TokenRef, Vec<TokenRef>>,
	pub(crate) liquidity: Option<Arc<dyn LiquidityStore>>,
}

impl CompatibilityEngine {
	pub fn new(config: CompatibilityConfig) -> Self {
		Self {
			config,
			chain_pairs: DashMap::new(),
			statuses: DashMap::new(),
			tokens: DashMap::new(),
			symbols: DashMap::new(),
			mappings: DashMap::new(),
			wrapped: DashMap::new(),
			liquidity: None,
		}
	}

	pub fn with_liquidity_store(mut self, store: Arc<dyn LiquidityStore>) -> Self {
		self.liquidity = Some(store);
		self
	}

	pub fn config(&self) -> &CompatibilityConfig {
		&self.config
	}

	// Chain pairs and status

	pub fn register_chain_pair(&self, provider: BridgeProvider, source: ChainId, destination: ChainId) {
		self.chain_pairs
			.entry(provider)
			.or_default()
			.insert((source, destination));
	}

	/// Seed chain-pair support from what an adapter declares
	pub fn register_adapter_pairs(&self, adapter: &dyn BridgeAdapter) -> usize {
		let pairs = adapter.supported_chain_pairs();
		let count = pairs.len();
		let mut entry = self.chain_pairs.entry(adapter.provider()).or_default();
		entry.extend(pairs);
		debug!("Registered {} chain pairs for {}", count, adapter.provider());
		count
	}

	/// Seed chain-pair support from every adapter in the registry
	pub fn register_registry_pairs(&self, registry: &AdapterRegistry) -> usize {
		registry
			.all()
			.iter()
			.map(|adapter| self.register_adapter_pairs(adapter.as_ref()))
			.sum()
	}

	pub fn supports_chain_pair(
		&self,
		provider: BridgeProvider,
		source: ChainId,
		destination: ChainId,
	) -> bool {
		self.chain_pairs
			.get(&provider)
			.map_or(false, |pairs| pairs.contains(&(source, destination)))
	}

	pub fn set_bridge_status(&self, provider: BridgeProvider, status: BridgeStatus) {
		info!(
			"Bridge {} status: available={} paused={}",
			provider, status.available, status.paused
		);
		self.statuses.insert(provider, status);
	}

	/// Current status; providers never set are available and not paused
	pub fn bridge_status(&self, provider: BridgeProvider) -> BridgeStatus {
		self.statuses
			.get(&provider)
			.map(|status| status.value().clone())
			.unwrap_or_default()
	}

	/// Chain pair supported and provider usable
	pub(crate) fn provider_usable(
		&self,
		provider: BridgeProvider,
		source: ChainId,
		destination: ChainId,
	) -> bool {
		self.supports_chain_pair(provider, source, destination)
			&& self.bridge_status(provider).is_usable()
	}

	// Tokens

	pub fn register_token(&self, token: NormalizedToken) -> Result<(), RegistryError> {
		if token.address.trim().is_empty() {
			return Err(RegistryError::InvalidToken {
				reason: "address is empty".to_string(),
			});
		}
		if token.symbol.trim().is_empty() {
			return Err(RegistryError::InvalidToken {
				reason: format!("symbol is empty for {}", token.address),
			});
		}

		let address_key = token.address_key();
		if let Some(underlying) = token.underlying_token.as_ref().filter(|_| token.is_wrapped) {
			let wrapped_ref = token.token_ref();
			let mut variants = self.wrapped.entry(underlying.clone()).or_default();
			if !variants.contains(&wrapped_ref) {
				variants.push(wrapped_ref);
			}
		}

		self.symbols
			.insert((token.chain, token.symbol_key()), address_key.clone());
		self.tokens.insert((token.chain, address_key), token);
		Ok(())
	}

	/// Register `wrapped` as a wrapped form of `underlying`
	pub fn register_wrapped_token(
		&self,
		wrapped: NormalizedToken,
		underlying: TokenRef,
	) -> Result<(), RegistryError> {
		self.register_token(wrapped.wrapping(underlying))
	}

	/// Look a token up by address or symbol
	pub fn get_token(&self, chain: ChainId, identifier: &str) -> Option<NormalizedToken> {
		let key = chain.normalize_identifier(identifier);
		if let Some(token) = self.tokens.get(&(chain, key.clone())) {
			return Some(token.value().clone());
		}
		let address = self.symbols.get(&(chain, key))?.value().clone();
		self.tokens.get(&(chain, address)).map(|token| token.value().clone())
	}

	/// Registered wrapped variants of `underlying` on `chain`
	pub fn wrapped_variants(&self, underlying: &TokenRef, chain: ChainId) -> Vec<NormalizedToken> {
		self.wrapped
			.get(underlying)
			.map(|variants| {
				variants
					.iter()
					.filter(|variant| variant.chain == chain)
					.filter_map(|variant| self.get_token(variant.chain, &variant.address))
					.collect()
			})
			.unwrap_or_default()
	}

	fn underlying_of(&self, token: &NormalizedToken) -> Option<NormalizedToken> {
		let underlying = token.underlying_token.as_ref()?;
		self.get_token(underlying.chain, &underlying.address)
	}

	// Mappings

	/// Insert or replace the mapping for a token pair on one provider
	///
	/// Tokens already in the registry replace the entry's copies so lookups
	/// return registered metadata.
	pub fn register_token_mapping(&self, mut entry: TokenMappingEntry) -> Result<(), RegistryError> {
		if entry.source_token.chain != entry.source_chain {
			return Err(RegistryError::ChainMismatch {
				expected: entry.source_chain,
				actual: entry.source_token.chain,
			});
		}
		if entry.destination_token.chain != entry.destination_chain {
			return Err(RegistryError::ChainMismatch {
				expected: entry.destination_chain,
				actual: entry.destination_token.chain,
			});
		}
		if entry.source_chain == entry.destination_chain {
			return Err(RegistryError::SameChain {
				chain: entry.source_chain,
			});
		}
		if entry.min_amount > entry.max_amount {
			return Err(RegistryError::InvalidBounds {
				min: entry.min_amount,
				max: entry.max_amount,
			});
		}
		if !entry.conversion_rate.is_finite() || entry.conversion_rate <= 0.0 {
			return Err(RegistryError::InvalidConversionRate {
				rate: entry.conversion_rate,
			});
		}

		if let Some(registered) = self.get_token(entry.source_chain, &entry.source_token.address) {
			entry.source_token = registered;
		}
		if let Some(registered) =
			self.get_token(entry.destination_chain, &entry.destination_token.address)
		{
			entry.destination_token = registered;
		}

		let key = MappingKey {
			source_chain: entry.source_chain,
			destination_chain: entry.destination_chain,
			provider: entry.provider,
		};
		debug!(
			"Registering {} mapping {} -> {} ({} -> {})",
			entry.provider,
			entry.source_token.symbol,
			entry.destination_token.symbol,
			entry.source_chain,
			entry.destination_chain
		);

		let mut entries = self.mappings.entry(key).or_default();
		entries.retain(|existing| !existing.connects(&entry.source_token, &entry.destination_token));
		entries.push(entry);
		Ok(())
	}

	/// First active mapping for the source token on this provider and direction
	pub fn get_mapping(
		&self,
		source_chain: ChainId,
		destination_chain: ChainId,
		provider: BridgeProvider,
		source_token: &str,
	) -> Option<TokenMappingEntry> {
		self.active_mappings_from(source_chain, destination_chain, provider, source_token)
			.into_iter()
			.next()
	}

	pub(crate) fn active_mappings_from(
		&self,
		source_chain: ChainId,
		destination_chain: ChainId,
		provider: BridgeProvider,
		source_token: &str,
	) -> Vec<TokenMappingEntry> {
		let key = MappingKey {
			source_chain,
			destination_chain,
			provider,
		};
		self.mappings
			.get(&key)
			.map(|entries| {
				entries
					.iter()
					.filter(|entry| entry.is_active && entry.source_token.matches(source_token))
					.cloned()
					.collect()
			})
			.unwrap_or_default()
	}

	/// Active mapping connecting exactly these two tokens
	pub(crate) fn find_mapping(
		&self,
		provider: BridgeProvider,
		source: &NormalizedToken,
		destination: &NormalizedToken,
	) -> Option<TokenMappingEntry> {
		let key = MappingKey {
			source_chain: source.chain,
			destination_chain: destination.chain,
			provider,
		};
		self.mappings.get(&key).and_then(|entries| {
			entries
				.iter()
				.find(|entry| entry.is_active && entry.connects(source, destination))
				.cloned()
		})
	}

	// Validation

	/// Check whether a token pair can be bridged by the pair's provider
	///
	/// All checks run and their findings accumulate. When the result is
	/// invalid and alternatives are enabled, other providers and wrapped
	/// equivalents are suggested.
	pub fn validate_token_pair(&self, pair: &TokenPair) -> ValidationResult {
		let mut result = ValidationResult::valid();
		let provider = pair.provider;
		let (source_chain, destination_chain) = (pair.source_chain, pair.destination_chain);

		// (a) chain pair
		if source_chain == destination_chain {
			result.push(
				ValidationError::new(ValidationErrorCode::UnsupportedChainPair, "destinationChain")
					.with_message(format!("Source and destination are both {}", source_chain)),
			);
		} else if !self.supports_chain_pair(provider, source_chain, destination_chain) {
			let mut finding =
				ValidationError::new(ValidationErrorCode::UnsupportedChainPair, "sourceChain")
					.with_message(format!(
						"{} does not support {} -> {}",
						provider.display_name(),
						source_chain,
						destination_chain
					))
					.with_context(json!({
						"provider": provider,
						"sourceChain": source_chain,
						"destinationChain": destination_chain,
					}));
			if self.supports_chain_pair(provider, destination_chain, source_chain) {
				finding = finding.with_suggestion(format!(
					"{} supports the reverse direction {} -> {}",
					provider.display_name(),
					destination_chain,
					source_chain
				));
			}
			result.push(finding);
		}

		// (b) availability
		let status = self.bridge_status(provider);
		if !status.available {
			result.push(status_finding(
				ValidationErrorCode::BridgeUnavailable,
				provider,
				&status,
			));
		} else if status.paused {
			result.push(status_finding(ValidationErrorCode::BridgePaused, provider, &status));
		}

		// (c) registration
		let source = self.get_token(source_chain, &pair.source_token);
		if source.is_none() {
			result.push(token_not_registered("sourceToken", source_chain, &pair.source_token));
		}
		let destination = self.get_token(destination_chain, &pair.destination_token);
		if destination.is_none() {
			result.push(token_not_registered(
				"destinationToken",
				destination_chain,
				&pair.destination_token,
			));
		}

		if let (Some(source), Some(destination)) = (&source, &destination) {
			// (d) mapping
			if self.find_mapping(provider, source, destination).is_none() {
				result.push(
					ValidationError::new(ValidationErrorCode::UnsupportedTokenPair, "destinationToken")
						.with_message(format!(
							"{} has no active mapping from {} on {} to {} on {}",
							provider.display_name(),
							source.symbol,
							source_chain,
							destination.symbol,
							destination_chain
						)),
				);
			}
		}

		// (e) wrapped tokens
		for (field, token) in [("sourceToken", &source), ("destinationToken", &destination)] {
			if let Some(token) = token.as_ref().filter(|t| t.is_wrapped) {
				if let Some(finding) = self.check_wrapped(field, token) {
					result.push(finding);
				}
			}
		}

		if !result.is_valid && self.config.suggest_alternatives {
			if let Some(source) = &source {
				result.alternatives = self.find_alternatives(pair, source, destination.as_ref());
			}
		}

		debug!(
			"Validated {} {} -> {}: valid={} errors={} warnings={}",
			provider,
			pair.source_token,
			pair.destination_token,
			result.is_valid,
			result.errors.len(),
			result.warnings.len()
		);
		result
	}

	fn check_wrapped(&self, field: &str, token: &NormalizedToken) -> Option<ValidationError> {
		if !self.config.allow_wrapped_tokens {
			return Some(
				ValidationError::new(ValidationErrorCode::WrappedTokenMismatch, field)
					.with_message(format!("Wrapped token {} is not allowed", token.symbol))
					.as_error(),
			);
		}
		if self.underlying_of(token).is_none() {
			let underlying = token
				.underlying_token
				.as_ref()
				.map(|u| format!("{} on {}", u.address, u.chain))
				.unwrap_or_else(|| "unknown".to_string());
			return Some(
				ValidationError::new(ValidationErrorCode::WrappedTokenMismatch, field)
					.with_message(format!(
						"Underlying token {} of wrapped {} is not registered",
						underlying, token.symbol
					))
					.as_warning(),
			);
		}
		None
	}

	fn find_alternatives(
		&self,
		pair: &TokenPair,
		source: &NormalizedToken,
		destination: Option<&NormalizedToken>,
	) -> Vec<AlternativeRoute> {
		let mut providers = BridgeProvider::ALL.to_vec();
		providers.sort_by_key(|p| p.preference_rank());
		let usable: Vec<BridgeProvider> = providers
			.into_iter()
			.filter(|p| self.provider_usable(*p, pair.source_chain, pair.destination_chain))
			.collect();

		let mut alternatives: Vec<AlternativeRoute> = Vec::new();
		let mut push = |alternative: AlternativeRoute| {
			let duplicate = alternatives.iter().any(|existing| {
				existing.provider == alternative.provider
					&& existing.destination_token == alternative.destination_token
			});
			if !duplicate {
				alternatives.push(alternative);
			}
		};

		// Same tokens on another provider
		for provider in usable.iter().filter(|p| **p != pair.provider) {
			let mapping = match destination {
				Some(destination) => self.find_mapping(*provider, source, destination),
				None => self
					.active_mappings_from(
						pair.source_chain,
						pair.destination_chain,
						*provider,
						&source.address,
					)
					.into_iter()
					.next(),
			};
			if let Some(mapping) = mapping {
				push(AlternativeRoute {
					provider: *provider,
					source_token: mapping.source_token.address.clone(),
					destination_token: mapping.destination_token.address.clone(),
					reason: format!(
						"{} bridges {} to {}",
						provider.display_name(),
						mapping.source_token.symbol,
						mapping.destination_token.symbol
					),
				});
			}
		}

		// Wrapped equivalents on the destination chain
		let mut underlying_refs = vec![source.token_ref()];
		if let Some(underlying) = &source.underlying_token {
			underlying_refs.push(underlying.clone());
		}
		if let Some(destination) = destination {
			underlying_refs.push(destination.token_ref());
		}
		for underlying in &underlying_refs {
			for variant in self.wrapped_variants(underlying, pair.destination_chain) {
				for provider in &usable {
					if let Some(mapping) = self.find_mapping(*provider, source, &variant) {
						push(AlternativeRoute {
							provider: *provider,
							source_token: mapping.source_token.address.clone(),
							destination_token: variant.address.clone(),
							reason: format!(
								"Wrapped equivalent {} is available via {}",
								variant.symbol,
								provider.display_name()
							),
						});
					}
				}
			}
		}

		alternatives.truncate(self.config.max_alternatives);
		alternatives
	}
}

fn status_finding(
	code: ValidationErrorCode,
	provider: BridgeProvider,
	status: &BridgeStatus,
) -> ValidationError {
	let state = if code == ValidationErrorCode::BridgePaused {
		"paused"
	} else {
		"unavailable"
	};
	let message = match &status.reason {
		Some(reason) => format!("{} is {}: {}", provider.display_name(), state, reason),
		None => format!("{} is {}", provider.display_name(), state),
	};
	ValidationError::new(code, "provider")
		.with_message(message)
		.with_context(json!({ "provider": provider }))
}

fn token_not_registered(field: &str, chain: ChainId, identifier: &str) -> ValidationError {
	ValidationError::new(ValidationErrorCode::TokenNotRegistered, field)
		.with_message(format!("Token {} is not registered on {}", identifier, chain))
		.with_context(json!({ "chain": chain, "token": identifier }))
}
