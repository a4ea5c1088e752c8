//! Wallet state supplied by the caller for pre-flight checks

use serde::{Deserialize, Serialize};

use crate::models::{Amount, ChainId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionContext {
	/// Chain the wallet is currently connected to, if any
	#[serde(default)]
	pub connected_chain: Option<ChainId>,
	pub user_address: String,
	/// Balance of the transferred token on the source chain
	pub balance: Amount,
	/// Allowance granted to the bridge contract; only meaningful on EVM
	#[serde(default)]
	pub allowance: Option<Amount>,
	#[serde(default)]
	pub is_native_token: bool,
}

impl ExecutionContext {
	pub fn new(user_address: impl Into<String>, connected_chain: ChainId, balance: Amount) -> Self {
		Self {
			connected_chain: Some(connected_chain),
			user_address: user_address.into(),
			balance,
			allowance: None,
			is_native_token: false,
		}
	}

	pub fn with_allowance(mut self, allowance: Amount) -> Self {
		self.allowance = Some(allowance);
		self
	}

	pub fn native(mut self) -> Self {
		self.is_native_token = true;
		self
	}

	pub fn disconnected(mut self) -> Self {
		self.connected_chain = None;
		self
	}
}
