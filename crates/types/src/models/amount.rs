//! Arbitrary-precision token amounts encoded as decimal strings

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when parsing an amount from its decimal representation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountParseError {
	#[error("Amount cannot be empty")]
	Empty,

	#[error("Amount must contain only digits: {value}")]
	InvalidDigits { value: String },
}

/// Unsigned integer amount in the token's smallest unit
///
/// Amounts never go negative: subtraction is only available through
/// [`Amount::checked_sub`], which reports underflow instead of clamping.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(BigUint);

impl Amount {
	pub fn zero() -> Self {
		Self(BigUint::zero())
	}

	pub fn from_biguint(value: BigUint) -> Self {
		Self(value)
	}

	pub fn as_biguint(&self) -> &BigUint {
		&self.0
	}

	/// Parse a base-10 unsigned integer string
	pub fn parse(value: &str) -> Result<Self, AmountParseError> {
		let trimmed = value.trim();
		if trimmed.is_empty() {
			return Err(AmountParseError::Empty);
		}
		if !trimmed.chars().all(|c| c.is_ascii_digit()) {
			return Err(AmountParseError::InvalidDigits {
				value: value.to_string(),
			});
		}

		BigUint::parse_bytes(trimmed.as_bytes(), 10)
			.map(Self)
			.ok_or_else(|| AmountParseError::InvalidDigits {
				value: value.to_string(),
			})
	}

	pub fn is_zero(&self) -> bool {
		self.0.is_zero()
	}

	/// Subtract `other`, returning `None` when the result would be negative
	pub fn checked_sub(&self, other: &Amount) -> Option<Amount> {
		if self.0 >= other.0 {
			Some(Self(&self.0 - &other.0))
		} else {
			None
		}
	}

	/// Apply a basis-point rate, rounding down
	pub fn mul_bps(&self, bps: u64) -> Amount {
		Self(&self.0 * BigUint::from(bps) / BigUint::from(10_000u32))
	}

	/// Share of `total` represented by this amount, in percent
	///
	/// This is the single fee-percentage computation used across the crate.
	/// The result is clamped to `[0, 100]` and is zero when `total` is zero.
	pub fn percentage_of(&self, total: &Amount) -> f64 {
		if total.is_zero() {
			return 0.0;
		}
		if self.0 >= total.0 {
			return 100.0;
		}

		// six decimal places of precision before converting to float
		let scaled = &self.0 * BigUint::from(100_000_000u64) / &total.0;
		let pct = scaled.to_f64().unwrap_or(0.0) / 1_000_000.0;
		pct.clamp(0.0, 100.0)
	}

	/// Lossy conversion for scoring and display purposes
	pub fn to_f64(&self) -> f64 {
		self.0.to_f64().unwrap_or(f64::MAX)
	}

	pub fn to_u128(&self) -> Option<u128> {
		self.0.to_u128()
	}
}

impl fmt::Display for Amount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl FromStr for Amount {
	type Err = AmountParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl From<u64> for Amount {
	fn from(value: u64) -> Self {
		Self(BigUint::from(value))
	}
}

impl From<u128> for Amount {
	fn from(value: u128) -> Self {
		Self(BigUint::from(value))
	}
}

impl Add for Amount {
	type Output = Amount;

	fn add(self, rhs: Amount) -> Amount {
		Self(self.0 + rhs.0)
	}
}

impl Add<&Amount> for Amount {
	type Output = Amount;

	fn add(self, rhs: &Amount) -> Amount {
		Self(self.0 + &rhs.0)
	}
}

impl<'a> Add<&'a Amount> for &'a Amount {
	type Output = Amount;

	fn add(self, rhs: &'a Amount) -> Amount {
		Amount(&self.0 + &rhs.0)
	}
}

impl Sum for Amount {
	fn sum<I: Iterator<Item = Amount>>(iter: I) -> Self {
		iter.fold(Amount::zero(), |acc, next| acc + next)
	}
}

// Serialized as a decimal string to preserve precision
impl serde::Serialize for Amount {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.0.to_string())
	}
}

impl<'de> serde::Deserialize<'de> for Amount {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Amount::parse(&value).map_err(serde::de::Error::custom)
	}
}
