//! Configuration values that are either given inline or read from the
//! environment, used for provider API keys and other header values

use serde::{Deserialize, Serialize};
use std::fmt;

/// A value taken verbatim or from a named environment variable
///
/// Accepts either the tagged form `{"type": "env", "value": "HOP_API_KEY"}`
/// or a bare string, where an `env:` prefix selects the environment.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(from = "RawConfigurableValue")]
pub struct ConfigurableValue {
	#[serde(rename = "type")]
	pub value_type: ValueType,
	/// Either the environment variable name or the value itself
	pub value: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
	Env,
	Plain,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConfigurableValue {
	Tagged {
		#[serde(rename = "type")]
		value_type: ValueType,
		value: String,
	},
	Bare(String),
}

impl From<RawConfigurableValue> for ConfigurableValue {
	fn from(raw: RawConfigurableValue) -> Self {
		match raw {
			RawConfigurableValue::Tagged { value_type, value } => Self { value_type, value },
			RawConfigurableValue::Bare(value) => ConfigurableValue::from(value.as_str()),
		}
	}
}

impl ConfigurableValue {
	pub fn from_env(env_var_name: &str) -> Self {
		Self {
			value_type: ValueType::Env,
			value: env_var_name.to_string(),
		}
	}

	pub fn from_plain(plain_value: &str) -> Self {
		Self {
			value_type: ValueType::Plain,
			value: plain_value.to_string(),
		}
	}

	/// Resolve the actual value, reading the environment for `Env` values
	pub fn resolve(&self) -> Result<String, ConfigurableValueError> {
		match self.value_type {
			ValueType::Env => std::env::var(&self.value).map_err(|_| {
				ConfigurableValueError::EnvironmentVariableNotFound(self.value.clone())
			}),
			ValueType::Plain => Ok(self.value.clone()),
		}
	}

	/// Description safe to log
	pub fn description(&self) -> String {
		match self.value_type {
			ValueType::Env => format!("environment variable '{}'", self.value),
			ValueType::Plain => "inline value".to_string(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurableValueError {
	#[error("Environment variable '{0}' not found")]
	EnvironmentVariableNotFound(String),
}

// Header values are usually credentials; never print them
impl fmt::Display for ConfigurableValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value_type {
			ValueType::Env => write!(f, "env:{}", self.value),
			ValueType::Plain => write!(f, "plain:[REDACTED]"),
		}
	}
}

impl From<&str> for ConfigurableValue {
	fn from(value: &str) -> Self {
		if let Some(env_var) = value.strip_prefix("env:") {
			Self::from_env(env_var)
		} else {
			Self::from_plain(value)
		}
	}
}
