//! Validation findings and their aggregate result

use serde::{Deserialize, Serialize};

use super::{Severity, ValidationErrorCode};
use crate::models::BridgeProvider;

/// One structured validation finding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
	pub code: ValidationErrorCode,
	pub message: String,
	/// Request field the finding refers to
	pub field: String,
	pub severity: Severity,
	#[serde(default)]
	pub suggestions: Vec<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub context: Option<serde_json::Value>,
}

impl ValidationError {
	/// Build a finding from the code's descriptor
	pub fn new(code: ValidationErrorCode, field: impl Into<String>) -> Self {
		let descriptor = code.descriptor();
		Self {
			code,
			message: descriptor.message.to_string(),
			field: field.into(),
			severity: descriptor.severity,
			suggestions: descriptor.suggestions.iter().map(|s| s.to_string()).collect(),
			context: None,
		}
	}

	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = message.into();
		self
	}

	/// Prepend a call-specific suggestion ahead of the defaults
	pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
		self.suggestions.insert(0, suggestion.into());
		self
	}

	pub fn with_context(mut self, context: serde_json::Value) -> Self {
		self.context = Some(context);
		self
	}

	pub fn as_warning(mut self) -> Self {
		self.severity = Severity::Warning;
		self
	}

	pub fn as_error(mut self) -> Self {
		self.severity = Severity::Error;
		self
	}

	pub fn is_error(&self) -> bool {
		self.severity == Severity::Error
	}
}

/// A provider or token substitution offered when validation fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeRoute {
	pub provider: BridgeProvider,
	pub source_token: String,
	pub destination_token: String,
	pub reason: String,
}

/// Accumulated findings for one validation call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
	pub is_valid: bool,
	pub errors: Vec<ValidationError>,
	pub warnings: Vec<ValidationError>,
	#[serde(default)]
	pub alternatives: Vec<AlternativeRoute>,
}

impl Default for ValidationResult {
	fn default() -> Self {
		Self::valid()
	}
}

impl ValidationResult {
	pub fn valid() -> Self {
		Self {
			is_valid: true,
			errors: Vec::new(),
			warnings: Vec::new(),
			alternatives: Vec::new(),
		}
	}

	/// Record a finding; errors invalidate the result, warnings and info do not
	pub fn push(&mut self, finding: ValidationError) {
		match finding.severity {
			Severity::Error => {
				self.is_valid = false;
				self.errors.push(finding);
			},
			Severity::Warning | Severity::Info => self.warnings.push(finding),
		}
	}

	pub fn merge(&mut self, other: ValidationResult) {
		self.is_valid &= other.is_valid;
		self.errors.extend(other.errors);
		self.warnings.extend(other.warnings);
		self.alternatives.extend(other.alternatives);
	}

	pub fn has_code(&self, code: ValidationErrorCode) -> bool {
		self.errors
			.iter()
			.chain(self.warnings.iter())
			.any(|finding| finding.code == code)
	}

	pub fn error_codes(&self) -> Vec<ValidationErrorCode> {
		self.errors.iter().map(|e| e.code).collect()
	}
}
