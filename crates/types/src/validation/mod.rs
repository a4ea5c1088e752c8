//! Structured validation errors shared by the compatibility engine and the
//! execution validator

pub mod codes;
pub mod result;

pub use codes::{ErrorDescriptor, Severity, ValidationErrorCode};
pub use result::{AlternativeRoute, ValidationError, ValidationResult};
