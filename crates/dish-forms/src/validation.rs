//! Field validators.

use crate::label::humanize;

/// Validator that requires a non-empty value.
///
/// Only the empty string counts as missing; whitespace is literal input and
/// left for the remote endpoint to judge.
#[derive(Debug, Clone)]
pub struct RequiredValidator {
    message: String,
}

impl RequiredValidator {
    /// Creates a validator whose message names the field derived from `key`.
    pub fn for_key(key: &str) -> Self {
        Self {
            message: format!("{} is required", humanize(key)),
        }
    }

    /// Creates a new RequiredValidator with custom message.
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Validates a value and returns the error message if it is empty.
    pub fn validate(&self, value: &str) -> Result<(), String> {
        if value.is_empty() {
            Err(self.message.clone())
        } else {
            Ok(())
        }
    }

    /// Returns the error message for this validator.
    pub fn message(&self) -> &str {
        &self.message
    }
}
