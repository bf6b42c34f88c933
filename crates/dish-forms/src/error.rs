//! Error types for forms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Form-specific errors.
#[derive(Debug, Error)]
pub enum FormError {
    /// A required, visible field is still empty.
    #[error("form is not valid: a required field is empty")]
    InvalidForm,

    /// A submission is already waiting on the transport.
    #[error("a submission is already in flight")]
    SubmissionInFlight,

    /// The schema definition is inconsistent.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Schema or payload (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while building or loading a schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    /// Two fields share the same key.
    #[error("duplicate field key: {0}")]
    DuplicateKey(String),

    /// Two fields map to the same payload key.
    #[error("duplicate payload key: {0}")]
    DuplicatePayloadKey(String),

    /// A visibility condition points at a field that does not exist.
    #[error("field {field} has a visibility condition on unknown field {target}")]
    UnknownConditionField { field: String, target: String },

    /// An enum field was declared without options.
    #[error("enum field {0} has no options")]
    MissingOptions(String),

    /// `min` is greater than `max`.
    #[error("field {field} has min {min} greater than max {max}")]
    InvalidBounds { field: String, min: f64, max: f64 },
}

/// Field errors reported by the remote endpoint, keyed by the remote field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ServerErrors {
    /// Creates a new empty ServerErrors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error for a field.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// Returns whether there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the number of fields with errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Returns errors for a specific field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// Returns all errors as a flat list of `(field, message)` pairs.
    pub fn all_errors(&self) -> Vec<(&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages
                    .iter()
                    .map(move |msg| (field.as_str(), msg.as_str()))
            })
            .collect()
    }

    /// Reads an error body of the shape `{"field": ["message", ...]}`.
    ///
    /// A bare string value is accepted as a single message. Anything else
    /// (non-object bodies, numbers, nested objects) yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut errors = Self::new();
        for (field, messages) in object {
            match messages {
                Value::String(message) => errors.add(field, message.as_str()),
                Value::Array(items) => {
                    for item in items {
                        errors.add(field, item.as_str()?);
                    }
                }
                _ => return None,
            }
        }
        Some(errors)
    }
}

impl std::fmt::Display for ServerErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (field, message) in self.all_errors() {
            writeln!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Failure signalled by a [`Transport`](crate::Transport).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The remote endpoint rejected the payload with per-field errors.
    #[error("submission rejected: {} field(s) with errors", .0.len())]
    Rejected(ServerErrors),

    /// A response arrived but its body was not a usable error mapping.
    #[error("malformed error response (status {status}): {detail}")]
    Malformed { status: u16, detail: String },

    /// No response was received at all.
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

impl TransportError {
    /// Classifies a failed HTTP-like response from its status and raw body.
    pub fn from_response(status: u16, body: Option<&str>) -> Self {
        let Some(body) = body.filter(|b| !b.trim().is_empty()) else {
            return Self::Malformed {
                status,
                detail: "empty response body".to_string(),
            };
        };

        match serde_json::from_str::<Value>(body) {
            Ok(value) => match ServerErrors::from_value(&value) {
                Some(errors) => Self::Rejected(errors),
                None => Self::Malformed {
                    status,
                    detail: "expected an object of field error lists".to_string(),
                },
            },
            Err(err) => Self::Malformed {
                status,
                detail: err.to_string(),
            },
        }
    }

    /// Returns the field errors to display for this failure.
    ///
    /// Only [`TransportError::Rejected`] carries field errors; every other
    /// failure maps to an empty set.
    pub fn into_server_errors(self) -> ServerErrors {
        match self {
            Self::Rejected(errors) => errors,
            Self::Malformed { .. } | Self::Unavailable(_) => ServerErrors::new(),
        }
    }
}

/// Result type alias for form operations.
pub type Result<T> = std::result::Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_add_and_flatten() {
        let mut errors = ServerErrors::new();
        errors.add("name", "Name already exists");
        errors.add("name", "Name is too long");
        errors.add("diameter", "Must be positive");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name").map(<[String]>::len), Some(2));
        assert_eq!(
            errors.all_errors(),
            vec![
                ("diameter", "Must be positive"),
                ("name", "Name already exists"),
                ("name", "Name is too long"),
            ]
        );
    }

    #[test]
    fn test_server_errors_display() {
        let mut errors = ServerErrors::new();
        errors.add("name", "Name already exists");
        assert_eq!(errors.to_string(), "name: Name already exists\n");
    }

    #[test]
    fn test_from_response_structured_body() {
        let err = TransportError::from_response(400, Some(r#"{"name": ["Name already exists"]}"#));
        let TransportError::Rejected(errors) = err else {
            panic!("expected a rejection");
        };
        assert_eq!(
            errors.get("name"),
            Some(&["Name already exists".to_string()][..])
        );
    }

    #[test]
    fn test_from_response_accepts_bare_string() {
        let err = TransportError::from_response(400, Some(r#"{"type": "Unknown dish type"}"#));
        assert_eq!(
            err.into_server_errors().all_errors(),
            vec![("type", "Unknown dish type")]
        );
    }

    #[test]
    fn test_from_response_malformed_bodies() {
        for body in [None, Some(""), Some("<html>502</html>"), Some("[1, 2]"), Some(r#"{"name": 3}"#)] {
            let err = TransportError::from_response(502, body);
            assert!(
                matches!(err, TransportError::Malformed { status: 502, .. }),
                "body {body:?} gave {err:?}"
            );
            assert!(err.into_server_errors().is_empty());
        }
    }

    #[test]
    fn test_unavailable_has_no_field_errors() {
        let err = TransportError::Unavailable("connection refused".to_string());
        assert_eq!(err.to_string(), "transport unavailable: connection refused");
        assert!(err.into_server_errors().is_empty());
    }
}
