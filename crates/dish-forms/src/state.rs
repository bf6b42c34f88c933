//! Raw form values and per-field touch messages.

use std::collections::HashMap;

use crate::schema::Schema;

/// Current raw value of every schema field.
///
/// Values are kept exactly as typed, numeric fields included. Every schema
/// key is always present, hidden fields too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    values: HashMap<String, String>,
}

impl FormState {
    /// Creates the default state: every field of `schema` set to "".
    pub fn for_schema(schema: &Schema) -> Self {
        Self {
            values: schema
                .fields()
                .iter()
                .map(|f| (f.key.clone(), String::new()))
                .collect(),
        }
    }

    /// Returns the value of `key`, or `None` for keys outside the schema.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Overwrites the value of a known key. Returns `false` for unknown keys,
    /// which are left out of the state.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Returns whether `key` holds the empty string.
    pub fn is_empty_value(&self, key: &str) -> bool {
        self.get(key).map_or(true, str::is_empty)
    }

    /// Sets every value back to "".
    pub fn clear(&mut self) {
        for value in self.values.values_mut() {
            value.clear();
        }
    }

    /// Returns whether every value is "".
    pub fn is_cleared(&self) -> bool {
        self.values.values().all(String::is_empty)
    }

    /// Iterates over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the state holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Display messages for touched fields.
///
/// A touched field maps to `None` while it satisfies its required check and
/// to `Some(message)` otherwise. Untouched fields have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: HashMap<String, Option<String>>,
}

impl FieldErrors {
    /// Creates an empty set with no touched fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the touch result for `key`.
    pub fn set(&mut self, key: &str, message: Option<String>) {
        self.entries.insert(key.to_string(), message);
    }

    /// Returns the message for `key`, if the field is touched and failing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Option::as_deref)
    }

    /// Returns whether `key` has been touched.
    pub fn is_touched(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the `(key, message)` pairs that currently carry a message.
    pub fn messages(&self) -> Vec<(&str, &str)> {
        let mut messages: Vec<(&str, &str)> = self
            .entries
            .iter()
            .filter_map(|(k, m)| m.as_deref().map(|m| (k.as_str(), m)))
            .collect();
        messages.sort_unstable();
        messages
    }

    /// Returns whether any touched field carries a message.
    pub fn has_messages(&self) -> bool {
        self.entries.values().any(Option::is_some)
    }

    /// Forgets every touch.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns whether no field has been touched.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
