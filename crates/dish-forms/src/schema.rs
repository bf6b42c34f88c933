//! Declarative form schema: fields, kinds and conditional visibility.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::label::humanize;
use crate::state::FormState;
use crate::validation::RequiredValidator;

/// The kind of input a field collects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// A time of day, `HH:MM:SS`.
    Time,
    /// One value out of a fixed option list.
    Enum,
    /// Whole number.
    Integer,
    /// Number with a fractional part.
    Decimal,
}

impl FieldKind {
    /// Returns whether `min`/`max` bounds apply to this kind.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }

    /// Returns the HTML input type used to render this kind.
    pub fn input_type(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Time => "time",
            Self::Enum => "select",
            Self::Integer | Self::Decimal => "number",
        }
    }
}

/// A selectable option of an enum field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    /// Text shown to the user.
    pub label: String,
    /// Value stored in the form state.
    pub value: String,
}

impl FieldOption {
    /// Creates a new option.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Predicate over the current form values deciding whether a field is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Condition {
    /// The referenced field holds exactly `value`.
    Equals { field: String, value: String },
    /// The referenced field holds one of `values`.
    OneOf { field: String, values: Vec<String> },
}

impl Condition {
    /// Shorthand for [`Condition::Equals`].
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Shorthand for [`Condition::OneOf`].
    pub fn one_of(field: impl Into<String>, values: &[&str]) -> Self {
        Self::OneOf {
            field: field.into(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    /// Returns the key of the field this condition reads.
    pub fn field(&self) -> &str {
        match self {
            Self::Equals { field, .. } | Self::OneOf { field, .. } => field,
        }
    }

    /// Evaluates the condition against the current values.
    pub fn evaluate(&self, state: &FormState) -> bool {
        let current = state.get(self.field()).unwrap_or_default();
        match self {
            Self::Equals { value, .. } => current == value,
            Self::OneOf { values, .. } => values.iter().any(|v| v == current),
        }
    }
}

fn default_required() -> bool {
    true
}

/// Definition of a form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    /// Field key, unique within a schema.
    pub key: String,
    /// Input kind.
    pub kind: FieldKind,
    /// Whether the field must be non-empty while visible.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Display label; derived from the key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Placeholder text (for enums, the disabled blank option).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Lower numeric bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper numeric bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Numeric step hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Options of an enum field, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Visibility condition; always visible when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
    /// Name of the field in the submission payload; the key when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload_key: Option<String>,
    /// Overrides the derived "<Label> is required" message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
}

impl FieldDef {
    /// Creates a new required field definition.
    pub fn new(key: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            key: key.into(),
            kind,
            required: true,
            label: None,
            placeholder: None,
            min: None,
            max: None,
            step: None,
            options: Vec::new(),
            visible_when: None,
            payload_key: None,
            required_message: None,
        }
    }

    /// Creates a text field.
    pub fn text(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Text)
    }

    /// Creates a time field.
    pub fn time(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Time)
    }

    /// Creates an enum field with `(label, value)` options.
    pub fn choice(key: impl Into<String>, options: &[(&str, &str)]) -> Self {
        let mut field = Self::new(key, FieldKind::Enum);
        field.options = options
            .iter()
            .map(|(label, value)| FieldOption::new(*label, *value))
            .collect();
        field
    }

    /// Creates an integer field.
    pub fn integer(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Integer)
    }

    /// Creates a decimal field.
    pub fn decimal(key: impl Into<String>) -> Self {
        Self::new(key, FieldKind::Decimal)
    }

    /// Makes the field optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the placeholder text.
    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    /// Sets the lower bound.
    #[must_use]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Sets the upper bound.
    #[must_use]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Sets the step hint.
    #[must_use]
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Shows the field only while `condition` holds.
    #[must_use]
    pub fn visible_when(mut self, condition: Condition) -> Self {
        self.visible_when = Some(condition);
        self
    }

    /// Sets the payload key.
    #[must_use]
    pub fn payload_key(mut self, key: impl Into<String>) -> Self {
        self.payload_key = Some(key.into());
        self
    }

    /// Sets a custom required message.
    #[must_use]
    pub fn required_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = Some(message.into());
        self
    }

    /// Returns the label shown next to the input.
    pub fn display_label(&self) -> String {
        self.label.clone().unwrap_or_else(|| humanize(&self.key))
    }

    /// Returns the key used in the submission payload.
    pub fn remote_key(&self) -> &str {
        self.payload_key.as_deref().unwrap_or(&self.key)
    }

    /// Returns whether the field participates given the current values.
    pub fn is_visible(&self, state: &FormState) -> bool {
        self.visible_when
            .as_ref()
            .map_or(true, |condition| condition.evaluate(state))
    }

    /// Returns the validator backing the required check.
    pub fn required_validator(&self) -> RequiredValidator {
        match &self.required_message {
            Some(message) => RequiredValidator::with_message(message.as_str()),
            None => RequiredValidator::for_key(&self.key),
        }
    }
}

/// An ordered, validated list of field definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldDef>", into = "Vec<FieldDef>")]
pub struct Schema {
    fields: Vec<FieldDef>,
}

impl Schema {
    /// Returns all field definitions in order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Looks up a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Returns whether the schema defines `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the fields visible for the given values, in order.
    pub fn visible_fields<'a>(
        &'a self,
        state: &'a FormState,
    ) -> impl Iterator<Item = &'a FieldDef> + 'a {
        self.fields.iter().filter(move |f| f.is_visible(state))
    }

    /// Loads a schema from its JSON form (an array of field definitions).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializes the schema to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl TryFrom<Vec<FieldDef>> for Schema {
    type Error = SchemaError;

    fn try_from(fields: Vec<FieldDef>) -> std::result::Result<Self, SchemaError> {
        let mut keys = HashSet::new();
        let mut remote_keys = HashSet::new();

        for field in &fields {
            if !keys.insert(field.key.as_str()) {
                return Err(SchemaError::DuplicateKey(field.key.clone()));
            }
            if !remote_keys.insert(field.remote_key()) {
                return Err(SchemaError::DuplicatePayloadKey(field.remote_key().to_string()));
            }
            if field.kind == FieldKind::Enum && field.options.is_empty() {
                return Err(SchemaError::MissingOptions(field.key.clone()));
            }
            if let (Some(min), Some(max)) = (field.min, field.max) {
                if min > max {
                    return Err(SchemaError::InvalidBounds {
                        field: field.key.clone(),
                        min,
                        max,
                    });
                }
            }
        }

        for field in &fields {
            if let Some(condition) = &field.visible_when {
                if !keys.contains(condition.field()) {
                    return Err(SchemaError::UnknownConditionField {
                        field: field.key.clone(),
                        target: condition.field().to_string(),
                    });
                }
            }
        }

        Ok(Self { fields })
    }
}

impl From<Schema> for Vec<FieldDef> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

/// Builder for assembling a [`Schema`] field by field.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDef>,
}

impl SchemaBuilder {
    /// Creates a new schema builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field to the schema.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the fields and returns the schema.
    pub fn build(self) -> std::result::Result<Schema, SchemaError> {
        Schema::try_from(self.fields)
    }
}
