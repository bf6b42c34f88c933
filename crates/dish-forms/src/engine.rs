//! Form engine: live values, touch messages, validity and submission state.
//!
//! The engine owns no I/O. A renderer reads it to draw the form and calls
//! [`FormEngine::set_field`] and [`FormEngine::touch_field`] on user input;
//! [`Submitter`](crate::Submitter) drives the two submission transitions
//! around the transport call.

use tracing::{debug, info, warn};

use crate::error::{FormError, Result, ServerErrors, TransportError};
use crate::schema::Schema;
use crate::state::{FieldErrors, FormState};
use crate::submit::{Payload, SubmitOutcome};

/// Builds the submission payload for `state`.
///
/// Every visible field is included under its payload key with its raw
/// value. Hidden fields are left out whatever they hold.
pub fn build_payload(schema: &Schema, state: &FormState) -> Payload {
    let mut payload = Payload::new();
    for field in schema.visible_fields(state) {
        payload.insert(field.remote_key(), state.get(&field.key).unwrap_or_default());
    }
    payload
}

/// Live state of one form.
#[derive(Debug, Clone)]
pub struct FormEngine {
    schema: Schema,
    state: FormState,
    errors: FieldErrors,
    server_errors: ServerErrors,
    submitting: bool,
}

impl FormEngine {
    /// Creates an engine with every field empty.
    pub fn new(schema: Schema) -> Self {
        let state = FormState::for_schema(&schema);
        Self {
            schema,
            state,
            errors: FieldErrors::new(),
            server_errors: ServerErrors::new(),
            submitting: false,
        }
    }

    /// Returns the schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the current values.
    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Returns the current value of `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.state.get(key)
    }

    /// Returns the touch messages.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Returns the touch message for `key`, if any.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key)
    }

    /// Returns the errors reported by the last failed submission.
    pub fn server_errors(&self) -> &ServerErrors {
        &self.server_errors
    }

    /// Returns whether a submission is waiting on the transport.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Overwrites the value of `key`. Unknown keys are ignored.
    pub fn set_field(&mut self, key: &str, value: impl Into<String>) {
        if !self.state.set(key, value) {
            debug!(key, "ignoring value for unknown field");
        }
    }

    /// Marks `key` as touched and records its required-field message.
    ///
    /// An empty, visible, required field gets "<Label> is required"; any
    /// other field has its message cleared.
    pub fn touch_field(&mut self, key: &str) {
        let Some(field) = self.schema.field(key) else {
            debug!(key, "ignoring touch for unknown field");
            return;
        };

        let message = if field.required && field.is_visible(&self.state) {
            let value = self.state.get(key).unwrap_or_default();
            field.required_validator().validate(value).err()
        } else {
            None
        };

        debug!(key, failing = message.is_some(), "field touched");
        self.errors.set(key, message);
    }

    /// Returns whether every visible required field has a value.
    ///
    /// Derived from the values alone; touch history plays no part.
    pub fn is_valid(&self) -> bool {
        self.schema
            .visible_fields(&self.state)
            .filter(|f| f.required)
            .all(|f| !self.state.is_empty_value(&f.key))
    }

    /// Empties every field and forgets every touch.
    ///
    /// Server errors are kept; only a submission replaces them.
    pub fn reset(&mut self) {
        self.state.clear();
        self.errors.clear();
    }

    /// Builds the payload for the current values.
    pub fn payload(&self) -> Payload {
        build_payload(&self.schema, &self.state)
    }

    /// Starts a submission: checks the guards, marks the engine as
    /// submitting and returns the payload snapshot.
    ///
    /// Fails without changing anything when a submission is already in
    /// flight or the form is invalid.
    pub fn begin_submission(&mut self) -> Result<Payload> {
        if self.submitting {
            warn!("rejecting submission while another is in flight");
            return Err(FormError::SubmissionInFlight);
        }
        if !self.is_valid() {
            debug!("skipping submission of invalid form");
            return Err(FormError::InvalidForm);
        }

        let payload = self.payload();
        self.submitting = true;
        info!(fields = payload.len(), "submitting form");
        Ok(payload)
    }

    /// Returns the engine to idle after a submission whose transport call
    /// was dropped before completing.
    ///
    /// Values and server errors are kept; no outcome is recorded.
    pub fn abandon_submission(&mut self) {
        if self.submitting {
            warn!("submission abandoned before the transport answered");
            self.submitting = false;
        }
    }

    /// Applies the transport result of the submission started by
    /// [`FormEngine::begin_submission`].
    ///
    /// Success resets the form and clears server errors. Failure keeps the
    /// values and replaces server errors with those carried by the failure;
    /// failures without a usable error body leave them empty.
    pub fn finish_submission(
        &mut self,
        result: std::result::Result<(), TransportError>,
    ) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(()) => {
                info!("submission accepted");
                self.reset();
                self.server_errors = ServerErrors::new();
                SubmitOutcome::Accepted
            }
            Err(err) => {
                match &err {
                    TransportError::Rejected(errors) => {
                        warn!(fields = errors.len(), "submission rejected by remote");
                    }
                    TransportError::Malformed { .. } | TransportError::Unavailable(_) => {
                        warn!(error = %err, "submission failed without field errors");
                    }
                }
                self.server_errors = err.clone().into_server_errors();
                SubmitOutcome::Failed(err)
            }
        }
    }
}
