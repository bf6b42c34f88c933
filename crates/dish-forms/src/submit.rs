//! Submission payloads, the transport seam, and the submitter.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Serialize;

use crate::engine::FormEngine;
use crate::error::{Result, TransportError};

/// A boxed future for async transport operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Request body sent to the remote endpoint, keyed by payload key.
///
/// Values are the raw strings from the form; the remote side owns any
/// numeric coercion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Payload {
    fields: BTreeMap<String, String>,
}

impl Payload {
    /// Creates an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a payload entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Returns the value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Returns whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serializes the payload as a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Performs the actual network request for a submission.
///
/// Implementations map their wire-level failures onto [`TransportError`];
/// [`TransportError::from_response`] classifies raw HTTP-like responses.
///
/// # Example
///
/// ```ignore
/// struct HttpTransport { client: Client, url: String }
///
/// impl Transport for HttpTransport {
///     fn send<'a>(&'a self, payload: &'a Payload) -> BoxFuture<'a, Result<(), TransportError>> {
///         Box::pin(async move {
///             let body = payload.to_json().map_err(|e| TransportError::Unavailable(e.to_string()))?;
///             let res = self.client.post(&self.url, body).await
///                 .map_err(|e| TransportError::Unavailable(e.to_string()))?;
///             if res.is_success() {
///                 Ok(())
///             } else {
///                 Err(TransportError::from_response(res.status(), res.body()))
///             }
///         })
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Sends `payload` to the remote endpoint.
    fn send<'a>(
        &'a self,
        payload: &'a Payload,
    ) -> BoxFuture<'a, std::result::Result<(), TransportError>>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send<'a>(
        &'a self,
        payload: &'a Payload,
    ) -> BoxFuture<'a, std::result::Result<(), TransportError>> {
        (**self).send(payload)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send<'a>(
        &'a self,
        payload: &'a Payload,
    ) -> BoxFuture<'a, std::result::Result<(), TransportError>> {
        (**self).send(payload)
    }
}

/// Result of a submission attempt that reached the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The remote endpoint accepted the payload; the form was reset.
    Accepted,
    /// The attempt failed; the form keeps its values.
    Failed(TransportError),
}

impl SubmitOutcome {
    /// Returns whether the payload was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Clears the in-flight flag if a submission future is dropped while the
/// transport call is pending.
struct InFlight<'a> {
    form: &'a RefCell<FormEngine>,
    armed: bool,
}

impl InFlight<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut form) = self.form.try_borrow_mut() {
            form.abandon_submission();
        }
    }
}

/// Drives a [`FormEngine`] through one submission using a [`Transport`].
#[derive(Debug)]
pub struct Submitter<T> {
    transport: T,
}

impl<T: Transport> Submitter<T> {
    /// Creates a new submitter.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits the current form values.
    ///
    /// The payload is snapshotted before the transport is awaited, and the
    /// engine is not borrowed across the await: edits made while the request
    /// is pending go to the live state but not into this payload.
    ///
    /// Returns [`FormError::InvalidForm`](crate::FormError::InvalidForm) or
    /// [`FormError::SubmissionInFlight`](crate::FormError::SubmissionInFlight)
    /// without touching the engine when the attempt cannot start. Transport
    /// failures never surface as `Err`; they end up in
    /// [`SubmitOutcome::Failed`] and the engine's server errors.
    ///
    /// Dropping the returned future before the transport answers (a timeout,
    /// say) puts the engine back to idle with its values untouched.
    pub async fn submit(&self, form: &RefCell<FormEngine>) -> Result<SubmitOutcome> {
        let payload = form.borrow_mut().begin_submission()?;
        let in_flight = InFlight { form, armed: true };
        let result = self.transport.send(&payload).await;
        in_flight.disarm();
        Ok(form.borrow_mut().finish_submission(result))
    }
}
