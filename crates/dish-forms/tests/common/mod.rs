//! Shared test transports.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use dish_forms::{BoxFuture, FormEngine, Payload, Transport, TransportError};
use futures::channel::oneshot;

/// Answers each send with the next scripted result and records payloads.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<(), TransportError>>>,
    sent: Mutex<Vec<Payload>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<(), TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<Payload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send<'a>(&'a self, payload: &'a Payload) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(payload.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Unavailable("no scripted response".to_string())))
        })
    }
}

/// Holds each send open until the test releases it through the sender.
pub struct GatedTransport {
    gate: Mutex<Option<oneshot::Receiver<Result<(), TransportError>>>>,
    sent: Mutex<Vec<Payload>>,
}

impl GatedTransport {
    pub fn new() -> (Self, oneshot::Sender<Result<(), TransportError>>) {
        let (tx, rx) = oneshot::channel();
        let transport = Self {
            gate: Mutex::new(Some(rx)),
            sent: Mutex::new(Vec::new()),
        };
        (transport, tx)
    }

    pub fn sent(&self) -> Vec<Payload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for GatedTransport {
    fn send<'a>(&'a self, payload: &'a Payload) -> BoxFuture<'a, Result<(), TransportError>> {
        Box::pin(async move {
            self.sent.lock().unwrap().push(payload.clone());
            let gate = self.gate.lock().unwrap().take();
            match gate {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(TransportError::Unavailable("gate dropped".to_string()))),
                None => Err(TransportError::Unavailable("gate already used".to_string())),
            }
        })
    }
}

/// Fills the dish form with a complete pizza.
pub fn fill_pizza(form: &mut FormEngine) {
    form.set_field("dishName", "Margherita");
    form.set_field("preparationTime", "00:20:00");
    form.set_field("dishType", "pizza");
    form.set_field("noOfSlices", "4");
    form.set_field("diameter", "30");
}
