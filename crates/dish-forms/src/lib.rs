//! # dish-forms
//!
//! Schema-driven form state, validation and submission for creating dish
//! records.
//!
//! This crate provides:
//! - A declarative [`Schema`] of fields with kinds, bounds and conditional
//!   visibility
//! - A [`FormEngine`] holding raw values, touch messages and server errors
//! - A [`Submitter`] that snapshots a payload and hands it to a [`Transport`]
//! - Bootstrap 5 rendering of the current form state
//!
//! ## Quick Start
//!
//! ```rust
//! use dish_forms::dish::dish_form;
//!
//! let mut form = dish_form().unwrap();
//! assert!(!form.is_valid());
//!
//! form.touch_field("dishName");
//! assert_eq!(form.error("dishName"), Some("Dish Name is required"));
//!
//! form.set_field("dishName", "Margherita");
//! form.set_field("preparationTime", "00:20:00");
//! form.set_field("dishType", "pizza");
//! form.set_field("noOfSlices", "4");
//! form.set_field("diameter", "30");
//! assert!(form.is_valid());
//!
//! let payload = form.payload();
//! assert_eq!(payload.get("no_of_slices"), Some("4"));
//! assert!(!payload.contains_key("spiciness_scale"));
//! ```
//!
//! ## Custom Schemas
//!
//! ```rust
//! use dish_forms::{Condition, FieldDef, SchemaBuilder};
//!
//! let schema = SchemaBuilder::new()
//!     .field(FieldDef::choice("shape", &[("Round", "round"), ("Square", "square")]))
//!     .field(
//!         FieldDef::decimal("radius")
//!             .min(0.0)
//!             .visible_when(Condition::equals("shape", "round")),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let json = schema.to_json().unwrap();
//! assert_eq!(dish_forms::Schema::from_json(&json).unwrap(), schema);
//! ```
//!
//! ## Submitting
//!
//! ```rust
//! use std::cell::RefCell;
//!
//! use dish_forms::dish::dish_form;
//! use dish_forms::{BoxFuture, Payload, Submitter, Transport, TransportError};
//!
//! struct Offline;
//!
//! impl Transport for Offline {
//!     fn send<'a>(&'a self, _payload: &'a Payload) -> BoxFuture<'a, Result<(), TransportError>> {
//!         Box::pin(async { Err(TransportError::Unavailable("offline".to_string())) })
//!     }
//! }
//!
//! let form = RefCell::new(dish_form().unwrap());
//! {
//!     let mut form = form.borrow_mut();
//!     form.set_field("dishName", "Minestrone");
//!     form.set_field("preparationTime", "00:45:00");
//!     form.set_field("dishType", "soup");
//!     form.set_field("spicinessScale", "3");
//! }
//!
//! let outcome = futures::executor::block_on(Submitter::new(Offline).submit(&form)).unwrap();
//! assert!(!outcome.is_accepted());
//! assert_eq!(form.borrow().value("dishName"), Some("Minestrone"));
//! ```

pub mod dish;
mod engine;
mod error;
pub mod label;
pub mod render;
mod schema;
mod state;
mod submit;
pub mod validation;

pub use engine::{build_payload, FormEngine};
pub use error::{FormError, Result, SchemaError, ServerErrors, TransportError};
pub use render::{render_field, render_form};
pub use schema::{Condition, FieldDef, FieldKind, FieldOption, Schema, SchemaBuilder};
pub use state::{FieldErrors, FormState};
pub use submit::{BoxFuture, Payload, SubmitOutcome, Submitter, Transport};
