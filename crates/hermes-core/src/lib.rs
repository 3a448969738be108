//! # Hermes Core
//!
//! Core types and traits for the Hermes action adapter.
//!
//! Hermes adapts a declaratively-typed action to the invocation contract of a
//! serverless function runtime. This crate holds the types every other crate
//! shares:
//!
//! - [`InboundEvent`] - The opaque event delivered by the platform
//! - [`InvocationContext`] - Platform metadata accompanying the event
//! - [`ActionContract`] - The inputs an action declares
//! - [`GenericAction`] - Actions that take the raw event and context
//! - [`ServiceContainer`](di::ServiceContainer) - Per-invocation services
//! - [`HermesError`] - Standard error type

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod context;
pub mod contract;
pub mod di;
mod error;
pub mod event;

pub use action::{ErasedGenericAction, FnGenericAction, GenericAction, GenericInputs};
pub use context::InvocationContext;
pub use contract::{ActionContract, InputDef};
pub use error::{failure_detail, panic_message, ErrorKind, HermesError, HermesResult};
pub use event::{EventType, InboundEvent};
