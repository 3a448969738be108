//! # Hermes Runtime
//!
//! Runs one adapted action per serverless invocation.
//!
//! This crate provides the invocation lifecycle for Hermes:
//!
//! - [`LifecycleOptions`] - Event type, CORS, envelope mode, hooks, configuration
//! - [`HookSequence`] - Ordered bootstrap and teardown hooks
//! - [`AdaptableAction`] - HTTP or generic action, validated once
//! - [`Adapter`] - Bootstrap, invoke, teardown, complete exactly once
//! - [`lambda`] - `lambda_runtime` event loop bridge
//!
//! ## Example
//!
//! ```rust
//! use hermes_core::{ActionContract, FnGenericAction, InvocationContext};
//! use hermes_runtime::{AdaptableAction, Adapter, LifecycleOptions};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let action = AdaptableAction::generic(FnGenericAction::new(
//!     ActionContract::builder("count-records").event_and_context().build(),
//!     |inputs| async move {
//!         let n = inputs.event["Records"].as_array().map_or(0, Vec::len);
//!         Ok(json!({ "processed": n }))
//!     },
//! ));
//!
//! let adapter = Adapter::new(action, LifecycleOptions::new()).unwrap();
//! let result = adapter
//!     .call(json!({"Records": [{}, {}]}), InvocationContext::new("r-1"))
//!     .await
//!     .unwrap();
//!
//! assert_eq!(result.as_raw(), Some(&json!({"processed": 2})));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-runtime/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod adapter;
mod dispatch;
pub mod lambda;
mod lifecycle;
mod options;

pub use adapter::Adapter;
pub use dispatch::{validate_generic_contract, AdaptableAction};
pub use lifecycle::{HookKind, HookSequence, InvocationScope, LifecycleHook, Phase};
pub use options::LifecycleOptions;
