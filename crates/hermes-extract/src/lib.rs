//! # Hermes Extract
//!
//! Request view and response accumulator for HTTP-adapted Hermes actions.
//!
//! An HTTP action receives two collaborators per invocation:
//!
//! | Type | Role |
//! |------|------|
//! | [`RequestView`] | Read-only projection of the inbound event: params, headers, body, auth |
//! | [`Responder`] | Chainable status/header builder with terminal send operations |
//!
//! Both are built fresh for every invocation and never shared.
//!
//! ## Example
//!
//! ```rust
//! use hermes_core::{ActionContract, InboundEvent, InvocationContext};
//! use hermes_extract::{FnHttpAction, HttpAction, RequestView, Responder};
//! use serde_json::json;
//!
//! # tokio_test::block_on(async {
//! let action = FnHttpAction::new(
//!     ActionContract::builder("echo-id").build(),
//!     |req: RequestView, res: Responder| async move {
//!         res.json(&json!({ "id": req.param("id") }))
//!     },
//! );
//!
//! let event = InboundEvent::new(json!({"pathParameters": {"id": "42"}}));
//! let req = RequestView::new(event, InvocationContext::new("r-1"));
//! let sent = action.handle(req, Responder::new(false)).await.unwrap();
//!
//! assert_eq!(sent.body(), &json!("{\"id\":\"42\"}"));
//! # });
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-extract/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod body;
mod header;
mod request;
pub mod response;

pub use action::{ErasedHttpAction, FnHttpAction, HttpAction};
pub use body::parse_body;
pub use header::{header_value_string, HeaderIndex};
pub use request::{ParamSource, RequestView};
pub use response::{Responder, ResponseResult, Sent, SentParts, ServerErrorContinuation, ServerErrorHook};
