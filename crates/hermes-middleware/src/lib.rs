//! # Hermes Middleware
//!
//! Outbound response processing for HTTP-adapted Hermes actions.
//!
//! Every HTTP invocation ends in the same fixed sequence:
//!
//! ```text
//! Sent → Content-Length → CORS → Envelope | Raw → completion callback
//! ```
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`cors`] | Origin matching and `Access-Control-*` header injection |
//! | [`encode`] | Content-Length, envelope construction, failure encoding |
//!
//! ## Example
//!
//! ```
//! use hermes_core::InboundEvent;
//! use hermes_extract::Responder;
//! use hermes_middleware::{CorsPolicy, ResponseEncoder};
//! use serde_json::json;
//!
//! let encoder = ResponseEncoder::new(Some(CorsPolicy::any_origin()), false);
//! let sent = Responder::new(false).json(&json!({"ok": true})).unwrap();
//! let result = encoder.encode(sent, &InboundEvent::new(json!({})));
//!
//! let envelope = result.as_envelope().unwrap();
//! assert_eq!(envelope.header("Access-Control-Allow-Origin"), Some("*"));
//! assert_eq!(envelope.header("Content-Length"), Some("11"));
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cors;
pub mod encode;

pub use cors::{AllowedHeaders, CorsBuilder, CorsPolicy};
pub use encode::{EncodedResult, Envelope, ResponseEncoder};
