//! # Hermes Test
//!
//! Test utilities for Hermes adapters, invoking them in-process without a
//! Lambda runtime or any network.
//!
//! ## Key Features
//!
//! - **Event Builder**: Fluent API for API Gateway proxy-shaped events
//! - **Result Assertions**: Helper methods for validating encoded results
//! - **Completion Probes**: Observe that the callback form completes once
//! - **Fixtures**: Ready-made actions and order-recording lifecycle hooks
//!
//! ## Example
//!
//! ```ignore
//! use hermes_runtime::{Adapter, LifecycleOptions};
//! use hermes_test::{fixtures, TestEvent, TestInvoker};
//! use serde_json::json;
//!
//! #[tokio::test]
//! async fn test_status() {
//!     let adapter = Adapter::new(
//!         fixtures::json_action("status", json!({"ok": true})),
//!         LifecycleOptions::new(),
//!     )
//!     .unwrap();
//!
//!     TestInvoker::new(adapter)
//!         .send(TestEvent::get("/status").origin("https://shop.test"))
//!         .await
//!         .unwrap()
//!         .assert_status(200)
//!         .assert_header("Content-Length", "11");
//! }
//! ```
//!
//! ## Invocation Forms
//!
//! | Method | Returns | Adapter errors |
//! |--------|---------|----------------|
//! | [`TestInvoker::call`] | `HermesResult<TestResult>` | passed through |
//! | [`TestInvoker::send`] | `Result<TestResult, TestError>` | [`TestError::Invocation`] |
//! | [`TestInvoker::invoke`] | [`CompletionProbe`] | recorded in the probe |

#![doc(html_root_url = "https://docs.rs/hermes-test/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod event;
pub mod fixtures;
mod invoker;
mod probe;
mod result;

pub use error::TestError;
pub use event::{TestEvent, TestEventBuilder};
pub use fixtures::HookRecorder;
pub use invoker::TestInvoker;
pub use probe::CompletionProbe;
pub use result::TestResult;
