//! # Hermes
//!
//! **Action-to-serverless adapter for the Themis Platform**
//!
//! Hermes takes an action with a declared input contract and turns it into a
//! serverless invocation handler:
//!
//! - **HTTP adaptation** – API Gateway proxy events become a [`RequestView`](prelude::RequestView)
//!   and a [`Responder`](prelude::Responder); the result is an envelope or a raw body
//! - **Generic adaptation** – any other event is handed to the action as its
//!   `event` and `context` inputs
//! - **Lifecycle hooks** – ordered bootstrap and teardown steps around every
//!   invocation, sharing a per-invocation service container
//! - **Exactly-once completion** – every invocation completes once, with
//!   failures encoded (HTTP) or surfaced (generic)
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hermes::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lambda_runtime::Error> {
//!     let config = ConfigLoader::new().with_dotenv()?.with_env().load()?;
//!     init_logging(&config.log_settings()?.to_log_config())?;
//!
//!     let action = AdaptableAction::http(FnHttpAction::new(
//!         ActionContract::builder("get-order").input(InputDef::new("id", json!("42"))).build(),
//!         |req, res| async move { res.json(&json!({ "id": req.param("id") })) },
//!     ));
//!
//!     let adapter = Adapter::new(action, LifecycleOptions::from_config(config)?)?;
//!     hermes::runtime::lambda::run(adapter).await
//! }
//! ```
//!
//! ## Invocation Flow
//!
//! ```text
//! event → bootstrap hooks → action → teardown hooks → encode → callback
//!              │ (first failure skips the action)   │
//!              └──────────── teardown still runs ───┘
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export core types
pub use hermes_core as core;

// Re-export request/response types
pub use hermes_extract as extract;

// Re-export encoding types
pub use hermes_middleware as middleware;

// Re-export lifecycle types
pub use hermes_runtime as runtime;

// Re-export configuration types
pub use hermes_config as config;

// Re-export telemetry types
pub use hermes_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use hermes::prelude::*;
///
/// let options = LifecycleOptions::new().cors(CorsPolicy::any_origin());
/// assert!(options.cors_policy().is_some());
/// ```
pub mod prelude {
    pub use hermes_core::{
        ActionContract, EventType, FnGenericAction, GenericAction, GenericInputs, HermesError,
        HermesResult, InboundEvent, InputDef, InvocationContext,
    };

    // Re-export DI types
    pub use hermes_core::di::{InjectionError, ServiceContainer};

    // Re-export request/response types
    pub use hermes_extract::{
        FnHttpAction, HttpAction, ParamSource, RequestView, Responder, ResponseResult, Sent,
        ServerErrorContinuation,
    };

    // Re-export encoding types
    pub use hermes_middleware::{CorsPolicy, EncodedResult, Envelope};

    // Re-export lifecycle types
    pub use hermes_runtime::{AdaptableAction, Adapter, InvocationScope, LifecycleOptions, Phase};

    // Re-export configuration types
    pub use hermes_config::{AdapterSettings, ConfigError, ConfigLoader, HermesConfig};

    // Re-export telemetry types
    pub use hermes_telemetry::{init_logging, LogConfig, LogFormat};
}
