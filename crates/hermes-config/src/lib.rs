//! Layered configuration for Hermes.
//!
//! Configuration is a free-form JSON tree made available to bootstrap hooks,
//! teardown hooks and actions. Two sections are read by Hermes itself:
//!
//! | Section | Type | Purpose |
//! |---------|------|---------|
//! | `adapter` | [`AdapterSettings`] | Event type, envelope mode, CORS |
//! | `log` | [`LogSettings`] | Log level and output format |
//!
//! Every other section belongs to the application (datastores, credentials,
//! feature flags) and is read with [`HermesConfig::get`] or
//! [`HermesConfig::section`].
//!
//! # Layers
//!
//! [`ConfigLoader`] applies, in order: built-in defaults, configuration files
//! (TOML or JSON, deep-merged), `.env` variables, then process environment
//! variables carrying the prefix (`hermes_` by default).
//!
//! # Example
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_optional_file("hermes.toml")?
//!     .with_dotenv()?
//!     .with_env()
//!     .load()?;
//!
//! let adapter = config.adapter_settings()?;
//! println!("envelope disabled: {}", adapter.no_envelope);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [log]
//! level = "info"
//! format = "json"
//!
//! [adapter]
//! eventType = "http"
//! noEnvelope = false
//!
//! [adapter.cors]
//! origin = "*"
//! headers = "Content-Type,Authorization"
//!
//! [datastores.default]
//! url = "postgres://db/app"
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{AdapterSettings, HermesConfig, LogSettings, ADAPTER_SECTION, LOG_SECTION};
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX, PATH_SEPARATOR};
