//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while layering or reading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration file is missing.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// A configuration file exists but could not be read.
    #[error("cannot read configuration file {path}")]
    Read {
        /// The unreadable path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A layer was neither TOML nor JSON.
    #[error("unsupported configuration format '{0}' (expected toml or json)")]
    UnsupportedFormat(String),

    /// A layer parsed, but its root is not a table.
    #[error("configuration root must be a table")]
    RootNotTable,

    /// Malformed TOML layer.
    #[error("invalid TOML configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON layer.
    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// A `.env` file could not be read or parsed.
    #[error("cannot load .env variables: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// A known section (`adapter`, `log`) has the wrong shape.
    #[error("invalid configuration section '{section}': {source}")]
    InvalidSection {
        /// Dotted path of the section.
        section: String,
        /// Underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub(crate) fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_section(section: impl Into<String>, source: serde_json::Error) -> Self {
        Self::InvalidSection {
            section: section.into(),
            source,
        }
    }
}
