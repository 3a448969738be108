//! Configuration loader with layered approach.
//!
//! This module provides the [`ConfigLoader`] for loading configuration from
//! multiple sources: defaults, files, `.env` files and environment variables.

use std::env;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};

use crate::{ConfigError, HermesConfig};

/// Default prefix of environment variables folded into the configuration.
pub const DEFAULT_ENV_PREFIX: &str = "hermes_";

/// Separator between key path segments in variable names.
pub const PATH_SEPARATOR: &str = "__";

/// Configuration loader with layered approach.
///
/// The loader applies configuration in layers, with later layers overriding
/// earlier ones:
/// 1. Default values (built into the code)
/// 2. Configuration files and strings (TOML or JSON), deep-merged in order
/// 3. Variables from `.env` files
/// 4. Process environment variables
///
/// # Environment Overlay
///
/// A variable whose name starts with the prefix (case-sensitive) is folded in
/// at the key path formed by splitting the rest of its name on `__`. The value
/// is parsed as JSON when possible and kept as a string otherwise:
///
/// | Variable | Path | Value |
/// |----------|------|-------|
/// | `hermes_log__level=debug` | `log.level` | `"debug"` |
/// | `hermes_adapter__noEnvelope=true` | `adapter.noEnvelope` | `true` |
/// | `hermes_limits={"rps":5}` | `limits` | `{"rps": 5}` |
///
/// Variables are applied in name order, so `hermes_a__b` lands after
/// `hermes_a` and overrides the matching part of it.
///
/// # Example
///
/// ```
/// use hermes_config::ConfigLoader;
/// use serde_json::json;
///
/// let config = ConfigLoader::new()
///     .with_string("[log]\nlevel = \"warn\"", "toml")
///     .unwrap()
///     .apply_vars([
///         ("hermes_log__format", "pretty"),
///         ("hermes_datastores__default__pool", "5"),
///         ("OTHER_VAR", "ignored"),
///     ])
///     .load()
///     .unwrap();
///
/// assert_eq!(config.get("log.level"), Some(&json!("warn")));
/// assert_eq!(config.get("log.format"), Some(&json!("pretty")));
/// assert_eq!(config.get("datastores.default.pool"), Some(&json!(5)));
/// ```
#[derive(Debug)]
pub struct ConfigLoader {
    config: HermesConfig,
    env_prefix: Option<String>,
    dotenv_vars: Vec<(String, String)>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new configuration loader starting from the defaults.
    ///
    /// The process environment is not read unless [`with_env`](Self::with_env)
    /// or [`with_env_prefix`](Self::with_env_prefix) is called.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: HermesConfig::default(),
            env_prefix: None,
            dotenv_vars: Vec::new(),
        }
    }

    /// Reset to the default configuration values.
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.config = HermesConfig::default();
        self
    }

    /// Start from an empty tree instead of the defaults.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            config: HermesConfig::empty(),
            ..Self::new()
        }
    }

    /// Merge a configuration file.
    ///
    /// Supports TOML (.toml) and JSON (.json) formats, chosen by extension.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - The file does not exist
    /// - The file cannot be read
    /// - The file contains invalid TOML/JSON or has an unknown extension
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::read(path, e))?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some(format @ ("toml" | "json")) => self.with_string(&content, format),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Merge a configuration file if it exists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be loaded.
    pub fn with_optional_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            self.with_file(path)
        } else {
            Ok(self)
        }
    }

    /// Merge configuration from a string.
    ///
    /// # Arguments
    ///
    /// * `content` - Configuration content as a string
    /// * `format` - File format ("toml" or "json")
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if parsing fails or the root is not a table.
    pub fn with_string(mut self, content: &str, format: &str) -> Result<Self, ConfigError> {
        let layer: Value = match format.to_lowercase().as_str() {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            _ => return Err(ConfigError::UnsupportedFormat(format.to_string())),
        };

        if !layer.is_object() {
            return Err(ConfigError::RootNotTable);
        }

        merge(self.config.root_mut(), layer);
        Ok(self)
    }

    /// Read the process environment with the default `hermes_` prefix.
    #[must_use]
    pub fn with_env(self) -> Self {
        self.with_env_prefix(DEFAULT_ENV_PREFIX)
    }

    /// Read the process environment with a custom prefix.
    ///
    /// The prefix is matched case-sensitively.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Read variables from `.env` in the current directory, if present.
    ///
    /// The variables are folded in like environment variables (process
    /// environment still wins) without modifying the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be parsed.
    pub fn with_dotenv(self) -> Result<Self, ConfigError> {
        match dotenvy::dotenv_iter() {
            Ok(iter) => self.collect_dotenv(iter),
            Err(e) if e.not_found() => Ok(self),
            Err(e) => Err(e.into()),
        }
    }

    /// Read variables from a specific `.env` file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn with_dotenv_file<P: AsRef<Path>>(self, path: P) -> Result<Self, ConfigError> {
        let iter = dotenvy::from_path_iter(path)?;
        self.collect_dotenv(iter)
    }

    fn collect_dotenv<R: std::io::Read>(
        mut self,
        iter: dotenvy::Iter<R>,
    ) -> Result<Self, ConfigError> {
        for item in iter {
            self.dotenv_vars.push(item?);
        }
        Ok(self)
    }

    /// Fold an explicit list of variables into the configuration now.
    ///
    /// Uses the configured prefix, or `hermes_` if none was set. Variables
    /// without the prefix are ignored.
    #[must_use]
    pub fn apply_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let prefix = self
            .env_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string());
        overlay(
            self.config.root_mut(),
            &prefix,
            vars.into_iter().map(|(k, v)| (k.into(), v.into())),
        );
        self
    }

    /// Finalize and return the loaded configuration.
    ///
    /// Applies `.env` variables, then the process environment if a prefix
    /// was set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the known sections are malformed.
    pub fn load(mut self) -> Result<HermesConfig, ConfigError> {
        let prefix = self
            .env_prefix
            .clone()
            .unwrap_or_else(|| DEFAULT_ENV_PREFIX.to_string());

        let dotenv_vars = std::mem::take(&mut self.dotenv_vars);
        overlay(self.config.root_mut(), &prefix, dotenv_vars);

        if let Some(prefix) = self.env_prefix.take() {
            overlay(self.config.root_mut(), &prefix, env::vars());
        }

        self.config.adapter_settings()?;
        self.config.log_settings()?;

        Ok(self.config)
    }

    /// Finalize without applying the environment or validating sections.
    #[must_use]
    pub fn load_unvalidated(self) -> HermesConfig {
        self.config
    }
}

/// Folds prefixed variables into `root`, in name order.
fn overlay<I>(root: &mut Value, prefix: &str, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut matching: Vec<(String, String)> = vars
        .into_iter()
        .filter(|(key, _)| key.starts_with(prefix) && key.len() > prefix.len())
        .collect();
    matching.sort_by(|a, b| a.0.cmp(&b.0));

    for (key, raw) in matching {
        let path: Vec<&str> = key[prefix.len()..].split(PATH_SEPARATOR).collect();
        set_path(root, &path, parse_value(&raw));
    }
}

/// Parses a variable value as JSON, falling back to the raw string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Sets `value` at `path`, replacing non-object intermediates with objects.
fn set_path(root: &mut Value, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut node = root;
    for segment in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else {
            return;
        };
        node = map
            .entry((*segment).to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        map.insert((*last).to_string(), value);
    }
}

/// Deep-merges `layer` into `base`; objects merge key by key, anything else replaces.
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base_map), Value::Object(layer_map)) => {
            for (key, value) in layer_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}
