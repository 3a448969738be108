//! The loaded configuration tree and its typed sections.

use crate::ConfigError;
use hermes_core::EventType;
use hermes_middleware::CorsPolicy;
use hermes_telemetry::{LogConfig, LogFormat};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Section holding [`AdapterSettings`].
pub const ADAPTER_SECTION: &str = "adapter";

/// Section holding [`LogSettings`].
pub const LOG_SECTION: &str = "log";

/// Nested configuration available to hooks and actions.
///
/// The tree is free-form JSON; known sections can be read as typed structs.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
/// use serde_json::json;
///
/// let config = HermesConfig::from_value(json!({
///     "datastores": {"default": {"url": "postgres://db/app"}}
/// }));
///
/// assert_eq!(config.get("datastores.default.url"), Some(&json!("postgres://db/app")));
/// assert_eq!(config.get("datastores.missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HermesConfig(Value);

impl Default for HermesConfig {
    fn default() -> Self {
        Self(json!({
            LOG_SECTION: {
                "level": "info",
                "format": "json",
            },
            ADAPTER_SECTION: {
                "noEnvelope": false,
            },
        }))
    }
}

impl HermesConfig {
    /// Wraps a configuration tree.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    /// Returns an empty configuration (no defaults).
    #[must_use]
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    /// Returns the whole tree.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Consumes the configuration and returns the tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }

    /// Looks up a value by dotted path. An empty path returns the root.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return Some(&self.0);
        }
        path.split('.')
            .try_fold(&self.0, |node, segment| node.get(segment))
    }

    /// Deserializes the section at `path`.
    ///
    /// A missing or `null` section deserializes from an empty object, so
    /// structs with `#[serde(default)]` get their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSection`] if the section has the wrong shape.
    pub fn section<T: DeserializeOwned>(&self, path: &str) -> Result<T, ConfigError> {
        let node = self.get(path).cloned().unwrap_or(Value::Null);
        let node = if node.is_null() {
            Value::Object(Map::new())
        } else {
            node
        };
        serde_json::from_value(node).map_err(|e| ConfigError::invalid_section(path, e))
    }

    /// Reads the `adapter` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSection`] if the section has the wrong shape.
    pub fn adapter_settings(&self) -> Result<AdapterSettings, ConfigError> {
        self.section(ADAPTER_SECTION)
    }

    /// Reads the `log` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSection`] if the section has the wrong shape.
    pub fn log_settings(&self) -> Result<LogSettings, ConfigError> {
        self.section(LOG_SECTION)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Value {
        &mut self.0
    }
}

/// Adapter options that can come from configuration.
///
/// ```toml
/// [adapter]
/// eventType = "http"
/// noEnvelope = false
///
/// [adapter.cors]
/// origin = "*"
/// headers = ["Content-Type", "Authorization"]
/// allowCredentials = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdapterSettings {
    /// Adaptation mode. Inferred from the action when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
    /// Return raw bodies instead of envelopes.
    pub no_envelope: bool,
    /// CORS policy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsPolicy>,
}

/// Logging options that can come from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogSettings {
    /// Whether logging is enabled.
    pub enabled: bool,
    /// Log filter.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
    /// Prefix lines with timestamps.
    pub timestamps: bool,
    /// Service name attached to log output.
    pub service_name: Option<String>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            timestamps: false,
            service_name: None,
        }
    }
}

impl LogSettings {
    /// Converts the settings into a logging configuration.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        let mut config = LogConfig::production()
            .with_level(self.level.clone())
            .with_format(self.format)
            .with_timestamps(self.timestamps);
        config.enabled = self.enabled;
        if let Some(name) = &self.service_name {
            config = config.with_service_name(name.clone());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HermesConfig::default();
        assert_eq!(config.get("log.level"), Some(&json!("info")));

        let adapter = config.adapter_settings().unwrap();
        assert_eq!(adapter.event_type, None);
        assert!(!adapter.no_envelope);
        assert!(adapter.cors.is_none());
    }

    #[test]
    fn test_get_paths() {
        let config = HermesConfig::from_value(json!({"a": {"b": [1, 2]}}));
        assert_eq!(config.get(""), Some(&json!({"a": {"b": [1, 2]}})));
        assert_eq!(config.get("a.b"), Some(&json!([1, 2])));
        assert_eq!(config.get("a.b.c"), None);
        assert_eq!(config.get("z"), None);
    }

    #[test]
    fn test_missing_section_uses_defaults() {
        let adapter = HermesConfig::empty().adapter_settings().unwrap();
        assert_eq!(adapter, AdapterSettings::default());

        let log = HermesConfig::empty().log_settings().unwrap();
        assert_eq!(log.level, "info");
    }

    #[test]
    fn test_adapter_section_with_cors() {
        let config = HermesConfig::from_value(json!({
            "adapter": {
                "eventType": "generic",
                "noEnvelope": true,
                "cors": {"origin": "https://a.test", "headers": ["X-A", "X-B"]}
            }
        }));

        let adapter = config.adapter_settings().unwrap();
        assert_eq!(adapter.event_type, Some(EventType::Generic));
        assert!(adapter.no_envelope);
        assert_eq!(adapter.cors.unwrap().origin(), "https://a.test");
    }

    #[test]
    fn test_invalid_section() {
        let config = HermesConfig::from_value(json!({"adapter": {"noEnvelope": "sometimes"}}));
        let err = config.adapter_settings().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSection { .. }));
        assert!(err.to_string().contains("adapter"));
    }

    #[test]
    fn test_log_settings_to_config() {
        let config = HermesConfig::from_value(json!({
            "log": {"level": "debug", "format": "pretty", "serviceName": "orders", "timestamps": true}
        }));
        let log = config.log_settings().unwrap().to_log_config();
        assert_eq!(log.level, "debug");
        assert_eq!(log.format, LogFormat::Pretty);
        assert_eq!(log.service_name, "orders");
        assert!(log.timestamps);
    }
}
