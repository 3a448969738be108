//! Case-insensitive header lookup.
//!
//! Platforms deliver headers with whatever casing the client sent. The
//! [`HeaderIndex`] lower-cases names once per invocation so lookups by any
//! casing hit; the original mapping stays available on the event itself.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Lower-cased header index built once per invocation.
///
/// # Example
///
/// ```
/// use hermes_extract::HeaderIndex;
/// use serde_json::json;
///
/// let headers = json!({"Content-Type": "application/json", "X-Request-Id": "abc"});
/// let index = HeaderIndex::from_map(headers.as_object());
///
/// assert_eq!(index.get("content-type"), Some("application/json"));
/// assert_eq!(index.get("X-REQUEST-ID"), Some("abc"));
/// assert_eq!(index.get("accept"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    lowered: HashMap<String, String>,
}

impl HeaderIndex {
    /// Builds the index from a raw header mapping.
    ///
    /// `null` values are skipped; non-string values are indexed by their JSON
    /// rendering. When two names differ only in case, the later one wins.
    #[must_use]
    pub fn from_map(headers: Option<&Map<String, Value>>) -> Self {
        let lowered = headers
            .into_iter()
            .flat_map(Map::iter)
            .filter_map(|(name, value)| {
                header_value_string(value).map(|value| (name.to_ascii_lowercase(), value))
            })
            .collect();
        Self { lowered }
    }

    /// Looks up a header by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.lowered
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the number of indexed headers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lowered.len()
    }

    /// Returns `true` if no headers were indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lowered.is_empty()
    }
}

/// Renders a raw header value as a string.
#[must_use]
pub fn header_value_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
