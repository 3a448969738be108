//! CORS header policy.
//!
//! A [`CorsPolicy`] decides whether an encoded response gets CORS headers.
//! It applies when the configured origin is the wildcard `*`, or when the
//! inbound `Origin` header equals the configured origin exactly. When it
//! applies, these headers are injected (each only if configured):
//!
//! - `Access-Control-Allow-Origin`: the configured origin
//! - `Access-Control-Allow-Headers`: allowed headers, comma-joined
//! - `Access-Control-Allow-Credentials`: `true` or `false`
//!
//! There is no preflight handling; the action decides how to answer `OPTIONS`.
//!
//! ## Example
//!
//! ```
//! use hermes_middleware::cors::CorsPolicy;
//! use hermes_extract::HeaderIndex;
//! use serde_json::json;
//!
//! let cors = CorsPolicy::builder("https://app.example.com")
//!     .allow_headers(["Content-Type", "Authorization"])
//!     .allow_credentials(true)
//!     .build();
//!
//! let inbound = json!({"origin": "https://app.example.com"});
//! assert!(cors.matches(&HeaderIndex::from_map(inbound.as_object())));
//!
//! let other = json!({"Origin": "https://evil.example.com"});
//! assert!(!cors.matches(&HeaderIndex::from_map(other.as_object())));
//! ```

use hermes_extract::HeaderIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// CORS header names.
pub mod headers {
    /// `Access-Control-Allow-Origin` header.
    pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    /// `Access-Control-Allow-Headers` header.
    pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
    /// `Access-Control-Allow-Credentials` header.
    pub const ALLOW_CREDENTIALS: &str = "Access-Control-Allow-Credentials";
    /// `Origin` request header.
    pub const ORIGIN: &str = "Origin";
}

/// Wildcard origin.
pub const ANY_ORIGIN: &str = "*";

/// Allowed request headers, configured as one string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AllowedHeaders {
    /// A pre-joined header list, used verbatim.
    Joined(String),
    /// Individual header names, joined with `,`.
    List(Vec<String>),
}

impl AllowedHeaders {
    /// Renders the `Access-Control-Allow-Headers` value.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Joined(value) => value.clone(),
            Self::List(names) => names.join(","),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsPolicy {
    /// Allowed origin, or `*`.
    origin: String,
    /// Allowed request headers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    headers: Option<AllowedHeaders>,
    /// Whether credentials are allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allow_credentials: Option<bool>,
}

impl CorsPolicy {
    /// Creates a policy for a single origin (or `*`) with no other headers.
    #[must_use]
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            headers: None,
            allow_credentials: None,
        }
    }

    /// Creates a policy allowing any origin.
    #[must_use]
    pub fn any_origin() -> Self {
        Self::new(ANY_ORIGIN)
    }

    /// Starts building a policy.
    #[must_use]
    pub fn builder(origin: impl Into<String>) -> CorsBuilder {
        CorsBuilder {
            policy: Self::new(origin),
        }
    }

    /// Returns the configured origin.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Returns the allowed headers.
    #[must_use]
    pub fn allowed_headers(&self) -> Option<&AllowedHeaders> {
        self.headers.as_ref()
    }

    /// Returns the credentials flag.
    #[must_use]
    pub fn allow_credentials(&self) -> Option<bool> {
        self.allow_credentials
    }

    /// Checks whether the policy applies to a request with these headers.
    #[must_use]
    pub fn matches(&self, inbound: &HeaderIndex) -> bool {
        self.origin == ANY_ORIGIN || inbound.get(headers::ORIGIN) == Some(self.origin.as_str())
    }

    /// Injects CORS headers into `outbound` if the policy applies.
    ///
    /// Returns `true` if headers were injected.
    pub fn apply(&self, inbound: &HeaderIndex, outbound: &mut HashMap<String, String>) -> bool {
        if !self.matches(inbound) {
            return false;
        }

        outbound.insert(headers::ALLOW_ORIGIN.to_string(), self.origin.clone());
        if let Some(allowed) = &self.headers {
            outbound.insert(headers::ALLOW_HEADERS.to_string(), allowed.header_value());
        }
        if let Some(credentials) = self.allow_credentials {
            outbound.insert(headers::ALLOW_CREDENTIALS.to_string(), credentials.to_string());
        }
        true
    }
}

/// Builder for [`CorsPolicy`].
#[derive(Debug, Clone)]
pub struct CorsBuilder {
    policy: CorsPolicy,
}

impl CorsBuilder {
    /// Sets the allowed request headers as a list.
    #[must_use]
    pub fn allow_headers<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policy.headers = Some(AllowedHeaders::List(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Sets the allowed request headers as a pre-joined string.
    #[must_use]
    pub fn allow_headers_joined(mut self, value: impl Into<String>) -> Self {
        self.policy.headers = Some(AllowedHeaders::Joined(value.into()));
        self
    }

    /// Sets the credentials flag.
    #[must_use]
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.policy.allow_credentials = Some(allow);
        self
    }

    /// Builds the policy.
    #[must_use]
    pub fn build(self) -> CorsPolicy {
        self.policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn inbound(origin: Option<&str>) -> HeaderIndex {
        let raw = origin.map_or_else(|| json!({}), |o| json!({ "Origin": o }));
        HeaderIndex::from_map(raw.as_object())
    }

    #[test]
    fn test_wildcard_always_applies() {
        let cors = CorsPolicy::any_origin();
        let mut out = HashMap::new();

        assert!(cors.apply(&inbound(None), &mut out));
        assert_eq!(out[headers::ALLOW_ORIGIN], "*");
        assert!(!out.contains_key(headers::ALLOW_HEADERS));
        assert!(!out.contains_key(headers::ALLOW_CREDENTIALS));
    }

    #[test]
    fn test_specific_origin_requires_exact_match() {
        let cors = CorsPolicy::new("https://app.example.com");
        let mut out = HashMap::new();

        assert!(!cors.apply(&inbound(Some("https://app.example.com/")), &mut out));
        assert!(!cors.apply(&inbound(Some("https://APP.example.com")), &mut out));
        assert!(!cors.apply(&inbound(None), &mut out));
        assert!(out.is_empty());

        assert!(cors.apply(&inbound(Some("https://app.example.com")), &mut out));
        assert_eq!(out[headers::ALLOW_ORIGIN], "https://app.example.com");
    }

    #[test]
    fn test_origin_header_name_case_insensitive() {
        let cors = CorsPolicy::new("https://a.test");
        let raw = json!({"ORIGIN": "https://a.test"});
        assert!(cors.matches(&HeaderIndex::from_map(raw.as_object())));
    }

    #[test]
    fn test_headers_and_credentials() {
        let cors = CorsPolicy::builder("*")
            .allow_headers(["Content-Type", "X-Api-Key"])
            .allow_credentials(false)
            .build();
        let mut out = HashMap::new();
        cors.apply(&inbound(None), &mut out);

        assert_eq!(out[headers::ALLOW_HEADERS], "Content-Type,X-Api-Key");
        assert_eq!(out[headers::ALLOW_CREDENTIALS], "false");
    }

    #[test]
    fn test_deserialize_string_or_list() {
        let joined: CorsPolicy = serde_json::from_value(json!({
            "origin": "*",
            "headers": "Content-Type, Authorization",
            "allowCredentials": true
        }))
        .unwrap();
        assert_eq!(
            joined.allowed_headers().unwrap().header_value(),
            "Content-Type, Authorization"
        );
        assert_eq!(joined.allow_credentials(), Some(true));

        let listed: CorsPolicy =
            serde_json::from_value(json!({"origin": "*", "headers": ["A", "B"]})).unwrap();
        assert_eq!(listed.allowed_headers().unwrap().header_value(), "A,B");
        assert_eq!(listed.allow_credentials(), None);
    }

    proptest! {
        #[test]
        fn prop_wildcard_ignores_inbound_origin(origin in proptest::option::of("[a-z:/.]{0,24}")) {
            let mut out = HashMap::new();
            prop_assert!(CorsPolicy::any_origin().apply(&inbound(origin.as_deref()), &mut out));
            prop_assert_eq!(out[headers::ALLOW_ORIGIN].as_str(), "*");
        }

        #[test]
        fn prop_specific_origin_only_on_match(
            configured in "https://[a-z]{1,8}\\.test",
            sent in "https://[a-z]{1,8}\\.test",
        ) {
            let cors = CorsPolicy::new(configured.clone());
            let mut out = HashMap::new();
            let applied = cors.apply(&inbound(Some(&sent)), &mut out);
            prop_assert_eq!(applied, configured == sent);
            prop_assert_eq!(out.contains_key(headers::ALLOW_ORIGIN), configured == sent);
        }
    }
}
