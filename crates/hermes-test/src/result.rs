//! Encoded result wrapper with assertions.

use crate::error::TestError;
use hermes_middleware::{EncodedResult, Envelope};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// An encoded result with helper methods for assertions.
#[derive(Debug, Clone)]
pub struct TestResult {
    inner: EncodedResult,
}

impl TestResult {
    /// Wraps an encoded result.
    #[must_use]
    pub fn new(inner: EncodedResult) -> Self {
        Self { inner }
    }

    /// Returns the wrapped result.
    #[must_use]
    pub fn into_inner(self) -> EncodedResult {
        self.inner
    }

    /// Returns the envelope.
    pub fn envelope(&self) -> Result<&Envelope, TestError> {
        self.inner.as_envelope().ok_or(TestError::NotAnEnvelope)
    }

    /// Returns `true` for a raw (non-enveloped) result.
    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.inner.as_raw().is_some()
    }

    /// Returns the status code, or `None` for a raw result.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.inner.status_code()
    }

    /// Gets a header value by name, ignoring case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.as_envelope().and_then(|e| e.header(name))
    }

    /// Returns the Content-Length header value.
    #[must_use]
    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length").and_then(|v| v.parse().ok())
    }

    /// Returns the body value: the envelope body, or the raw value itself.
    #[must_use]
    pub fn body(&self) -> &Value {
        match &self.inner {
            EncodedResult::Envelope(envelope) => &envelope.body,
            EncodedResult::Raw(value) => value,
        }
    }

    /// Returns the body as text.
    pub fn text(&self) -> Result<&str, TestError> {
        self.body()
            .as_str()
            .ok_or_else(|| TestError::Body(format!("expected a string body, got {}", self.body())))
    }

    /// Deserializes the body text as JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use hermes_middleware::{EncodedResult, Envelope};
    /// use hermes_test::TestResult;
    /// use serde_json::{json, Value};
    ///
    /// let result = TestResult::new(EncodedResult::Envelope(Envelope {
    ///     status_code: 200,
    ///     headers: Default::default(),
    ///     body: json!("{\"ok\":true}"),
    ///     context: json!({}),
    /// }));
    ///
    /// let body: Value = result.json().unwrap();
    /// assert_eq!(body, json!({"ok": true}));
    /// ```
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        serde_json::from_str(self.text()?).map_err(TestError::Json)
    }

    // Assertion methods

    /// Asserts that the status code equals the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the result is raw or the status code doesn't match.
    pub fn assert_status(&self, expected: u16) -> &Self {
        assert_eq!(
            self.status_code(),
            Some(expected),
            "Expected status {expected}, got {:?}",
            self.status_code()
        );
        self
    }

    /// Asserts that a header exists with the expected value.
    ///
    /// # Panics
    ///
    /// Panics if the header doesn't exist or doesn't match.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        assert_eq!(
            self.header(name),
            Some(expected),
            "Expected header {name}: {expected}"
        );
        self
    }

    /// Asserts that a header is absent.
    ///
    /// # Panics
    ///
    /// Panics if the header exists.
    pub fn assert_no_header(&self, name: &str) -> &Self {
        assert!(
            self.header(name).is_none(),
            "Expected no {name} header, got {:?}",
            self.header(name)
        );
        self
    }

    /// Asserts that the body text contains `needle`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not text or doesn't contain `needle`.
    pub fn assert_body_contains(&self, needle: &str) -> &Self {
        let text = self.text().expect("body should be text");
        assert!(
            text.contains(needle),
            "Expected body to contain {needle:?}, got {text:?}"
        );
        self
    }
}

impl From<EncodedResult> for TestResult {
    fn from(inner: EncodedResult) -> Self {
        Self::new(inner)
    }
}
