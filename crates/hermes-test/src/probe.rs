//! Completion probes for the callback form.

use std::sync::{Arc, Mutex};

use hermes_core::HermesResult;
use hermes_middleware::EncodedResult;

type Completions = Arc<Mutex<Vec<HermesResult<EncodedResult>>>>;

/// Records every completion handed to a callback.
///
/// The adapter must complete each invocation exactly once; a probe lets a
/// test observe that.
///
/// # Example
///
/// ```ignore
/// let probe = CompletionProbe::new();
/// adapter.invoke(event, InvocationContext::mock(), probe.callback()).await;
/// let result = probe.assert_completed_once();
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompletionProbe {
    completions: Completions,
}

impl CompletionProbe {
    /// Creates an empty probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a callback that records into this probe.
    pub fn callback(&self) -> impl FnOnce(HermesResult<EncodedResult>) + Send + 'static {
        let completions = Arc::clone(&self.completions);
        move |result| {
            completions
                .lock()
                .expect("probe lock poisoned")
                .push(result);
        }
    }

    /// Returns how many times a callback fired.
    #[must_use]
    pub fn count(&self) -> usize {
        self.completions.lock().expect("probe lock poisoned").len()
    }

    /// Drains and returns every recorded completion.
    pub fn take(&self) -> Vec<HermesResult<EncodedResult>> {
        std::mem::take(&mut *self.completions.lock().expect("probe lock poisoned"))
    }

    /// Asserts exactly one completion was recorded and returns it.
    ///
    /// # Panics
    ///
    /// Panics if zero or several completions were recorded.
    pub fn assert_completed_once(&self) -> HermesResult<EncodedResult> {
        let mut completions = self.take();
        assert_eq!(
            completions.len(),
            1,
            "Expected exactly one completion, got {}",
            completions.len()
        );
        completions.remove(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hermes_core::HermesError;
    use serde_json::json;

    #[test]
    fn test_records_completion() {
        let probe = CompletionProbe::new();
        let callback = probe.callback();
        assert_eq!(probe.count(), 0);

        callback(Ok(EncodedResult::Raw(json!({"ok": true}))));
        assert_eq!(probe.count(), 1);

        let result = probe.assert_completed_once().unwrap();
        assert_eq!(result.as_raw(), Some(&json!({"ok": true})));
        assert_eq!(probe.count(), 0);
    }

    #[test]
    fn test_clones_share_completions() {
        let probe = CompletionProbe::new();
        let clone = probe.clone();

        clone.callback()(Err(HermesError::handler_internal("boom")));
        probe.callback()(Ok(EncodedResult::Raw(json!(null))));

        assert_eq!(probe.count(), 2);
        assert_eq!(clone.take().len(), 2);
    }

    #[test]
    #[should_panic(expected = "Expected exactly one completion, got 0")]
    fn test_assert_completed_once_without_completion() {
        let _ = CompletionProbe::new().assert_completed_once();
    }
}
