//! The asynchronous download engine seam.
//!
//! The fetcher never performs network I/O itself. It submits keyed requests
//! to a [`DownloadEngine`] and later asks, without blocking, whether a result
//! has arrived for a key.
//!
//! # Implementations
//!
//! - [`HttpEngine`]: reqwest downloads driven by a tokio runtime
//! - [`MemoryEngine`]: Scripted results, for tests

mod http;

use std::collections::HashMap;

pub use http::HttpEngine;

/// The outcome of one download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The download produced a non-empty payload.
    Data(Vec<u8>),
    /// The download failed or produced no data.
    Failed,
}

impl FetchResult {
    /// Classify a payload: an empty body counts as a failure.
    #[must_use]
    pub fn from_payload(data: Vec<u8>) -> Self {
        if data.is_empty() {
            FetchResult::Failed
        } else {
            FetchResult::Data(data)
        }
    }
}

/// An engine that downloads in the background and hands results back by key.
pub trait DownloadEngine {
    /// Start downloading `url`. Must return immediately.
    fn submit(&mut self, url: &str, key: &str);

    /// Take the result for `key` if it has arrived.
    ///
    /// A result is handed out once; later calls for the same key return
    /// `None`.
    fn try_get_result(&mut self, key: &str) -> Option<FetchResult>;
}

/// A scripted engine that records submissions and returns results set by
/// the caller.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    submitted: Vec<(String, String)>,
    lookups: Vec<String>,
    results: HashMap<String, FetchResult>,
}

impl MemoryEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make a result available for `key`.
    pub fn complete(&mut self, key: &str, result: FetchResult) {
        self.results.insert(key.to_string(), result);
    }

    /// Make a successful result available for `key`.
    pub fn complete_with(&mut self, key: &str, data: &[u8]) {
        self.complete(key, FetchResult::Data(data.to_vec()));
    }

    /// Every `(url, key)` submitted so far, in order.
    #[must_use]
    pub fn submitted(&self) -> &[(String, String)] {
        &self.submitted
    }

    /// Submitted keys, in order.
    #[must_use]
    pub fn submitted_keys(&self) -> Vec<&str> {
        self.submitted.iter().map(|(_, key)| key.as_str()).collect()
    }

    /// Every key looked up so far, in order.
    #[must_use]
    pub fn lookups(&self) -> &[String] {
        &self.lookups
    }

    /// Forget recorded lookups.
    pub fn clear_lookups(&mut self) {
        self.lookups.clear();
    }
}

impl DownloadEngine for MemoryEngine {
    fn submit(&mut self, url: &str, key: &str) {
        self.submitted.push((url.to_string(), key.to_string()));
    }

    fn try_get_result(&mut self, key: &str) -> Option<FetchResult> {
        self.lookups.push(key.to_string());
        self.results.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_payload_is_failure() {
        assert_eq!(FetchResult::from_payload(Vec::new()), FetchResult::Failed);
        assert_eq!(
            FetchResult::from_payload(vec![1]),
            FetchResult::Data(vec![1])
        );
    }

    #[test]
    fn test_memory_engine_results_are_consumed_once() {
        let mut engine = MemoryEngine::new();
        engine.submit("http://a/calm1.ogg", "calm1");
        assert_eq!(engine.try_get_result("calm1"), None);

        engine.complete_with("calm1", b"ogg");
        assert_eq!(
            engine.try_get_result("calm1"),
            Some(FetchResult::Data(b"ogg".to_vec()))
        );
        assert_eq!(engine.try_get_result("calm1"), None);

        assert_eq!(engine.submitted_keys(), vec!["calm1"]);
        assert_eq!(engine.lookups().len(), 3);
    }
}
