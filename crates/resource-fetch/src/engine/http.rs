//! HTTP download engine.

use std::collections::HashMap;

use tokio::runtime::Handle;

use super::{DownloadEngine, FetchResult};
use crate::error::{Error, Result};

type Completion = (String, FetchResult);

/// Downloads over HTTP on a tokio runtime.
///
/// Each submission becomes its own task, so requests run in parallel.
/// Finished tasks send their result through a channel that
/// [`try_get_result`](DownloadEngine::try_get_result) drains without
/// blocking. The runtime must have its IO and time drivers enabled, which
/// reqwest requires.
///
/// # Example
///
/// ```ignore
/// let runtime = tokio::runtime::Runtime::new()?;
/// let mut engine = HttpEngine::new(runtime.handle().clone());
/// engine.submit("http://static.classicube.net/gui.png", "gui_patch");
/// ```
pub struct HttpEngine {
    http: reqwest::Client,
    runtime: Handle,
    tx: async_channel::Sender<Completion>,
    rx: async_channel::Receiver<Completion>,
    completed: HashMap<String, FetchResult>,
    in_flight: usize,
}

impl HttpEngine {
    /// Create an engine with a default HTTP client.
    #[must_use]
    pub fn new(runtime: Handle) -> Self {
        Self::with_http(reqwest::Client::new(), runtime)
    }

    /// Create an engine with a custom HTTP client.
    #[must_use]
    pub fn with_http(http: reqwest::Client, runtime: Handle) -> Self {
        let (tx, rx) = async_channel::unbounded();
        Self {
            http,
            runtime,
            tx,
            rx,
            completed: HashMap::new(),
            in_flight: 0,
        }
    }

    /// Number of submitted downloads whose result has not been received yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Move every finished download into the completed map.
    fn drain(&mut self) {
        while let Ok((key, result)) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.completed.insert(key, result);
        }
    }
}

impl DownloadEngine for HttpEngine {
    fn submit(&mut self, url: &str, key: &str) {
        let http = self.http.clone();
        let tx = self.tx.clone();
        let url = url.to_string();
        let key = key.to_string();
        self.in_flight += 1;

        self.runtime.spawn(async move {
            let result = match fetch_bytes(&http, &url).await {
                Ok(data) => {
                    if data.is_empty() {
                        tracing::warn!(key = %key, url = %url, "download returned no data");
                    }
                    FetchResult::from_payload(data)
                }
                Err(e) => {
                    tracing::warn!(key = %key, "download failed: {}", e);
                    FetchResult::Failed
                }
            };
            // The receiver lives as long as the engine; a closed channel
            // means nobody is waiting for this result anymore.
            let _ = tx.send((key, result)).await;
        });
    }

    fn try_get_result(&mut self, key: &str) -> Option<FetchResult> {
        self.drain();
        self.completed.remove(key)
    }
}

/// Fetch raw bytes from a URL.
async fn fetch_bytes(http: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!(url, "fetching");

    let response = http.get(url).send().await.map_err(|e| Error::Http {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let data = response.bytes().await.map_err(|e| Error::Http {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    Ok(data.to_vec())
}
