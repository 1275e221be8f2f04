use std::{collections::HashMap, future::Future, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use bytes::Bytes;

/// Read-only access to source documents by path, e.g.
/// "/data/boundaries/towns.geojson" or "/data/EV/EV_aggregated.json".
pub trait DocumentSource: Send + Sync + 'static {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Documents stored under a root directory; leading slashes in paths are relative to the root.
pub struct DiskSource {
    root: PathBuf,
}

impl DiskSource {
    pub fn new(root: impl Into<PathBuf>) -> Self { Self { root: root.into() } }

    fn full(&self, path: &str) -> PathBuf { self.root.join(path.trim_start_matches('/')) }
}

impl DocumentSource for DiskSource {
    async fn fetch(&self, path: &str) -> Result<Bytes> {
        let full = self.full(path);
        let bytes = tokio::fs::read(&full).await
            .with_context(|| format!("Failed to read document: {}", full.display()))?;
        Ok(Bytes::from(bytes))
    }
}

/// Simple in-memory document store.
#[derive(Default, Clone)]
pub struct MemSource {
    files: HashMap<String, Bytes>,
}

impl MemSource {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Bytes>) {
        self.files.insert(path.into(), bytes.into());
    }

    /// Builder form of [`MemSource::insert`].
    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        self.insert(path, bytes);
        self
    }
}

impl DocumentSource for MemSource {
    async fn fetch(&self, path: &str) -> Result<Bytes> {
        self.files.get(path).cloned()
            .ok_or_else(|| anyhow!("missing document: {path}"))
    }
}

/// Documents served over HTTP(S) relative to a base URL.
#[cfg(feature = "download")]
pub struct HttpSource {
    client: reqwest::Client,
    base: String,
}

#[cfg(feature = "download")]
impl HttpSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { client: reqwest::Client::new(), base: base.into().trim_end_matches('/').to_string() }
    }

    fn url(&self, path: &str) -> String { format!("{}/{}", self.base, path.trim_start_matches('/')) }
}

#[cfg(feature = "download")]
impl DocumentSource for HttpSource {
    async fn fetch(&self, path: &str) -> Result<Bytes> {
        let url = self.url(path);
        let response = self.client.get(&url).send().await
            .with_context(|| format!("request failed: {url}"))?
            .error_for_status()
            .with_context(|| format!("bad status: {url}"))?;
        response.bytes().await.with_context(|| format!("failed to read body: {url}"))
    }
}
