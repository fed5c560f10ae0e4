//! Fake EOL source test utilities

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use eolctl::api::{ApiError, EolSource, Query};
use eolctl::cache::CacheHandle;
use eolctl::commands::AppContext;
use eolctl::output::OutputFormat;

/// In-memory EOL source answering from canned bodies
#[derive(Clone, Default)]
pub struct FakeSource {
    bodies: HashMap<Query, Vec<u8>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(self, products: &[&str]) -> Self {
        let body = serde_json::to_vec(products).unwrap();
        self.with_body(Query::AvailableProducts, body)
    }

    pub fn with_body(mut self, query: Query, body: impl Into<Vec<u8>>) -> Self {
        self.bodies.insert(query, body.into());
        self
    }

    /// Shared counter of `fetch` calls, readable after the source is moved
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl EolSource for FakeSource {
    async fn fetch(&self, query: &Query) -> Result<Vec<u8>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies
            .get(query)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(query.path().trim_end_matches(".json").to_string()))
    }
}

/// Context over `source` with the cache file at `<cache_dir>/cache.json`
pub fn test_context(source: FakeSource, cache_dir: &Path, format: OutputFormat) -> AppContext {
    AppContext::new(
        Box::new(source),
        CacheHandle::new(cache_dir.join("cache.json"), Duration::from_secs(300)),
        Duration::from_secs(300),
    )
    .with_output(Some(format))
}
