//! Cache-through fetching

use std::time::Duration;

use tracing::debug;

use crate::api::source::{EolSource, Query};
use crate::api::types::ApiResponse;
use crate::cache::CacheHandle;
use crate::error::EolError;

/// Fetch and decode the response answering `query`, consulting the cache first.
///
/// On a miss the body is decoded before it is stored with `ttl` and the cache
/// is saved, so a body that doesn't decode is never cached. A disabled cache
/// is never touched. Returns the raw body alongside its decoded form.
pub async fn fetch_cached(
    source: &dyn EolSource,
    cache: &mut CacheHandle,
    query: &Query,
    ttl: Duration,
) -> Result<(Vec<u8>, ApiResponse), EolError> {
    let key = query.cache_key();
    let store = cache.get_or_init()?;

    if let Some(body) = store.as_deref().and_then(|s| s.get(&key)) {
        debug!("Cache hit for {}", key);
        let response = query.decode(body)?;
        return Ok((body.to_vec(), response));
    }

    debug!("Cache miss for {}, fetching", key);
    let body = source.fetch(query).await?;
    let response = query.decode(&body)?;

    if let Some(store) = store {
        store.set(&key, body.clone(), ttl);
        store.save()?;
    }

    Ok((body, response))
}
