//! Cache layer that orchestrates caching logic with network fetching.

use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::graphql::{DataError, Operation};

use super::store::ResponseCache;
use super::traits::CacheResult;

/// Read-through composition over a [`ResponseCache`].
///
/// The ordering every caller relies on:
/// 1. Check cache - if fresh, return it without touching the network
/// 2. On a miss, run the fetcher
/// 3. Store the result, but only if the fetch succeeded
///
/// Operations that are not cacheable (mutations, `network_only` reads) skip
/// steps 1 and 3.
#[derive(Clone)]
pub struct CacheLayer {
  cache: Arc<ResponseCache>,
}

impl CacheLayer {
  pub fn new(cache: Arc<ResponseCache>) -> Self {
    Self { cache }
  }

  pub fn cache(&self) -> &Arc<ResponseCache> {
    &self.cache
  }

  pub async fn fetch<F, Fut>(
    &self,
    operation: &Operation,
    fetcher: F,
  ) -> Result<CacheResult<Value>, DataError>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Value, DataError>>,
  {
    if !operation.is_cacheable() {
      return fetcher().await.map(CacheResult::from_network);
    }

    if let Some(entry) = self.cache.get(operation.name(), operation.variables()) {
      debug!(operation = operation.name(), "cache hit");
      return Ok(CacheResult::from_cache(entry.payload, entry.stored_at));
    }

    debug!(operation = operation.name(), "cache miss");
    let data = fetcher().await?;
    self
      .cache
      .put(operation.name(), operation.variables(), data.clone());
    Ok(CacheResult::from_network(data))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::traits::testing::ManualClock;
  use crate::cache::traits::CacheSource;
  use chrono::Duration;
  use serde_json::json;
  use std::sync::atomic::{AtomicUsize, Ordering};

  fn layer() -> (CacheLayer, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let cache = Arc::new(ResponseCache::with_clock(Duration::minutes(5), clock.clone()));
    (CacheLayer::new(cache), clock)
  }

  fn empresas() -> Operation {
    Operation::query("empresas", "query { empresas { id nombre } }")
  }

  async fn counted(layer: &CacheLayer, op: &Operation, calls: &AtomicUsize) -> CacheResult<Value> {
    layer
      .fetch(op, move || async move {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({"empresas": [{"id": "1"}]}))
      })
      .await
      .unwrap()
  }

  #[tokio::test]
  async fn test_second_read_within_ttl_is_served_from_cache() {
    let (layer, clock) = layer();
    let calls = AtomicUsize::new(0);
    let op = empresas();

    let first = counted(&layer, &op, &calls).await;
    assert_eq!(first.source, CacheSource::Network);

    let second = counted(&layer, &op, &calls).await;
    assert_eq!(second.source, CacheSource::Cache);
    assert_eq!(second.data, first.data);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    clock.advance(Duration::minutes(6));
    let third = counted(&layer, &op, &calls).await;
    assert_eq!(third.source, CacheSource::Network);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_failures_are_not_cached() {
    let (layer, _) = layer();
    let calls = AtomicUsize::new(0);
    let op = empresas();
    let counter = &calls;

    let err = layer
      .fetch(&op, move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(DataError::Network("down".into()))
      })
      .await
      .unwrap_err();
    assert_eq!(err, DataError::Network("down".into()));
    assert!(layer.cache().is_empty());

    counted(&layer, &op, &calls).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_mutations_bypass_cache() {
    let (layer, _) = layer();
    let calls = AtomicUsize::new(0);
    let op = Operation::mutation("createEmpresa", "mutation { createEmpresa { id } }");

    counted(&layer, &op, &calls).await;
    counted(&layer, &op, &calls).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(layer.cache().is_empty());
  }

  #[tokio::test]
  async fn test_network_only_read_bypasses_cache() {
    let (layer, _) = layer();
    let calls = AtomicUsize::new(0);
    let op = empresas().network_only();

    counted(&layer, &op, &calls).await;
    counted(&layer, &op, &calls).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_different_variables_are_different_entries() {
    let (layer, _) = layer();
    let calls = AtomicUsize::new(0);

    counted(&layer, &empresas().var("rubro", "retail"), &calls).await;
    counted(&layer, &empresas().var("rubro", "salud"), &calls).await;
    counted(&layer, &empresas().var("rubro", "retail"), &calls).await;
    assert_eq!(calls.load(Ordering::SeqCst), 2);
  }
}
