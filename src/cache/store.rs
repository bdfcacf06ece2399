//! In-memory response cache with a fixed TTL.

use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tracing::debug;

use super::key::cache_key;
use super::traits::{Clock, SystemClock};

/// Default time-to-live for cached reads.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

/// One stored read result.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
  pub key: String,
  pub payload: Value,
  pub stored_at: DateTime<Utc>,
}

/// Response cache keyed by operation name + canonical variables.
///
/// The cache is the only shared mutable state in the data layer. All access
/// goes through one mutex; no caller holds it across a network call.
pub struct ResponseCache {
  entries: Mutex<HashMap<String, CacheEntry>>,
  ttl: Duration,
  clock: Arc<dyn Clock>,
}

impl ResponseCache {
  pub fn new(ttl: Duration) -> Self {
    Self::with_clock(ttl, Arc::new(SystemClock))
  }

  pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      ttl,
      clock,
    }
  }

  /// Process-wide cache with the default TTL.
  ///
  /// Callers that need isolation (tests, a second session) construct their
  /// own and inject it instead.
  pub fn shared() -> Arc<ResponseCache> {
    static SHARED: OnceLock<Arc<ResponseCache>> = OnceLock::new();
    SHARED
      .get_or_init(|| Arc::new(ResponseCache::new(Duration::seconds(DEFAULT_TTL_SECS))))
      .clone()
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Look up a fresh entry. Expired entries are evicted here.
  pub fn get(&self, operation_name: &str, variables: &Map<String, Value>) -> Option<CacheEntry> {
    let key = cache_key(operation_name, variables);
    let now = self.clock.now();
    let mut entries = self.lock();

    let fresh = match entries.get(&key) {
      Some(entry) => now - entry.stored_at < self.ttl,
      None => return None,
    };

    if fresh {
      entries.get(&key).cloned()
    } else {
      debug!(key = %key, "evicting expired entry");
      entries.remove(&key);
      None
    }
  }

  /// Store a payload, replacing whatever was there.
  pub fn put(&self, operation_name: &str, variables: &Map<String, Value>, payload: Value) {
    let key = cache_key(operation_name, variables);
    let entry = CacheEntry {
      key: key.clone(),
      payload,
      stored_at: self.clock.now(),
    };
    self.lock().insert(key, entry);
  }

  /// Drop every entry whose key starts with `prefix`. Returns how many went.
  pub fn invalidate(&self, prefix: &str) -> usize {
    let mut entries = self.lock();
    let before = entries.len();
    entries.retain(|key, _| !key.starts_with(prefix));
    let removed = before - entries.len();
    debug!(prefix, removed, "invalidated cache entries");
    removed
  }

  /// Drop everything.
  pub fn clear(&self) {
    self.lock().clear();
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  #[cfg(test)]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // A panic while holding the lock cannot leave a half-written entry, so the
  // map is still usable after poisoning.
  fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl std::fmt::Debug for ResponseCache {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ResponseCache")
      .field("entries", &self.len())
      .field("ttl", &self.ttl)
      .finish_non_exhaustive()
  }
}
