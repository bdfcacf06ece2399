//! Composition root for the data layer.
//!
//! A [`Session`] owns the executor and the response cache and hands out
//! hooks and the analytics client that share them. The cache is injected,
//! so two sessions never see each other's entries unless they are given
//! the same one.

use chrono::Duration;
use color_eyre::Result;
use std::sync::Arc;
use tracing::info;

use crate::cache::{CacheLayer, ResponseCache, DEFAULT_TTL_SECS};
use crate::config::Config;
use crate::domain::AnalyticsClient;
use crate::graphql::{HttpTransport, QueryExecutor};
use crate::hook::{Entity, EntityHook};

#[derive(Clone)]
pub struct Session {
  executor: QueryExecutor,
  layer: CacheLayer,
}

impl Session {
  pub fn new(executor: QueryExecutor, cache: Arc<ResponseCache>) -> Self {
    Self {
      executor,
      layer: CacheLayer::new(cache),
    }
  }

  /// HTTP transport plus either the shared cache or one with the configured TTL.
  pub fn from_config(config: &Config) -> Result<Self> {
    let transport = HttpTransport::new(&config.gateway, Config::get_api_token())?;
    let cache = match config.cache.ttl_secs {
      Some(secs) => {
        let ttl = i64::try_from(secs)
          .ok()
          .and_then(Duration::try_seconds)
          .unwrap_or_else(|| Duration::seconds(DEFAULT_TTL_SECS));
        Arc::new(ResponseCache::new(ttl))
      }
      None => ResponseCache::shared(),
    };

    info!(gateway = %config.gateway.url, ttl = %cache.ttl(), "session ready");
    Ok(Self::new(QueryExecutor::new(Arc::new(transport)), cache))
  }

  pub fn hook<E: Entity>(&self) -> EntityHook<E> {
    EntityHook::new(self.executor.clone(), self.layer.clone())
  }

  /// Hook whose list query carries `variables`.
  #[cfg(test)]
  pub fn hook_with<E: Entity>(
    &self,
    variables: serde_json::Map<String, serde_json::Value>,
  ) -> EntityHook<E> {
    self.hook().with_list_variables(variables)
  }

  pub fn analytics(&self) -> AnalyticsClient {
    AnalyticsClient::new(self.executor.clone(), self.layer.clone())
  }

  pub fn cache(&self) -> &Arc<ResponseCache> {
    self.layer.cache()
  }

  /// Forget every cached read.
  pub fn logout(&self) {
    let entries = self.cache().len();
    self.cache().clear();
    info!(entries, "cache cleared");
  }
}
