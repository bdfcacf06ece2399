//! Generic read/cache/mutate/refetch contract for one domain entity.
//!
//! Every entity screen talks to the gateway through an [`EntityHook`]. The
//! hook owns a small piece of observable state (`items`, `loading`,
//! `error`) and guarantees the same invalidation protocol for all entities:
//! a successful mutation drops the cached list query for that entity and
//! re-reads it, so the next snapshot reflects the change.

pub mod validate;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::cache::{CacheLayer, CacheSource};
use crate::graphql::{extract_field, DataError, Operation, QueryExecutor, ValidationError};

pub use validate::Validate;

/// A static GraphQL document. The root field of the result shares the
/// operation name (`empresas` → `data.empresas`).
#[derive(Debug, Clone, Copy)]
pub struct OperationDoc {
  pub name: &'static str,
  pub document: &'static str,
}

/// The four documents an entity needs.
#[derive(Debug, Clone, Copy)]
pub struct EntityDocuments {
  pub list: OperationDoc,
  pub create: OperationDoc,
  pub update: OperationDoc,
  pub delete: OperationDoc,
}

/// A record type served by the gateway.
pub trait Entity: Clone + fmt::Debug + Send + Sync + DeserializeOwned + 'static {
  /// Input accepted by create and update
  type Draft: Validate + Serialize + Send + Sync + 'static;

  /// Human label, used in logs and titles
  const LABEL: &'static str;

  const DOCUMENTS: EntityDocuments;

  fn id(&self) -> &str;
}

/// Observable state of a hook.
#[derive(Debug, Clone)]
pub struct HookState<E> {
  /// Server order, never re-sorted
  pub items: Vec<E>,
  pub loading: bool,
  pub error: Option<String>,
  /// Where the current items came from
  pub source: Option<CacheSource>,
  /// When the served list was stored, for cache hits
  pub cached_at: Option<DateTime<Utc>>,
}

impl<E> Default for HookState<E> {
  fn default() -> Self {
    Self {
      items: Vec::new(),
      loading: false,
      error: None,
      source: None,
      cached_at: None,
    }
  }
}

pub struct EntityHook<E: Entity> {
  executor: QueryExecutor,
  layer: CacheLayer,
  list_variables: Map<String, Value>,
  state: Arc<Mutex<HookState<E>>>,
}

impl<E: Entity> Clone for EntityHook<E> {
  fn clone(&self) -> Self {
    Self {
      executor: self.executor.clone(),
      layer: self.layer.clone(),
      list_variables: self.list_variables.clone(),
      state: Arc::clone(&self.state),
    }
  }
}

impl<E: Entity> EntityHook<E> {
  pub fn new(executor: QueryExecutor, layer: CacheLayer) -> Self {
    Self {
      executor,
      layer,
      list_variables: Map::new(),
      state: Arc::new(Mutex::new(HookState::default())),
    }
  }

  /// Scope the list query, e.g. applications of one job offer.
  #[cfg(test)]
  pub fn with_list_variables(mut self, variables: Map<String, Value>) -> Self {
    self.list_variables = variables;
    self
  }

  pub fn snapshot(&self) -> HookState<E> {
    self.lock().clone()
  }

  #[cfg(test)]
  pub fn items(&self) -> Vec<E> {
    self.lock().items.clone()
  }

  #[cfg(test)]
  pub fn is_loading(&self) -> bool {
    self.lock().loading
  }

  #[cfg(test)]
  pub fn error(&self) -> Option<String> {
    self.lock().error.clone()
  }

  /// Re-read the list through the cache.
  ///
  /// On failure the previous items stay in place and `error` is set.
  /// Overlapping calls are not collapsed: each one hits the gateway on a
  /// cache miss and whichever lands last wins.
  pub async fn refetch(&self) -> Result<(), DataError> {
    {
      let mut state = self.lock();
      state.loading = true;
      state.error = None;
    }

    let list = E::DOCUMENTS.list;
    let operation = Operation::query(list.name, list.document).vars(self.list_variables.clone());
    let executor = self.executor.clone();
    let request = operation.clone();

    let result = self
      .layer
      .fetch(&operation, move || async move { executor.execute(&request).await })
      .await
      .and_then(|fetched| {
        let items = extract_field::<Vec<E>>(&fetched.data, list.name)?.unwrap_or_default();
        Ok((items, fetched.source, fetched.cached_at))
      });

    let mut state = self.lock();
    state.loading = false;
    match result {
      Ok((items, source, cached_at)) => {
        state.items = items;
        state.source = Some(source);
        state.cached_at = cached_at;
        Ok(())
      }
      Err(e) => {
        warn!(entity = E::LABEL, error = %e, "refetch failed");
        state.error = Some(e.to_string());
        Err(e)
      }
    }
  }

  /// Create a record. Returns the server's copy, `None` if it answered null.
  pub async fn create(&self, draft: E::Draft) -> Result<Option<E>, DataError> {
    self.check(draft.validate())?;
    let input = self.encode(&draft)?;

    let doc = E::DOCUMENTS.create;
    let operation = Operation::mutation(doc.name, doc.document).var("input", input);
    let data = self.mutate(&operation).await?;
    extract_field(&data, doc.name)
  }

  pub async fn update(&self, id: &str, draft: E::Draft) -> Result<Option<E>, DataError> {
    self.check(validate::require_non_empty("id", id))?;
    self.check(draft.validate())?;
    let input = self.encode(&draft)?;

    let doc = E::DOCUMENTS.update;
    let operation = Operation::mutation(doc.name, doc.document)
      .var("id", id)
      .var("input", input);
    let data = self.mutate(&operation).await?;
    extract_field(&data, doc.name)
  }

  pub async fn delete(&self, id: &str) -> Result<(), DataError> {
    self.check(validate::require_non_empty("id", id))?;

    let doc = E::DOCUMENTS.delete;
    let operation = Operation::mutation(doc.name, doc.document).var("id", id);
    self.mutate(&operation).await?;
    Ok(())
  }

  /// Send a mutation, then invalidate and re-read the list on success.
  ///
  /// A failed refetch after a successful mutation is reported through
  /// `error` only; the mutation itself still succeeded.
  async fn mutate(&self, operation: &Operation) -> Result<Value, DataError> {
    match self.executor.execute(operation).await {
      Ok(data) => {
        let removed = self.layer.cache().invalidate(E::DOCUMENTS.list.name);
        info!(
          entity = E::LABEL,
          operation = operation.name(),
          invalidated = removed,
          "mutation applied"
        );
        let _ = self.refetch().await;
        Ok(data)
      }
      Err(e) => {
        warn!(entity = E::LABEL, operation = operation.name(), error = %e, "mutation failed");
        Err(self.fail(e))
      }
    }
  }

  fn check(&self, outcome: Result<(), ValidationError>) -> Result<(), DataError> {
    outcome.map_err(|e| self.fail(e.into()))
  }

  fn encode(&self, draft: &E::Draft) -> Result<Value, DataError> {
    serde_json::to_value(draft)
      .map_err(|e| self.fail(ValidationError::new("input", e.to_string()).into()))
  }

  /// Record an error in the observable state and hand it back.
  fn fail(&self, err: DataError) -> DataError {
    self.lock().error = Some(err.to_string());
    err
  }

  fn lock(&self) -> MutexGuard<'_, HookState<E>> {
    self.state.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
