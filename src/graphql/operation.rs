//! Immutable description of one GraphQL call.

use serde_json::{Map, Value};

use super::envelope::GraphQlRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
  Query,
  Mutation,
}

/// Whether a read may be served from the response cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
  /// Check the cache first, store successful results
  CacheFirst,
  /// Always go to the network, never store
  NetworkOnly,
}

/// A named query or mutation plus its variables.
///
/// Built once per call site and consumed by the executor. Variables keep
/// their insertion order on the wire; cache keys do not depend on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
  kind: OperationKind,
  name: String,
  document: String,
  variables: Map<String, Value>,
  policy: CachePolicy,
}

impl Operation {
  /// A read. Cached unless `network_only()` is applied.
  pub fn query(name: impl Into<String>, document: impl Into<String>) -> Self {
    Self {
      kind: OperationKind::Query,
      name: name.into(),
      document: document.into(),
      variables: Map::new(),
      policy: CachePolicy::CacheFirst,
    }
  }

  /// A write. Mutations are never cached.
  pub fn mutation(name: impl Into<String>, document: impl Into<String>) -> Self {
    Self {
      kind: OperationKind::Mutation,
      name: name.into(),
      document: document.into(),
      variables: Map::new(),
      policy: CachePolicy::NetworkOnly,
    }
  }

  /// Add (or replace) one variable.
  pub fn var(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.variables.insert(key.into(), value.into());
    self
  }

  /// Merge a whole variable map, later keys win.
  pub fn vars(mut self, variables: Map<String, Value>) -> Self {
    self.variables.extend(variables);
    self
  }

  /// Skip the cache for this read.
  #[cfg(test)]
  pub fn network_only(mut self) -> Self {
    self.policy = CachePolicy::NetworkOnly;
    self
  }

  pub fn kind(&self) -> OperationKind {
    self.kind
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn document(&self) -> &str {
    &self.document
  }

  pub fn variables(&self) -> &Map<String, Value> {
    &self.variables
  }

  pub fn policy(&self) -> CachePolicy {
    self.policy
  }

  pub fn is_cacheable(&self) -> bool {
    self.kind == OperationKind::Query && self.policy == CachePolicy::CacheFirst
  }

  pub(crate) fn to_request(&self) -> GraphQlRequest {
    GraphQlRequest {
      query: self.document.clone(),
      variables: self.variables.clone(),
      operation_name: self.name.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_mutation_is_never_cacheable() {
    let op = Operation::mutation("createEmpresa", "mutation { x }");
    assert!(!op.is_cacheable());
    assert_eq!(op.policy(), CachePolicy::NetworkOnly);
  }

  #[test]
  fn test_query_opt_out() {
    let op = Operation::query("empresas", "query { empresas { id } }");
    assert!(op.is_cacheable());
    assert!(!op.network_only().is_cacheable());
  }

  #[test]
  fn test_variables_keep_insertion_order() {
    let op = Operation::query("ofertas", "query { x }")
      .var("z", 1)
      .var("a", "x")
      .var("m", json!([1, 2]));
    let keys: Vec<&str> = op.variables().keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
  }

  #[test]
  fn test_to_request() {
    let op = Operation::query("empresa", "query Empresa($id: ID!) { empresa(id: $id) { id } }")
      .var("id", "7");
    let request = op.to_request();
    assert_eq!(request.operation_name, "empresa");
    assert_eq!(request.variables["id"], "7");
  }
}
