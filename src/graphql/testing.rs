//! In-memory gateway used by tests across the crate.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::envelope::{GraphQlRequest, GraphQlResponse};
use super::error::DataError;
use super::executor::{QueryExecutor, Transport};

type Handler = dyn Fn(&GraphQlRequest) -> Result<GraphQlResponse, DataError> + Send + Sync;

/// Records every request and answers it with a closure.
///
/// With a gate installed, each request waits for one `Notify` permit before
/// answering, which lets tests observe in-flight state.
pub struct MockGateway {
  handler: Box<Handler>,
  calls: Mutex<Vec<GraphQlRequest>>,
  gate: Option<Arc<Notify>>,
}

impl MockGateway {
  pub fn new<F>(handler: F) -> Arc<Self>
  where
    F: Fn(&GraphQlRequest) -> Result<GraphQlResponse, DataError> + Send + Sync + 'static,
  {
    Arc::new(Self {
      handler: Box::new(handler),
      calls: Mutex::new(Vec::new()),
      gate: None,
    })
  }

  pub fn gated<F>(handler: F, gate: Arc<Notify>) -> Arc<Self>
  where
    F: Fn(&GraphQlRequest) -> Result<GraphQlResponse, DataError> + Send + Sync + 'static,
  {
    Arc::new(Self {
      handler: Box::new(handler),
      calls: Mutex::new(Vec::new()),
      gate: Some(gate),
    })
  }

  pub fn executor(self: &Arc<Self>) -> QueryExecutor {
    QueryExecutor::new(self.clone())
  }

  pub fn call_count(&self, operation_name: &str) -> usize {
    self
      .calls
      .lock()
      .unwrap()
      .iter()
      .filter(|r| r.operation_name == operation_name)
      .count()
  }

  pub fn total_calls(&self) -> usize {
    self.calls.lock().unwrap().len()
  }

  pub fn requests(&self) -> Vec<GraphQlRequest> {
    self.calls.lock().unwrap().clone()
  }
}

#[async_trait]
impl Transport for MockGateway {
  async fn post(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, DataError> {
    self.calls.lock().unwrap().push(request.clone());
    if let Some(gate) = &self.gate {
      gate.notified().await;
    }
    (self.handler)(request)
  }
}
