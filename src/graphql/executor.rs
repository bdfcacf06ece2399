use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::GatewayConfig;

use super::envelope::{GraphQlRequest, GraphQlResponse};
use super::error::{DataError, GraphQlError, ValidationError};
use super::operation::Operation;

/// One round trip to the gateway.
///
/// Implementations only move bytes: envelope interpretation lives in
/// [`QueryExecutor`].
#[async_trait]
pub trait Transport: Send + Sync {
  async fn post(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, DataError>;
}

/// Transport over HTTP POST with a JSON body.
pub struct HttpTransport {
  client: reqwest::Client,
  endpoint: Url,
  token: Option<String>,
}

impl HttpTransport {
  pub fn new(config: &GatewayConfig, token: Option<String>) -> Result<Self> {
    let endpoint =
      Url::parse(&config.url).map_err(|e| eyre!("Invalid gateway URL {}: {}", config.url, e))?;

    let mut builder = reqwest::Client::builder();
    if let Some(secs) = config.timeout_secs {
      builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = builder
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self {
      client,
      endpoint,
      token,
    })
  }
}

#[async_trait]
impl Transport for HttpTransport {
  async fn post(&self, request: &GraphQlRequest) -> Result<GraphQlResponse, DataError> {
    let mut builder = self.client.post(self.endpoint.clone()).json(request);
    if let Some(token) = &self.token {
      builder = builder.bearer_auth(token);
    }

    let response = builder
      .send()
      .await
      .map_err(|e| DataError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      return Err(DataError::Network(format!("gateway answered HTTP {}", status)));
    }

    response
      .json::<GraphQlResponse>()
      .await
      .map_err(|e| DataError::Decode(e.to_string()))
  }
}

/// Sends operations and unwraps the `{data, errors}` envelope.
///
/// Stateless apart from the transport handle; it never reads or writes the
/// response cache, so reads and mutations go through the same path.
#[derive(Clone)]
pub struct QueryExecutor {
  transport: Arc<dyn Transport>,
}

impl QueryExecutor {
  pub fn new(transport: Arc<dyn Transport>) -> Self {
    Self { transport }
  }

  /// Execute one operation. Returns `data`, which may be `Value::Null`.
  pub async fn execute(&self, operation: &Operation) -> Result<Value, DataError> {
    if operation.document().trim().is_empty() {
      return Err(ValidationError::new("document", "operation document must not be empty").into());
    }

    debug!(
      operation = operation.name(),
      kind = ?operation.kind(),
      policy = ?operation.policy(),
      "executing"
    );

    let response = match self.transport.post(&operation.to_request()).await {
      Ok(response) => response,
      Err(e) => {
        warn!(operation = operation.name(), error = %e, "transport failed");
        return Err(e);
      }
    };

    if !response.errors().is_empty() {
      let err = GraphQlError::from_api_errors(response.errors());
      warn!(
        operation = operation.name(),
        code = err.code.as_deref().unwrap_or("-"),
        error = %err,
        "gateway returned errors"
      );
      return Err(err.into());
    }

    Ok(response.data.unwrap_or(Value::Null))
  }
}
