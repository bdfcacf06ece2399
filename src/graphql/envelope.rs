//! Wire types for the gateway's POST endpoint.
//!
//! Request: `{query, variables, operationName}`.
//! Response: `{data?, errors?: [{message, extensions?: {code?}}]}`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::DataError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest {
  pub query: String,
  pub variables: Map<String, Value>,
  pub operation_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
  #[serde(default)]
  pub data: Option<Value>,
  #[serde(default)]
  pub errors: Option<Vec<ApiError>>,
}

impl GraphQlResponse {
  #[cfg(test)]
  pub fn ok(data: Value) -> Self {
    Self {
      data: Some(data),
      errors: None,
    }
  }

  /// Errors attached to the response, empty when there are none.
  pub fn errors(&self) -> &[ApiError] {
    self.errors.as_deref().unwrap_or(&[])
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
  pub message: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub extensions: Option<ApiErrorExtensions>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorExtensions {
  #[serde(default)]
  pub code: Option<String>,
}

/// Pull `data[field]` out of a result and deserialize it.
///
/// A null `data`, a missing field and a null field all mean "no such entity"
/// and come back as `Ok(None)`.
pub fn extract_field<T: DeserializeOwned>(
  data: &Value,
  field: &str,
) -> Result<Option<T>, DataError> {
  match data.get(field) {
    None | Some(Value::Null) => Ok(None),
    Some(value) => T::deserialize(value)
      .map(Some)
      .map_err(|e| DataError::Decode(format!("field `{}`: {}", field, e))),
  }
}
