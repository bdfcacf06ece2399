//! Error taxonomy shared by the executor, the cache layer and the entity hooks.

use super::envelope::ApiError;

/// Everything that can go wrong between a UI call and the gateway.
///
/// The `Display` form of each variant is what ends up in a hook's `error`
/// field, so messages are written for humans.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataError {
  /// Local check failed before anything was sent
  #[error(transparent)]
  Validation(#[from] ValidationError),
  /// Transport failure, timeout or non-2xx status
  #[error("could not reach the gateway: {0}")]
  Network(String),
  /// 2xx response carrying GraphQL errors
  #[error(transparent)]
  GraphQl(#[from] GraphQlError),
  /// Response did not have the expected shape
  #[error("unexpected response from the gateway: {0}")]
  Decode(String),
}

impl DataError {
  #[cfg(test)]
  pub fn is_validation(&self) -> bool {
    matches!(self, DataError::Validation(_))
  }
}

/// A field that failed local validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
  pub field: &'static str,
  pub message: String,
}

impl ValidationError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    Self {
      field,
      message: message.into(),
    }
  }
}

/// Server-reported GraphQL failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct GraphQlError {
  /// All server messages joined with "; "
  pub message: String,
  /// First `extensions.code` found, if any
  pub code: Option<String>,
}

impl GraphQlError {
  /// Collapse the `errors` array of a response into one error.
  pub fn from_api_errors(errors: &[ApiError]) -> Self {
    let message = errors
      .iter()
      .map(|e| e.message.as_str())
      .collect::<Vec<_>>()
      .join("; ");

    let code = errors
      .iter()
      .find_map(|e| e.extensions.as_ref().and_then(|x| x.code.clone()));

    Self { message, code }
  }
}
