//! Local field checks run before any mutation is sent.

use regex::Regex;
use std::sync::OnceLock;

use crate::graphql::ValidationError;

/// Inputs that can be checked without the network.
pub trait Validate {
  fn validate(&self) -> Result<(), ValidationError>;
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::new(field, "must not be empty"));
  }
  Ok(())
}

pub fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
  static EMAIL: OnceLock<Regex> = OnceLock::new();
  let re = EMAIL
    .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

  if !re.is_match(value.trim()) {
    return Err(ValidationError::new(field, "must be a valid email address"));
  }
  Ok(())
}

pub fn require_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
  if !(value.is_finite() && value > 0.0) {
    return Err(ValidationError::new(field, "must be greater than zero"));
  }
  Ok(())
}

pub fn require_in_range(
  field: &'static str,
  value: f64,
  min: f64,
  max: f64,
) -> Result<(), ValidationError> {
  if !(min..=max).contains(&value) {
    return Err(ValidationError::new(
      field,
      format!("must be between {} and {}", min, max),
    ));
  }
  Ok(())
}
