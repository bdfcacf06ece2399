//! GraphQL access to the recruitment gateway.
//!
//! Everything the UI knows about the backend goes through one POST endpoint.
//! This module owns the operation descriptor, the wire envelope, the error
//! taxonomy and the executor that ties them together.

pub mod envelope;
pub mod error;
pub mod executor;
pub mod operation;

#[cfg(test)]
pub mod testing;

pub use envelope::extract_field;
pub use error::{DataError, ValidationError};
pub use executor::{HttpTransport, QueryExecutor};
pub use operation::Operation;
