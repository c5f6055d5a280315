//! Error types for `pantry-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("recipe entry is not a JSON object")]
  NotAnObject,

  #[error("field {field:?} has an unexpected type: {found}")]
  FieldType {
    field: &'static str,
    found: String,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
