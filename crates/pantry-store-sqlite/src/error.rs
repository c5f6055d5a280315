//! Error type for `pantry-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored row could not be turned back into a recipe.
  #[error("failed to decode recipe {id}: {reason}")]
  Decode { id: i64, reason: String },
}

impl pantry_core::store::StoreError for Error {
  fn is_decode(&self) -> bool { matches!(self, Self::Decode { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
