//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is a 500; bad input never surfaces as an error because the
//! filter compiler and pagination absorb it.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The listing endpoint failed.
  #[error("failed to fetch recipes: {0}")]
  List(#[source] BoxError),

  /// Rows were read but could not be shaped into results.
  #[error("failed to process results: {0}")]
  Results(#[source] BoxError),

  /// Any other search failure.
  #[error("search failed: {0}")]
  Search(#[source] BoxError),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    tracing::error!(error = %self, "request failed");
    let body = match &self {
      ApiError::List(_) => json!({ "error": "Failed to fetch recipes" }),
      ApiError::Results(e) => json!({
        "error":   "Failed to process results",
        "message": e.to_string(),
      }),
      ApiError::Search(e) => json!({
        "error":   "Internal server error",
        "message": e.to_string(),
      }),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
  }
}
