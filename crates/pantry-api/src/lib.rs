//! JSON REST API for Pantry.
//!
//! Exposes an axum [`Router`] backed by any [`pantry_core::store::RecipeStore`].
//! CORS, tracing, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", pantry_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod recipes;

use std::sync::Arc;

use axum::{Router, routing::get};
use pantry_core::store::RecipeStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecipeStore + 'static,
{
  Router::new()
    .route("/recipes", get(recipes::list::<S>))
    .route("/recipes/search", get(recipes::search::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
