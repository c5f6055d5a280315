//! Handlers for the `/recipes` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/recipes` | `?page` (default 1), `?limit` (default 10); ascending id |
//! | `GET`  | `/recipes/search` | filters from [`SearchFilter::from_params`]; `?limit` defaults to 15 |
//!
//! Query strings are read as a plain map so that malformed values fall back
//! to defaults instead of being rejected.

use std::{collections::HashMap, sync::Arc};

use axum::{
  Json,
  extract::{Query, State},
};
use pantry_core::{
  filter::SearchFilter,
  page::{DEFAULT_LIST_LIMIT, DEFAULT_SEARCH_LIMIT, PageRequest},
  recipe::Recipe,
  store::{RecipeStore, StoreError as _},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ListResponse {
  pub page:  u32,
  pub limit: u32,
  pub total: u64,
  pub data:  Vec<Recipe>,
}

/// `GET /recipes[?page=...][&limit=...]`
#[instrument(skip_all)]
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<HashMap<String, String>>,
) -> Result<Json<ListResponse>, ApiError>
where
  S: RecipeStore,
{
  let page = PageRequest::from_params(&params, DEFAULT_LIST_LIMIT);
  let result = store
    .list(page)
    .await
    .map_err(|e| ApiError::List(Box::new(e)))?;

  debug!(total = result.total, page = page.page, limit = page.limit, "listed recipes");
  Ok(Json(ListResponse {
    page:  page.page,
    limit: page.limit,
    total: result.total,
    data:  result.items,
  }))
}

// ─── Search ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SearchResponse {
  pub data:  Vec<Recipe>,
  pub total: u64,
  pub page:  u32,
  pub limit: u32,
}

/// `GET /recipes/search[?total_time=...][&rating=...][&calories=...][&title=...][&cuisine=...][&page=...][&limit=...]`
#[instrument(skip_all)]
pub async fn search<S>(
  State(store): State<Arc<S>>,
  Query(params): Query<HashMap<String, String>>,
) -> Result<Json<SearchResponse>, ApiError>
where
  S: RecipeStore,
{
  debug!(?params, "search parameters");
  let filter = SearchFilter::from_params(&params);
  let page = PageRequest::from_params(&params, DEFAULT_SEARCH_LIMIT);

  let result = store.search(&filter, page).await.map_err(|e| {
    if e.is_decode() {
      ApiError::Results(Box::new(e))
    } else {
      ApiError::Search(Box::new(e))
    }
  })?;

  debug!(
    total = result.total,
    returned = result.items.len(),
    page = page.page,
    "search results"
  );
  Ok(Json(SearchResponse {
    data:  result.items,
    total: result.total,
    page:  page.page,
    limit: page.limit,
  }))
}
