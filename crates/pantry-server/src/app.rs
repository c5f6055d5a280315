//! Top-level router: the recipe API under `/api`, wrapped in CORS and
//! request tracing.

use std::{sync::Arc, time::Duration};

use axum::{
  Router,
  http::{Request, Response},
};
use pantry_core::store::RecipeStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Span;

pub fn router<S>(store: Arc<S>) -> Router
where
  S: RecipeStore + 'static,
{
  Router::new()
    .nest("/api", pantry_api::api_router(store))
    .layer(CorsLayer::permissive())
    .layer(
      TraceLayer::new_for_http()
        .make_span_with(|req: &Request<_>| {
          let method = req.method().clone();
          let uri = req.uri().clone();
          tracing::info_span!(
            "http_request",
            %method,
            uri = %uri,
            status = tracing::field::Empty
          )
        })
        .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
          let status = res.status();
          span.record("status", tracing::field::display(status));
          if status.is_server_error() {
            tracing::error!(%status, ?latency, "response");
          } else {
            tracing::info!(%status, ?latency, "response");
          }
        }),
    )
}

#[cfg(test)]
mod tests {
  use axum::{body::Body, http::StatusCode};
  use pantry_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  async fn app() -> Router {
    router(Arc::new(SqliteStore::open_in_memory().await.unwrap()))
  }

  #[tokio::test]
  async fn api_is_mounted_with_cors() {
    let req = Request::builder()
      .uri("/api/recipes/search?title=soup")
      .header("origin", "http://localhost:3000")
      .body(Body::empty())
      .unwrap();
    let resp = app().await.oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
      resp.headers().get("access-control-allow-origin").unwrap(),
      "*"
    );
  }

  #[tokio::test]
  async fn unknown_path_is_not_found() {
    let req = Request::builder().uri("/recipes").body(Body::empty()).unwrap();
    let resp = app().await.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }
}
