//! The `RecipeStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `pantry-store-sqlite`).
//! Higher layers (`pantry-api`, `pantry-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  filter::SearchFilter,
  page::{Page, PageRequest},
  recipe::{NewRecipe, Recipe},
};

/// Outcome of [`RecipeStore::replace_all`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceReport {
  pub inserted: usize,
  /// Records that failed to insert and were left out of the new set.
  pub skipped:  usize,
}

/// Error bound for store backends.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// True when rows were read but could not be turned back into recipes, as
  /// opposed to a failure of the query itself.
  fn is_decode(&self) -> bool { false }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a recipe store backend.
///
/// Reads have no side effects. The only write is a full replacement of the
/// record set, which readers observe atomically.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecipeStore: Send + Sync {
  type Error: StoreError;

  /// Return one page of all recipes in ascending `id` order. A page past the
  /// end yields no items but still reports the full `total`.
  fn list(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Recipe>, Self::Error>> + Send + '_;

  /// Return one page of the recipes matching every filter in `filter`.
  /// Ordering is stable across calls while the data is unchanged.
  fn search<'a>(
    &'a self,
    filter: &'a SearchFilter,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Recipe>, Self::Error>> + Send + 'a;

  /// Delete every recipe and insert `recipes` in order, assigning fresh ids.
  ///
  /// A record that fails to insert is logged and skipped; the rest of the
  /// batch is still committed, once, at the end.
  fn replace_all(
    &self,
    recipes: Vec<NewRecipe>,
  ) -> impl Future<Output = Result<ReplaceReport, Self::Error>> + Send + '_;

  /// Number of stored recipes.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;
}
