//! Bulk dataset loading.
//!
//! A dataset is a single JSON object whose values are recipe objects; the
//! keys are arbitrary (typically `"0"`, `"1"`, ...) and only used in logs.
//! Entries are loaded in file order.

use std::path::Path;

use anyhow::Context as _;
use pantry_core::{
  recipe::NewRecipe,
  store::{RecipeStore, ReplaceReport},
};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Read and convert a dataset file. An unreadable or malformed file is an
/// error; an individual entry that fails conversion is logged and skipped.
pub async fn read_dataset(path: &Path) -> anyhow::Result<Vec<NewRecipe>> {
  let bytes = tokio::fs::read(path)
    .await
    .with_context(|| format!("failed to read dataset {path:?}"))?;
  let entries: Map<String, Value> = serde_json::from_slice(&bytes)
    .with_context(|| format!("dataset {path:?} is not a JSON object"))?;
  Ok(convert_entries(entries))
}

fn convert_entries(entries: Map<String, Value>) -> Vec<NewRecipe> {
  entries
    .into_iter()
    .filter_map(|(key, value)| match NewRecipe::from_json(&value) {
      Ok(recipe) => Some(recipe),
      Err(e) => {
        warn!(%key, error = %e, "skipping dataset entry");
        None
      }
    })
    .collect()
}

/// Replace the contents of `store` with the dataset at `path`.
pub async fn load<S: RecipeStore>(store: &S, path: &Path) -> anyhow::Result<ReplaceReport> {
  let recipes = read_dataset(path).await?;
  info!(path = %path.display(), entries = recipes.len(), "loading dataset");
  let report = store
    .replace_all(recipes)
    .await
    .context("failed to replace recipes")?;
  info!(inserted = report.inserted, skipped = report.skipped, "dataset loaded");
  Ok(report)
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use pantry_core::{page::PageRequest, store::RecipeStore};
  use pantry_store_sqlite::SqliteStore;

  use super::*;

  fn dataset(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
  }

  const DATA: &str = r#"{
    "0":  { "title": "Zucchini Bread", "cuisine": "Breads", "rating": 4.7,
            "prep_time": 20, "cook_time": 60, "total_time": 80,
            "nutrients": { "calories": "210 kcal" }, "serves": "12 slices" },
    "1":  { "title": "Broken", "rating": "excellent" },
    "10": { "title": "Apple Pie", "cuisine": "Desserts", "total_time": 95.0 },
    "2":  "not a recipe"
  }"#;

  #[tokio::test]
  async fn bad_entries_are_skipped_in_file_order() {
    let file = dataset(DATA);
    let recipes = read_dataset(file.path()).await.unwrap();
    let titles: Vec<_> = recipes.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Zucchini Bread", "Apple Pie"]);
    assert_eq!(recipes[1].total_time, Some(95));
  }

  #[tokio::test]
  async fn malformed_or_missing_file_is_an_error() {
    let file = dataset("[1, 2, 3]");
    assert!(read_dataset(file.path()).await.is_err());

    let file = dataset("{ not json");
    assert!(read_dataset(file.path()).await.is_err());

    assert!(read_dataset(Path::new("/definitely/not/here.json")).await.is_err());
  }

  #[tokio::test]
  async fn load_replaces_previous_contents() {
    let store = SqliteStore::open_in_memory().await.unwrap();

    let first = dataset(r#"{ "a": { "title": "Old Soup" }, "b": { "title": "Old Stew" } }"#);
    load(&store, first.path()).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 2);

    let second = dataset(DATA);
    let report = load(&store, second.path()).await.unwrap();
    assert_eq!(report.inserted, 2);

    let page = store.list(PageRequest { page: 1, limit: 10 }).await.unwrap();
    assert_eq!(page.total, 2);
    let titles: Vec<_> = page.items.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Zucchini Bread", "Apple Pie"]);
    assert_eq!(page.items[0].id, 1);
  }
}
