//! [`SqliteStore`] — the SQLite implementation of [`RecipeStore`].

use std::path::Path;

use pantry_core::{
  filter::SearchFilter,
  page::{Page, PageRequest},
  recipe::{NewRecipe, Recipe},
  store::{RecipeStore, ReplaceReport},
};
use rusqlite::{functions::FunctionFlags, types::Value};
use tracing::{debug, info, warn};

use crate::{
  Result,
  encode::{EncodedRecipe, RECIPE_COLUMNS, RawRecipe, nutrient_value},
  query::{WhereClause, compile},
  schema::{NUTRIENT_VALUE_FN, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A recipe store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init().await?;
    Ok(store)
  }

  /// Create the schema and register the `nutrient_value` SQL function.
  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        conn.create_scalar_function(
          NUTRIENT_VALUE_FN,
          2,
          FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
          |ctx| {
            let key: String = ctx.get(1)?;
            Ok(
              ctx
                .get_raw(0)
                .as_str()
                .ok()
                .and_then(|blob| nutrient_value(blob, &key)),
            )
          },
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Count and fetch one window of the rows matching `clause`, ordered by id.
  async fn fetch_page(
    &self,
    clause: WhereClause,
    page:   PageRequest,
  ) -> Result<Page<Recipe>> {
    let limit  = i64::from(page.limit);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

    let (total, raws): (i64, Vec<RawRecipe>) = self
      .conn
      .call(move |conn| {
        let WhereClause { sql: where_sql, params } = clause;

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM recipes {where_sql}"),
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?;

        let mut window = params;
        window.push(Value::Integer(limit));
        window.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&format!(
          "SELECT {RECIPE_COLUMNS}
           FROM recipes
           {where_sql}
           ORDER BY id ASC
           LIMIT ? OFFSET ?"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(window.iter()), RawRecipe::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(RawRecipe::into_recipe)
      .collect::<Result<Vec<_>>>()?;

    Ok(Page { items, total: u64::try_from(total).unwrap_or(0) })
  }
}

// ─── RecipeStore impl ────────────────────────────────────────────────────────

impl RecipeStore for SqliteStore {
  type Error = crate::Error;

  async fn list(&self, page: PageRequest) -> Result<Page<Recipe>> {
    self.fetch_page(WhereClause::default(), page).await
  }

  async fn search(&self, filter: &SearchFilter, page: PageRequest) -> Result<Page<Recipe>> {
    let clause = compile(filter);
    debug!(sql = %clause.sql, params = clause.params.len(), "search");
    self.fetch_page(clause, page).await
  }

  async fn replace_all(&self, recipes: Vec<NewRecipe>) -> Result<ReplaceReport> {
    let rows: Vec<EncodedRecipe> = recipes.into_iter().map(EncodedRecipe::from).collect();

    let report = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM recipes", [])?;
        debug!(removed, "cleared recipes");

        let mut report = ReplaceReport::default();
        {
          let mut stmt = tx.prepare(
            "INSERT INTO recipes (
               title, cuisine, rating, prep_time, cook_time, total_time,
               description, nutrients, serves
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          )?;

          for (index, row) in rows.into_iter().enumerate() {
            let nutrients = match row.nutrients {
              Ok(n) => n,
              Err(e) => {
                warn!(index, title = %row.title, error = %e, "skipping recipe");
                report.skipped += 1;
                continue;
              }
            };

            let inserted = stmt.execute(rusqlite::params![
              row.title,
              row.cuisine,
              row.rating,
              row.prep_time,
              row.cook_time,
              row.total_time,
              row.description,
              nutrients,
              row.serves,
            ]);

            match inserted {
              Ok(_) => {
                report.inserted += 1;
                debug!(id = tx.last_insert_rowid(), title = %row.title, "added recipe");
              }
              Err(e) => {
                warn!(index, title = %row.title, error = %e, "skipping recipe");
                report.skipped += 1;
              }
            }
          }
        }

        tx.commit()?;
        Ok(report)
      })
      .await?;

    info!(inserted = report.inserted, skipped = report.skipped, "replaced recipes");
    Ok(report)
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM recipes", [], |row| row.get(0))?)
      })
      .await?;
    Ok(u64::try_from(n).unwrap_or(0))
  }
}
