//! Encoding and decoding helpers between [`Recipe`] and the plain column
//! values stored in SQLite.
//!
//! `nutrients` is stored as compact JSON text. Text columns may be NULL in
//! rows written by older loaders; they decode to the empty string.

use pantry_core::{
  filter::extract_numeric,
  recipe::{NewRecipe, Nutrients, Recipe},
};

use crate::{Error, Result};

/// Column list shared by every `SELECT` that produces a [`RawRecipe`].
pub const RECIPE_COLUMNS: &str = "id, title, cuisine, rating, prep_time, cook_time, \
                                  total_time, description, nutrients, serves";

// ─── Nutrients ───────────────────────────────────────────────────────────────

pub fn encode_nutrients(n: &Nutrients) -> Result<String, serde_json::Error> {
  serde_json::to_string(n)
}

/// Body of the `nutrient_value(blob, key)` SQL function. Malformed JSON is
/// treated like a missing key.
pub fn nutrient_value(blob: &str, key: &str) -> Option<f64> {
  let nutrients: Nutrients = serde_json::from_str(blob).ok()?;
  extract_numeric(&nutrients, key)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column values for one `INSERT`, owned so they can cross into the
/// connection thread.
pub struct EncodedRecipe {
  pub title:       String,
  pub cuisine:     String,
  pub rating:      Option<f64>,
  pub prep_time:   Option<i64>,
  pub cook_time:   Option<i64>,
  pub total_time:  Option<i64>,
  pub description: String,
  pub nutrients:   Result<String, serde_json::Error>,
  pub serves:      String,
}

impl From<NewRecipe> for EncodedRecipe {
  fn from(r: NewRecipe) -> Self {
    Self {
      nutrients:   encode_nutrients(&r.nutrients),
      title:       r.title,
      cuisine:     r.cuisine,
      rating:      r.rating,
      prep_time:   r.prep_time,
      cook_time:   r.cook_time,
      total_time:  r.total_time,
      description: r.description,
      serves:      r.serves,
    }
  }
}

/// Raw values read directly from a `recipes` row.
pub struct RawRecipe {
  pub id:          i64,
  pub title:       Option<String>,
  pub cuisine:     Option<String>,
  pub rating:      Option<f64>,
  pub prep_time:   Option<i64>,
  pub cook_time:   Option<i64>,
  pub total_time:  Option<i64>,
  pub description: Option<String>,
  pub nutrients:   Option<String>,
  pub serves:      Option<String>,
}

impl RawRecipe {
  /// Read a row selected with [`RECIPE_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      title:       row.get(1)?,
      cuisine:     row.get(2)?,
      rating:      row.get(3)?,
      prep_time:   row.get(4)?,
      cook_time:   row.get(5)?,
      total_time:  row.get(6)?,
      description: row.get(7)?,
      nutrients:   row.get(8)?,
      serves:      row.get(9)?,
    })
  }

  pub fn into_recipe(self) -> Result<Recipe> {
    let nutrients = match self.nutrients.as_deref() {
      None => Nutrients::new(),
      Some(text) => serde_json::from_str(text).map_err(|e| Error::Decode {
        id:     self.id,
        reason: format!("nutrients: {e}"),
      })?,
    };

    Ok(Recipe {
      id: self.id,
      title: self.title.unwrap_or_default(),
      cuisine: self.cuisine.unwrap_or_default(),
      rating: self.rating,
      prep_time: self.prep_time,
      cook_time: self.cook_time,
      total_time: self.total_time,
      description: self.description.unwrap_or_default(),
      nutrients,
      serves: self.serves.unwrap_or_default(),
    })
  }
}
