//! Recipe types — the single resource held by the catalog.
//!
//! A recipe is created only by a bulk load and never updated afterwards. Its
//! `id` is assigned by the store on insert.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Semi-structured nutrient blob, e.g. `{"calories": "389 kcal", ...}`.
///
/// Kept as a free-form JSON object; only `calories` is ever queried.
pub type Nutrients = Map<String, Value>;

// ─── Recipe ──────────────────────────────────────────────────────────────────

/// A persisted recipe.
///
/// String fields are never absent: an unknown value is the empty string.
/// Numeric fields are `None` when unknown and serialise as `null`, never `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
  pub id:          i64,
  pub title:       String,
  pub cuisine:     String,
  pub rating:      Option<f64>,
  /// Minutes.
  pub prep_time:   Option<i64>,
  /// Minutes.
  pub cook_time:   Option<i64>,
  /// Minutes.
  pub total_time:  Option<i64>,
  pub description: String,
  pub nutrients:   Nutrients,
  pub serves:      String,
}

// ─── NewRecipe ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecipeStore::replace_all`].
/// `id` is always assigned by the store; it is not accepted from callers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRecipe {
  pub title:       String,
  pub cuisine:     String,
  pub rating:      Option<f64>,
  pub prep_time:   Option<i64>,
  pub cook_time:   Option<i64>,
  pub total_time:  Option<i64>,
  pub description: String,
  pub nutrients:   Nutrients,
  pub serves:      String,
}

impl NewRecipe {
  /// Convert one entry of a bulk dataset.
  ///
  /// Missing keys and JSON `null` take the defaults (`""`, `None`, `{}`).
  /// A field that is present with the wrong type fails the whole entry.
  pub fn from_json(value: &Value) -> Result<Self> {
    let obj = value.as_object().ok_or(Error::NotAnObject)?;

    Ok(Self {
      title:       text(obj, "title")?,
      cuisine:     text(obj, "cuisine")?,
      rating:      number(obj, "rating")?,
      prep_time:   minutes(obj, "prep_time")?,
      cook_time:   minutes(obj, "cook_time")?,
      total_time:  minutes(obj, "total_time")?,
      description: text(obj, "description")?,
      nutrients:   nutrients(obj, "nutrients")?,
      serves:      text(obj, "serves")?,
    })
  }

  /// Attach a store-assigned id.
  pub fn with_id(self, id: i64) -> Recipe {
    Recipe {
      id,
      title: self.title,
      cuisine: self.cuisine,
      rating: self.rating,
      prep_time: self.prep_time,
      cook_time: self.cook_time,
      total_time: self.total_time,
      description: self.description,
      nutrients: self.nutrients,
      serves: self.serves,
    }
  }
}

// ─── Field readers ───────────────────────────────────────────────────────────

fn type_error(field: &'static str, found: &Value) -> Error {
  Error::FieldType { field, found: found.to_string() }
}

fn text(obj: &Map<String, Value>, field: &'static str) -> Result<String> {
  match obj.get(field) {
    None | Some(Value::Null) => Ok(String::new()),
    Some(Value::String(s)) => Ok(s.clone()),
    Some(other) => Err(type_error(field, other)),
  }
}

fn number(obj: &Map<String, Value>, field: &'static str) -> Result<Option<f64>> {
  match obj.get(field) {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => Ok(n.as_f64()),
    Some(other) => Err(type_error(field, other)),
  }
}

/// Accepts integers and integral floats (`30.0`), which dataset exports
/// produce for integer columns that contain gaps.
fn minutes(obj: &Map<String, Value>, field: &'static str) -> Result<Option<i64>> {
  match obj.get(field) {
    None | Some(Value::Null) => Ok(None),
    Some(Value::Number(n)) => {
      if let Some(i) = n.as_i64() {
        return Ok(Some(i));
      }
      match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
          Ok(Some(f as i64))
        }
        _ => Err(Error::FieldType { field, found: n.to_string() }),
      }
    }
    Some(other) => Err(type_error(field, other)),
  }
}

fn nutrients(obj: &Map<String, Value>, field: &'static str) -> Result<Nutrients> {
  match obj.get(field) {
    None | Some(Value::Null) => Ok(Nutrients::new()),
    Some(Value::Object(map)) => Ok(map.clone()),
    Some(other) => Err(type_error(field, other)),
  }
}
