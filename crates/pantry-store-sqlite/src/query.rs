//! Translation of a [`SearchFilter`] into a parameterised `WHERE` clause.
//!
//! Only fixed column names and operators are ever spliced into the SQL text;
//! every user-supplied value travels as a bound parameter.

use pantry_core::filter::{FieldFilter, NumericField, SearchFilter};
use rusqlite::types::Value;

use crate::schema::NUTRIENT_VALUE_FN;

/// A `WHERE ...` fragment (empty when unfiltered) and its positional
/// parameters, in order.
#[derive(Debug, Default)]
pub struct WhereClause {
  pub sql:    String,
  pub params: Vec<Value>,
}

pub fn compile(filter: &SearchFilter) -> WhereClause {
  let mut conds  = Vec::with_capacity(filter.filters().len());
  let mut params = Vec::with_capacity(filter.filters().len());

  for f in filter.filters() {
    match f {
      FieldFilter::Numeric { field, op, value } => {
        conds.push(format!("{} {} ?", numeric_expr(*field), op.as_sql()));
        params.push(Value::Real(*value));
      }
      FieldFilter::Text { field, needle } => {
        conds.push(format!("{} LIKE ? ESCAPE '\\'", field.param()));
        params.push(Value::Text(like_pattern(needle)));
      }
    }
  }

  let sql = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };

  WhereClause { sql, params }
}

fn numeric_expr(field: NumericField) -> String {
  match field {
    NumericField::TotalTime => "total_time".to_owned(),
    NumericField::Rating => "rating".to_owned(),
    NumericField::Calories => format!("{NUTRIENT_VALUE_FN}(nutrients, 'calories')"),
  }
}

/// `%needle%` with `LIKE` metacharacters escaped, so the needle is matched
/// literally.
fn like_pattern(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}
