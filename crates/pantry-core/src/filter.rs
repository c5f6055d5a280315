//! The filter compiler: turns flat query parameters into a [`SearchFilter`].
//!
//! Every supported parameter is optional and independent. A parameter whose
//! value cannot be understood is dropped rather than reported, so a search
//! never fails because of its input. The resulting filters are combined with
//! logical AND.
//!
//! | Parameter    | Kind    | Target                     |
//! |--------------|---------|----------------------------|
//! | `total_time` | numeric | `total_time` column        |
//! | `rating`     | numeric | `rating` column            |
//! | `calories`   | numeric | `nutrients["calories"]`    |
//! | `title`      | text    | case-insensitive substring |
//! | `cuisine`    | text    | case-insensitive substring |

use std::{borrow::Cow, collections::HashMap};

use tracing::debug;

use crate::recipe::{Nutrients, Recipe};

// ─── Operators ───────────────────────────────────────────────────────────────

/// Comparison applied by a numeric filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
  Le,
  Ge,
  Lt,
  Gt,
  Eq,
}

impl CompareOp {
  /// Tokens in detection order. Two-character tokens come first so that
  /// `<=` is never read as `<`.
  const DETECTION_ORDER: [(&'static str, CompareOp); 4] = [
    ("<=", CompareOp::Le),
    (">=", CompareOp::Ge),
    ("<", CompareOp::Lt),
    (">", CompareOp::Gt),
  ];

  /// The SQL spelling of the operator.
  pub fn as_sql(self) -> &'static str {
    match self {
      Self::Le => "<=",
      Self::Ge => ">=",
      Self::Lt => "<",
      Self::Gt => ">",
      Self::Eq => "=",
    }
  }

  pub fn apply(self, lhs: f64, rhs: f64) -> bool {
    match self {
      Self::Le => lhs <= rhs,
      Self::Ge => lhs >= rhs,
      Self::Lt => lhs < rhs,
      Self::Gt => lhs > rhs,
      Self::Eq => lhs == rhs,
    }
  }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// A field that accepts an optional comparison operator and a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
  TotalTime,
  Rating,
  /// Read from `nutrients["calories"]` rather than a column.
  Calories,
}

impl NumericField {
  pub const ALL: [NumericField; 3] =
    [NumericField::TotalTime, NumericField::Rating, NumericField::Calories];

  /// Query parameter name.
  pub fn param(self) -> &'static str {
    match self {
      Self::TotalTime => "total_time",
      Self::Rating => "rating",
      Self::Calories => "calories",
    }
  }

  pub fn value_of(self, recipe: &Recipe) -> Option<f64> {
    match self {
      Self::TotalTime => recipe.total_time.map(|t| t as f64),
      Self::Rating => recipe.rating,
      Self::Calories => extract_numeric(&recipe.nutrients, "calories"),
    }
  }
}

/// A free-text field matched by case-insensitive substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
  Title,
  Cuisine,
}

impl TextField {
  pub const ALL: [TextField; 2] = [TextField::Title, TextField::Cuisine];

  /// Query parameter name, which is also the column name.
  pub fn param(self) -> &'static str {
    match self {
      Self::Title => "title",
      Self::Cuisine => "cuisine",
    }
  }

  pub fn value_of(self, recipe: &Recipe) -> &str {
    match self {
      Self::Title => &recipe.title,
      Self::Cuisine => &recipe.cuisine,
    }
  }
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// One predicate over a single field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
  Numeric {
    field: NumericField,
    op:    CompareOp,
    value: f64,
  },
  Text {
    field:  TextField,
    needle: String,
  },
}

impl FieldFilter {
  /// Evaluate against a recipe. An absent numeric value never matches.
  pub fn matches(&self, recipe: &Recipe) -> bool {
    match self {
      Self::Numeric { field, op, value } => field
        .value_of(recipe)
        .is_some_and(|v| op.apply(v, *value)),
      Self::Text { field, needle } => field
        .value_of(recipe)
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase()),
    }
  }
}

/// The conjunction of every filter successfully built from a request.
/// An empty filter matches every recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilter {
  filters: Vec<FieldFilter>,
}

impl SearchFilter {
  pub fn new(filters: Vec<FieldFilter>) -> Self { Self { filters } }

  /// Build a filter from raw query parameters. Unknown names are ignored.
  pub fn from_params(params: &HashMap<String, String>) -> Self {
    let mut filters = Vec::new();

    for field in NumericField::ALL {
      let Some(raw) = params.get(field.param()).filter(|v| !v.is_empty())
      else {
        continue;
      };
      match parse_comparison(raw) {
        Some((op, value)) => {
          debug!(field = field.param(), op = op.as_sql(), value, "numeric filter");
          filters.push(FieldFilter::Numeric { field, op, value });
        }
        None => {
          debug!(field = field.param(), raw = %raw, "ignoring unparsable numeric filter");
        }
      }
    }

    for field in TextField::ALL {
      if let Some(needle) = params.get(field.param()).filter(|v| !v.is_empty())
      {
        debug!(field = field.param(), needle = %needle, "text filter");
        filters.push(FieldFilter::Text { field, needle: needle.clone() });
      }
    }

    Self::new(filters)
  }

  pub fn filters(&self) -> &[FieldFilter] { &self.filters }

  pub fn is_empty(&self) -> bool { self.filters.is_empty() }

  pub fn matches(&self, recipe: &Recipe) -> bool {
    self.filters.iter().all(|f| f.matches(recipe))
  }
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Parse a raw numeric parameter such as `">= 30"` or `"%3C%3D4.5"`.
///
/// The value is form-decoded and trimmed, the first operator found (in the
/// order `<=`, `>=`, `<`, `>`) is removed wherever it occurs, and the rest is
/// read as a float. No operator means equality. Returns `None` when no number
/// remains.
pub fn parse_comparison(raw: &str) -> Option<(CompareOp, f64)> {
  let decoded = form_decode(raw);
  let trimmed = decoded.trim();

  let (op, rest): (CompareOp, Cow<'_, str>) = CompareOp::DETECTION_ORDER
    .iter()
    .find(|(token, _)| trimmed.contains(*token))
    .map(|(token, op)| (*op, Cow::Owned(trimmed.replace(*token, ""))))
    .unwrap_or((CompareOp::Eq, Cow::Borrowed(trimmed)));

  rest.trim().parse::<f64>().ok().map(|value| (op, value))
}

/// `+` becomes a space, then percent escapes are decoded. Invalid UTF-8 is
/// replaced rather than rejected.
fn form_decode(raw: &str) -> String {
  let spaced = raw.replace('+', " ");
  let bytes = urlencoding::decode_binary(spaced.as_bytes());
  String::from_utf8_lossy(&bytes).into_owned()
}

// ─── Nested numeric access ───────────────────────────────────────────────────

/// Read `key` from a nutrient blob as a number.
///
/// JSON numbers are returned as-is. Strings yield the number they start with,
/// so `"389 kcal"` reads as `389.0`. Anything else (missing key, `null`,
/// `"abc"`, booleans, nested objects) is `None` and never matches a filter.
pub fn extract_numeric(blob: &Nutrients, key: &str) -> Option<f64> {
  match blob.get(key)? {
    serde_json::Value::Number(n) => n.as_f64(),
    serde_json::Value::String(s) => leading_number(s),
    _ => None,
  }
}

/// The longest prefix of `s` (after leading whitespace) that reads as a
/// decimal number with optional sign, fraction and exponent.
fn leading_number(s: &str) -> Option<f64> {
  let s = s.trim_start();
  let bytes = s.as_bytes();
  let digits_from = |mut i: usize| {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
      i += 1;
    }
    i
  };

  let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
  let int_end = digits_from(end);
  let mut mantissa_digits = int_end - end;
  end = int_end;

  if bytes.get(end) == Some(&b'.') {
    let frac_end = digits_from(end + 1);
    mantissa_digits += frac_end - end - 1;
    if mantissa_digits > 0 {
      end = frac_end;
    }
  }
  if mantissa_digits == 0 {
    return None;
  }

  if matches!(bytes.get(end), Some(b'e' | b'E')) {
    let mut exp = end + 1;
    if matches!(bytes.get(exp), Some(b'+' | b'-')) {
      exp += 1;
    }
    let exp_end = digits_from(exp);
    if exp_end > exp {
      end = exp_end;
    }
  }

  s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::recipe::NewRecipe;

  fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect()
  }

  fn recipe(title: &str, total_time: Option<i64>, calories: serde_json::Value) -> Recipe {
    let mut nutrients = Nutrients::new();
    if !calories.is_null() {
      nutrients.insert("calories".into(), calories);
    }
    NewRecipe {
      title: title.into(),
      cuisine: "Italian Recipes".into(),
      rating: Some(4.5),
      total_time,
      nutrients,
      ..NewRecipe::default()
    }
    .with_id(1)
  }

  // ── parse_comparison ────────────────────────────────────────────────────

  #[test]
  fn operators_are_detected() {
    assert_eq!(parse_comparison("<=30"), Some((CompareOp::Le, 30.0)));
    assert_eq!(parse_comparison(">=30"), Some((CompareOp::Ge, 30.0)));
    assert_eq!(parse_comparison("<30"), Some((CompareOp::Lt, 30.0)));
    assert_eq!(parse_comparison(">30"), Some((CompareOp::Gt, 30.0)));
    assert_eq!(parse_comparison("30"), Some((CompareOp::Eq, 30.0)));
  }

  #[test]
  fn two_character_operators_win() {
    // `<=` contains `<`; it must not be parsed as less-than with `=30`.
    assert_eq!(parse_comparison("<=4.5"), Some((CompareOp::Le, 4.5)));
    assert_eq!(parse_comparison(">=4.5"), Some((CompareOp::Ge, 4.5)));
  }

  #[test]
  fn whitespace_and_embedded_operators() {
    assert_eq!(parse_comparison("  >=  30 "), Some((CompareOp::Ge, 30.0)));
    assert_eq!(parse_comparison("30>"), Some((CompareOp::Gt, 30.0)));
    assert_eq!(parse_comparison("+>=+30"), Some((CompareOp::Ge, 30.0)));
  }

  #[test]
  fn encoded_values_are_decoded() {
    assert_eq!(parse_comparison("%3E%3D30"), Some((CompareOp::Ge, 30.0)));
    assert_eq!(parse_comparison("%3C400"), Some((CompareOp::Lt, 400.0)));
  }

  #[test]
  fn unparsable_values_yield_nothing() {
    assert_eq!(parse_comparison("abc"), None);
    assert_eq!(parse_comparison(">=abc"), None);
    assert_eq!(parse_comparison("<="), None);
    assert_eq!(parse_comparison("   "), None);
  }

  // ── from_params ─────────────────────────────────────────────────────────

  #[test]
  fn no_params_is_empty_filter() {
    let f = SearchFilter::from_params(&HashMap::new());
    assert!(f.is_empty());
  }

  #[test]
  fn unparsable_numeric_param_is_dropped() {
    let with_bad = SearchFilter::from_params(&params(&[("rating", "abc"), ("title", "pie")]));
    let without = SearchFilter::from_params(&params(&[("title", "pie")]));
    assert_eq!(with_bad, without);
  }

  #[test]
  fn empty_and_unknown_params_are_ignored() {
    let f = SearchFilter::from_params(&params(&[
      ("title", ""),
      ("cuisine", ""),
      ("servings", "4"),
      ("page", "2"),
    ]));
    assert!(f.is_empty());
  }

  #[test]
  fn all_supported_params_are_compiled() {
    let f = SearchFilter::from_params(&params(&[
      ("total_time", "<60"),
      ("rating", ">=4"),
      ("calories", "<=500"),
      ("title", "soup"),
      ("cuisine", "italian"),
    ]));
    assert_eq!(
      f.filters(),
      &[
        FieldFilter::Numeric { field: NumericField::TotalTime, op: CompareOp::Lt, value: 60.0 },
        FieldFilter::Numeric { field: NumericField::Rating, op: CompareOp::Ge, value: 4.0 },
        FieldFilter::Numeric { field: NumericField::Calories, op: CompareOp::Le, value: 500.0 },
        FieldFilter::Text { field: TextField::Title, needle: "soup".into() },
        FieldFilter::Text { field: TextField::Cuisine, needle: "italian".into() },
      ]
    );
  }

  // ── extract_numeric ─────────────────────────────────────────────────────

  #[test]
  fn extract_numeric_reads_numbers_and_numeric_prefixes() {
    let blob = json!({
      "a": 412,
      "b": 389.5,
      "c": "389 kcal",
      "d": " .5g",
      "e": "1e3",
      "f": "abc",
      "g": null,
      "h": true,
      "i": { "value": 3 },
      "j": "-",
    });
    let blob = blob.as_object().unwrap();

    assert_eq!(extract_numeric(blob, "a"), Some(412.0));
    assert_eq!(extract_numeric(blob, "b"), Some(389.5));
    assert_eq!(extract_numeric(blob, "c"), Some(389.0));
    assert_eq!(extract_numeric(blob, "d"), Some(0.5));
    assert_eq!(extract_numeric(blob, "e"), Some(1000.0));
    assert_eq!(extract_numeric(blob, "f"), None);
    assert_eq!(extract_numeric(blob, "g"), None);
    assert_eq!(extract_numeric(blob, "h"), None);
    assert_eq!(extract_numeric(blob, "i"), None);
    assert_eq!(extract_numeric(blob, "j"), None);
    assert_eq!(extract_numeric(blob, "missing"), None);
  }

  // ── matches ─────────────────────────────────────────────────────────────

  #[test]
  fn calories_filter_excludes_missing_and_non_numeric() {
    let f = SearchFilter::from_params(&params(&[("calories", ">400")]));

    assert!(f.matches(&recipe("a", None, json!("450 kcal"))));
    assert!(!f.matches(&recipe("b", None, json!("350 kcal"))));
    assert!(!f.matches(&recipe("c", None, json!("lots"))));
    assert!(!f.matches(&recipe("d", None, serde_json::Value::Null)));

    let lt = SearchFilter::from_params(&params(&[("calories", "<400")]));
    assert!(!lt.matches(&recipe("c", None, json!("lots"))));
    assert!(!lt.matches(&recipe("d", None, serde_json::Value::Null)));
  }

  #[test]
  fn title_match_is_case_insensitive_substring() {
    let f = SearchFilter::from_params(&params(&[("title", "choco")]));
    assert!(f.matches(&recipe("Chocolate Cake", None, json!(null))));
    assert!(f.matches(&recipe("HOT CHOCOLATE", None, json!(null))));
    assert!(!f.matches(&recipe("Vanilla Cake", None, json!(null))));
  }

  #[test]
  fn absent_total_time_never_matches() {
    let f = SearchFilter::from_params(&params(&[("total_time", "<=30")]));
    assert!(f.matches(&recipe("quick", Some(20), json!(null))));
    assert!(f.matches(&recipe("edge", Some(30), json!(null))));
    assert!(!f.matches(&recipe("slow", Some(45), json!(null))));
    assert!(!f.matches(&recipe("unknown", None, json!(null))));
  }

  #[test]
  fn filters_are_conjunctive() {
    let f = SearchFilter::from_params(&params(&[
      ("title", "soup"),
      ("cuisine", "italian"),
      ("total_time", "<60"),
    ]));
    assert!(f.matches(&recipe("Minestrone Soup", Some(45), json!(null))));
    assert!(!f.matches(&recipe("Minestrone Soup", Some(90), json!(null))));
    assert!(!f.matches(&recipe("Lasagna", Some(45), json!(null))));
  }
}
