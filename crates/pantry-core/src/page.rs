//! Offset pagination.

use std::collections::HashMap;

/// Default page size for the plain listing.
pub const DEFAULT_LIST_LIMIT: u32 = 10;

/// Default page size for filtered search.
pub const DEFAULT_SEARCH_LIMIT: u32 = 15;

/// A 1-based page number and a page size, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
  pub page:  u32,
  pub limit: u32,
}

impl PageRequest {
  /// Build a request, replacing zero values with `page = 1` and
  /// `default_limit`.
  pub fn new(page: u32, limit: u32, default_limit: u32) -> Self {
    Self {
      page:  if page == 0 { 1 } else { page },
      limit: if limit == 0 { default_limit.max(1) } else { limit },
    }
  }

  /// Read `page` and `limit` from raw query parameters. Absent, unparsable
  /// or non-positive values fall back to the defaults.
  pub fn from_params(params: &HashMap<String, String>, default_limit: u32) -> Self {
    let read = |name: &str| {
      params
        .get(name)
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|&n| n > 0)
        .map(|n| u32::try_from(n).unwrap_or(u32::MAX))
        .unwrap_or(0)
    };
    Self::new(read("page"), read("limit"), default_limit)
  }

  /// Number of rows to skip.
  pub fn offset(&self) -> u64 { (u64::from(self.page) - 1) * u64::from(self.limit) }
}

/// One window of a result set plus the size of the whole set.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
  pub items: Vec<T>,
  /// Count of all matching rows, independent of the window.
  pub total: u64,
}
