//! SQL schema for the Pantry SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Rows are only ever written by a full replace (DELETE all, then INSERT).
-- Without AUTOINCREMENT, ids restart at 1 after each replace.
CREATE TABLE IF NOT EXISTS recipes (
    id          INTEGER PRIMARY KEY,
    cuisine     TEXT,
    title       TEXT,
    rating      REAL,
    prep_time   INTEGER,            -- minutes
    cook_time   INTEGER,            -- minutes
    total_time  INTEGER,            -- minutes
    description TEXT,
    nutrients   TEXT,               -- JSON object, e.g. {\"calories\":\"389 kcal\"}
    serves      TEXT
);

PRAGMA user_version = 1;
";

/// Name of the SQL scalar function that reads a number out of the
/// `nutrients` JSON blob. Registered per connection by the store.
pub const NUTRIENT_VALUE_FN: &str = "nutrient_value";
