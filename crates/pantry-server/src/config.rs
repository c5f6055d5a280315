//! Runtime server configuration.
//!
//! Read from an optional TOML file, then overridden by `PANTRY_*`
//! environment variables (e.g. `PANTRY_PORT=8080`).

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  /// SQLite database file; created if missing.
  #[serde(default = "default_database_path")]
  pub database_path:   PathBuf,
  /// JSON dataset used by `load` and by the startup load.
  #[serde(default = "default_data_path")]
  pub data_path:       PathBuf,
  /// Load `data_path` at startup when the store is empty.
  #[serde(default = "default_load_on_startup")]
  pub load_on_startup: bool,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 5000 }
fn default_database_path() -> PathBuf { PathBuf::from("recipes.db") }
fn default_data_path() -> PathBuf { PathBuf::from("data.json") }
fn default_load_on_startup() -> bool { true }

impl ServerConfig {
  /// Layer `path` (if it exists) and the environment into a config, then
  /// expand a leading `~` in the path settings.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PANTRY"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: ServerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;

    cfg.database_path = expand_tilde(&cfg.database_path);
    cfg.data_path = expand_tilde(&cfg.data_path);
    Ok(cfg)
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use std::io::Write as _;

  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = ServerConfig::load(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.port, 5000);
    assert_eq!(cfg.database_path, PathBuf::from("recipes.db"));
    assert_eq!(cfg.data_path, PathBuf::from("data.json"));
    assert!(cfg.load_on_startup);
  }

  #[test]
  fn file_values_override_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
      file,
      "host = \"0.0.0.0\"\nport = 8080\ndatabase_path = \"/var/lib/pantry/recipes.db\"\nload_on_startup = false"
    )
    .unwrap();

    let cfg = ServerConfig::load(file.path()).unwrap();
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.database_path, PathBuf::from("/var/lib/pantry/recipes.db"));
    assert_eq!(cfg.data_path, PathBuf::from("data.json"));
    assert!(!cfg.load_on_startup);
  }

  #[test]
  fn tilde_is_expanded() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(
      expand_tilde(Path::new("~/pantry/recipes.db")),
      PathBuf::from(home).join("pantry/recipes.db")
    );
    assert_eq!(expand_tilde(Path::new("/abs/x.db")), PathBuf::from("/abs/x.db"));
  }
}
