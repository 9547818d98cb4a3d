// SQRL Store - Configuration
//
// Where the identity database lives and how long operations may block.
// Deserializable so a host application can embed it in its own config file;
// `from_env()` overlays SQRL_STORE_* environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const ENV_DB_PATH: &str = "SQRL_STORE_DB";
pub const ENV_BUSY_TIMEOUT_MS: &str = "SQRL_STORE_BUSY_TIMEOUT_MS";
pub const ENV_OP_TIMEOUT_MS: &str = "SQRL_STORE_OP_TIMEOUT_MS";

const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} is not a number of milliseconds")]
    InvalidValue { name: &'static str, value: String },
}

/// Default directory for identity store data files.
fn data_dir() -> PathBuf {
    let base = dirs_next::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("sqrl-store")
}

fn default_database_path() -> PathBuf {
    data_dir().join("identities.db")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// How long SQLite waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Timeout applied by `IdentityStore::default_context`. Unset means no
    /// deadline.
    pub operation_timeout_ms: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            operation_timeout_ms: None,
        }
    }
}

impl StoreConfig {
    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    /// Defaults overlaid with any SQRL_STORE_* environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().overlay(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(ENV_DB_PATH).filter(|p| !p.is_empty()) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_BUSY_TIMEOUT_MS) {
            self.busy_timeout_ms = parse_millis(ENV_BUSY_TIMEOUT_MS, value)?;
        }
        if let Some(value) = lookup(ENV_OP_TIMEOUT_MS) {
            self.operation_timeout_ms = Some(parse_millis(ENV_OP_TIMEOUT_MS, value)?);
        }
        Ok(self)
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn operation_timeout(&self) -> Option<Duration> {
        self.operation_timeout_ms.map(Duration::from_millis)
    }
}

fn parse_millis(name: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { name, value })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(config.database_path.ends_with("sqrl-store/identities.db"));
        assert_eq!(config.busy_timeout(), Duration::from_secs(5));
        assert_eq!(config.operation_timeout(), None);
    }

    #[test]
    fn test_overlay_applies_values() {
        let config = StoreConfig::default()
            .overlay(lookup_from(&[
                (ENV_DB_PATH, "/var/lib/sqrl/ids.db"),
                (ENV_BUSY_TIMEOUT_MS, "250"),
                (ENV_OP_TIMEOUT_MS, " 1500 "),
            ]))
            .unwrap();

        assert_eq!(config.database_path, PathBuf::from("/var/lib/sqrl/ids.db"));
        assert_eq!(config.busy_timeout_ms, 250);
        assert_eq!(config.operation_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_overlay_rejects_malformed_numbers() {
        let err = StoreConfig::default()
            .overlay(lookup_from(&[(ENV_OP_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                name: ENV_OP_TIMEOUT_MS,
                value: "soon".to_string()
            }
        );
    }

    #[test]
    fn test_empty_path_override_ignored() {
        let config = StoreConfig::default()
            .overlay(lookup_from(&[(ENV_DB_PATH, "")]))
            .unwrap();
        assert_eq!(config.database_path, default_database_path());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: StoreConfig =
            serde_json::from_str(r#"{ "database_path": "ids.db", "operation_timeout_ms": 100 }"#)
                .unwrap();
        assert_eq!(config.database_path, PathBuf::from("ids.db"));
        assert_eq!(config.busy_timeout_ms, DEFAULT_BUSY_TIMEOUT_MS);
        assert_eq!(config.operation_timeout_ms, Some(100));
    }
}
