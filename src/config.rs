use std::env;
use std::path::PathBuf;

use crate::engine::mirror::DEFAULT_NAMESPACE;

/// Environment variable naming the data directory.
pub const DATA_DIR_VAR: &str = "SHOPFRONT_DATA_DIR";
/// Environment variable naming the storage namespace.
pub const NAMESPACE_VAR: &str = "SHOPFRONT_NAMESPACE";
/// Environment variable carrying the hex-encoded 32-byte vault key.
pub const VAULT_KEY_VAR: &str = "SHOPFRONT_VAULT_KEY";

/// Where and how the store keeps its durable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub namespace: String,
    /// When set, values are encrypted at rest with this key.
    pub vault_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            namespace: DEFAULT_NAMESPACE.to_string(),
            vault_key: None,
        }
    }
}

impl Config {
    /// Builds a config from `SHOPFRONT_*` variables, defaulting anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            data_dir: non_empty(DATA_DIR_VAR).map(PathBuf::from).unwrap_or(defaults.data_dir),
            namespace: non_empty(NAMESPACE_VAR).unwrap_or(defaults.namespace),
            vault_key: non_empty(VAULT_KEY_VAR),
        }
    }
}
