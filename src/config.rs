//! Order store configuration

use std::path::{Path, PathBuf};

pub const DEFAULT_PATH: &str = "orders.db";
pub const DEFAULT_TREE: &str = "all_orders";
pub const DEFAULT_CACHE_BYTES: u64 = 64 * 1024 * 1024;
pub const DEFAULT_FLUSH_MS: u64 = 500;

/// Where and how the order store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Directory of the sled database (env: ORDERS_DB_PATH)
    pub path: PathBuf,
    /// Tree holding the order records (env: ORDERS_DB_TREE)
    pub tree: String,
    /// Page cache size in bytes (env: ORDERS_DB_CACHE_BYTES)
    pub cache_capacity: u64,
    /// Background flush interval, None disables it (env: ORDERS_DB_FLUSH_MS, 0 = off)
    pub flush_every_ms: Option<u64>,
    /// Remove the database when it is dropped (env: ORDERS_DB_TEMPORARY)
    pub temporary: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PATH),
            tree: DEFAULT_TREE.to_string(),
            cache_capacity: DEFAULT_CACHE_BYTES,
            flush_every_ms: Some(DEFAULT_FLUSH_MS),
            temporary: false,
        }
    }
}

impl StoreConfig {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            path: lookup("ORDERS_DB_PATH")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.path),
            tree: lookup("ORDERS_DB_TREE")
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.tree),
            cache_capacity: lookup("ORDERS_DB_CACHE_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_capacity),
            flush_every_ms: match lookup("ORDERS_DB_FLUSH_MS").and_then(|v| v.parse::<u64>().ok()) {
                Some(0) => None,
                Some(ms) => Some(ms),
                None => defaults.flush_every_ms,
            },
            temporary: lookup("ORDERS_DB_TEMPORARY")
                .and_then(|v| parse_flag(&v))
                .unwrap_or(defaults.temporary),
        }
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_tree(mut self, tree: impl Into<String>) -> Self {
        self.tree = tree.into();
        self
    }

    pub fn temporary(mut self, temporary: bool) -> Self {
        self.temporary = temporary;
        self
    }

    pub(crate) fn sled_config(&self) -> sled::Config {
        sled::Config::new()
            .path(&self.path)
            .cache_capacity(self.cache_capacity)
            .flush_every_ms(self.flush_every_ms)
            .temporary(self.temporary)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
