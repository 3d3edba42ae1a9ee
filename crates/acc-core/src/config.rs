//! Configuration for the accounts directory.
//!
//! The structures here are plain data with defaults. Loading them from the
//! environment is the job of the binary that owns the process.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Smallest writer heap tantivy accepts for a single indexing thread.
pub const MIN_INDEX_WRITER_MEMORY: usize = 15_000_000;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Service identity.
    pub server: ServerConfig,
    /// Directory store configuration.
    pub storage: StorageConfig,
    /// Search index configuration.
    pub index: IndexConfig,
    /// Logging configuration.
    pub log: LogConfig,
}

/// Service identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Service name, used as the logging target prefix.
    pub name: String,
}

/// Directory store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory holding `accounts/` and `groups/`.
    pub data_path: PathBuf,
}

/// Search index configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Heap handed to the index writer, in bytes.
    pub writer_memory_bytes: usize,
    /// Rebuild the index from the store when the service starts.
    pub reindex_on_startup: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Default level filter when `RUST_LOG` is not set.
    pub level: String,
    /// Multi-line human readable output.
    pub pretty: bool,
    /// ANSI colors.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "accounts".to_string(),
            },
            storage: StorageConfig {
                data_path: PathBuf::from("/var/tmp/accounts"),
            },
            index: IndexConfig {
                writer_memory_bytes: 20_000_000,
                reindex_on_startup: true,
            },
            log: LogConfig {
                level: "info".to_string(),
                pretty: true,
                color: true,
            },
        }
    }
}

impl Config {
    /// Creates a configuration rooted at `data_path` with defaults elsewhere.
    #[must_use]
    pub fn with_data_path(data_path: impl Into<PathBuf>) -> Self {
        let mut config = Self::default();
        config.storage.data_path = data_path.into();
        config
    }

    /// Checks values that would otherwise fail deep inside a component.
    ///
    /// ## Errors
    ///
    /// Returns `Error::Config` naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        if self.server.name.trim().is_empty() {
            return Err(Error::Config("server name must not be empty".to_string()));
        }
        if self.storage.data_path.as_os_str().is_empty() {
            return Err(Error::Config("data path must not be empty".to_string()));
        }
        if self.index.writer_memory_bytes < MIN_INDEX_WRITER_MEMORY {
            return Err(Error::Config(format!(
                "index writer memory must be at least {MIN_INDEX_WRITER_MEMORY} bytes, got {}",
                self.index.writer_memory_bytes
            )));
        }
        Ok(())
    }
}
