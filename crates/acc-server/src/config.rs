//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.
//! A `.env` file in the working directory is read first when present.
//!
//! | Variable | Setting |
//! |----------|---------|
//! | `ACCOUNTS_NAME` | `server.name` |
//! | `ACCOUNTS_DATA_PATH` | `storage.data_path` |
//! | `ACCOUNTS_INDEX_WRITER_MEMORY` | `index.writer_memory_bytes` |
//! | `ACCOUNTS_REINDEX_ON_STARTUP` | `index.reindex_on_startup` |
//! | `ACCOUNTS_LOG_LEVEL` | `log.level` |
//! | `ACCOUNTS_LOG_PRETTY` | `log.pretty` |
//! | `ACCOUNTS_LOG_COLOR` | `log.color` |

use std::path::Path;

use acc_core::Config;
use anyhow::Context;

/// Loads configuration from the process environment.
///
/// ## Errors
///
/// Returns an error if a variable cannot be parsed or the resulting
/// configuration is invalid.
pub fn from_env() -> anyhow::Result<Config> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    from_lookup(|key| std::env::var(key).ok())
}

/// Builds a configuration from a variable lookup, starting from defaults.
///
/// ## Errors
///
/// Same as [`from_env`].
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
    let mut config = Config::default();

    if let Some(name) = lookup("ACCOUNTS_NAME") {
        config.server.name = name;
    }
    if let Some(path) = lookup("ACCOUNTS_DATA_PATH") {
        config.storage.data_path = path.into();
    }
    if let Some(bytes) = lookup("ACCOUNTS_INDEX_WRITER_MEMORY") {
        config.index.writer_memory_bytes = bytes
            .trim()
            .parse()
            .with_context(|| format!("ACCOUNTS_INDEX_WRITER_MEMORY is not a byte count: {bytes}"))?;
    }
    if let Some(flag) = lookup("ACCOUNTS_REINDEX_ON_STARTUP") {
        config.index.reindex_on_startup = parse_flag(&flag);
    }
    if let Some(level) = lookup("ACCOUNTS_LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(flag) = lookup("ACCOUNTS_LOG_PRETTY") {
        config.log.pretty = parse_flag(&flag);
    }
    if let Some(flag) = lookup("ACCOUNTS_LOG_COLOR") {
        config.log.color = parse_flag(&flag);
    }

    config.validate()?;
    Ok(config)
}

/// Creates a configuration for testing.
#[must_use]
pub fn for_testing(data_path: &Path) -> Config {
    let mut config = Config::with_data_path(data_path);
    config.server.name = "accounts-test".to_string();
    config.index.writer_memory_bytes = acc_core::config::MIN_INDEX_WRITER_MEMORY;
    config.log.level = "debug".to_string();
    config.log.pretty = false;
    config.log.color = false;
    config
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    !(value.eq_ignore_ascii_case("false") || value == "0" || value.is_empty())
}
