//! # Accounts directory
//!
//! Main entry point for the accounts directory service.

#![forbid(unsafe_code)]
#![deny(warnings)]

use acc_core::config::LogConfig;
use acc_server::{Server, config};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::from_env()?;
    init_tracing(&config.log);

    tracing::info!(name = %config.server.name, "Accounts directory starting...");

    Server::new(config).await?.run().await
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let registry = tracing_subscriber::registry().with(filter);

    if log.pretty {
        registry
            .with(fmt::layer().pretty().with_ansi(log.color))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_ansi(log.color))
            .init();
    }
}
