//! # acc-server
//!
//! Process wiring for the accounts directory.
//!
//! The server opens the file store under the configured data path, creates
//! the in-memory search index, rebuilds it from the store and hands out a
//! [`DirectoryHandle`] to the transports mounted on top. When a policy
//! service is attached, the directory's permissions are registered with it
//! in the background.
//!
//! ## Usage
//!
//! ```ignore
//! use acc_server::{Server, config};
//!
//! let config = config::from_env()?;
//! let server = Server::new(config).await?;
//! server.run().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod config;

use std::sync::Arc;

use acc_core::Config;
use acc_search::SearchIndex;
use acc_service::{Directory, DirectoryHandle, PolicyService, register_permissions};
use acc_storage_fs::FsDirectory;
use anyhow::Context;
use tokio::task::JoinHandle;

/// The accounts directory server.
pub struct Server {
    config: Config,
    handle: DirectoryHandle,
    policy: Option<Arc<dyn PolicyService>>,
}

impl Server {
    /// Creates a new server instance.
    ///
    /// This validates the configuration, opens the store and creates an
    /// empty search index.
    ///
    /// ## Errors
    ///
    /// Returns an error if the configuration is invalid or the store or
    /// index cannot be opened.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Arc::new(
            FsDirectory::open(&config.storage.data_path).with_context(|| {
                format!(
                    "failed to open store at {}",
                    config.storage.data_path.display()
                )
            })?,
        );
        let index = Arc::new(
            SearchIndex::open(config.index.writer_memory_bytes)
                .context("failed to create search index")?,
        );
        let directory = Directory::new(store.clone(), store, index);

        tracing::info!(name = %config.server.name, "Directory initialized");

        Ok(Self {
            config,
            handle: DirectoryHandle::new(directory),
            policy: None,
        })
    }

    /// Attaches the policy service the permissions are registered with.
    #[must_use]
    pub fn with_policy_service(mut self, policy: Arc<dyn PolicyService>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Prepares the directory for traffic.
    ///
    /// Rebuilds the index when configured to and starts permission
    /// registration. The returned task finishes once registration is done;
    /// it is `None` without a policy service.
    ///
    /// ## Errors
    ///
    /// Returns an error if the reindex fails.
    pub async fn start(&self) -> anyhow::Result<Option<JoinHandle<usize>>> {
        if self.config.index.reindex_on_startup {
            let report = self
                .handle
                .reindex()
                .await
                .context("failed to rebuild search index")?;
            tracing::info!(
                accounts = report.accounts.indexed,
                groups = report.groups.indexed,
                "Search index ready"
            );
        } else {
            tracing::warn!("Skipping startup reindex, listings only see entities written from now on");
        }

        Ok(self.policy.clone().map(|policy| {
            tokio::spawn(async move { register_permissions(policy.as_ref()).await })
        }))
    }

    /// Runs the server.
    ///
    /// This prepares the directory and blocks until it receives a shutdown
    /// signal.
    ///
    /// ## Errors
    ///
    /// Returns an error if startup fails.
    pub async fn run(self) -> anyhow::Result<()> {
        let registration = self.start().await?;

        tracing::info!(
            name = %self.config.server.name,
            data_path = %self.config.storage.data_path.display(),
            "Accounts directory running"
        );

        shutdown_signal().await;

        if let Some(task) = registration {
            task.abort();
        }
        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Returns the directory handle.
    #[must_use]
    pub const fn handle(&self) -> &DirectoryHandle {
        &self.handle
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("handle", &self.handle)
            .field("policy", &self.policy.is_some())
            .finish()
    }
}

/// Waits for a shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
