//! Common test utilities and fixtures.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

use std::path::{Path, PathBuf};

use acc_server::{Server, config};
use acc_service::DirectoryHandle;
use tempfile::TempDir;

/// Test environment owning a data directory and a running server.
pub struct TestEnv {
    dir: TempDir,
    server: Server,
}

impl TestEnv {
    /// Creates a server over an empty data directory.
    ///
    /// ## Errors
    ///
    /// Returns an error if the directory or the server cannot be created.
    pub async fn new() -> anyhow::Result<Self> {
        // Initialize tracing for tests
        let _ = tracing_subscriber::fmt()
            .with_env_filter("acc_service=debug,acc_storage_fs=debug,acc_search=info")
            .with_test_writer()
            .try_init();

        let dir = tempfile::tempdir()?;
        let server = start(dir.path()).await?;
        Ok(Self { dir, server })
    }

    /// Replaces the server with a fresh one over the same data directory.
    ///
    /// The new server starts with an empty index and rebuilds it from disk.
    ///
    /// ## Errors
    ///
    /// Returns an error if the server cannot be created.
    pub async fn restart(&mut self) -> anyhow::Result<()> {
        self.server = start(self.dir.path()).await?;
        Ok(())
    }

    /// The directory handle of the running server.
    #[must_use]
    pub fn handle(&self) -> &DirectoryHandle {
        self.server.handle()
    }

    /// Root of the data directory.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of the stored document of an account.
    #[must_use]
    pub fn account_file(&self, id: &str) -> PathBuf {
        self.dir.path().join("accounts").join(id)
    }

    /// Path of the stored document of a group.
    #[must_use]
    pub fn group_file(&self, id: &str) -> PathBuf {
        self.dir.path().join("groups").join(id)
    }
}

async fn start(data_path: &Path) -> anyhow::Result<Server> {
    let server = Server::new(config::for_testing(data_path)).await?;
    server.start().await?;
    Ok(server)
}
