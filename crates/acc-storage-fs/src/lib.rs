//! # acc-storage-fs
//!
//! File-per-entity storage implementation for the accounts directory.
//!
//! Layout under the configured root:
//!
//! ```text
//! <root>/accounts/<id>   one JSON document per account
//! <root>/groups/<id>     one JSON document per group
//! ```
//!
//! Each collection has its own lock, held for the duration of every file
//! operation on it. Nothing is held across collections, so an account save
//! and a group save never wait on each other.

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

mod account;
mod collection;
mod error;
mod group;

use std::path::{Path, PathBuf};

use acc_model::EntityKind;
use acc_storage::StorageResult;

use crate::collection::Collection;

/// Directory store backed by the local filesystem.
#[derive(Debug)]
pub struct FsDirectory {
    root: PathBuf,
    accounts: Collection,
    groups: Collection,
}

impl FsDirectory {
    /// Opens the store at `root`, creating the collection directories.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Io` if a directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        let accounts = Collection::open(&root, EntityKind::Account)?;
        let groups = Collection::open(&root, EntityKind::Group)?;

        tracing::info!(root = %root.display(), "Opened directory store");

        Ok(Self {
            root,
            accounts,
            groups,
        })
    }

    /// Root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the account documents.
    #[must_use]
    pub fn accounts_dir(&self) -> &Path {
        self.accounts.dir()
    }

    /// Directory holding the group documents.
    #[must_use]
    pub fn groups_dir(&self) -> &Path {
        self.groups.dir()
    }
}
