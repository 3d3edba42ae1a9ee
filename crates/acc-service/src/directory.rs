//! The directory: stores, index and the operations spanning them.
//!
//! [`Directory`] is synchronous. Every operation blocks on store locks and
//! file I/O, so async callers go through [`crate::DirectoryHandle`].
//!
//! The operations are split across modules by concern:
//!
//! - `accounts` / `groups` - create, get, update, delete
//! - `relations` - membership edges, expansion, cascade
//! - `listing` - filtered list queries

use std::sync::Arc;

use acc_model::EntityKind;
use acc_search::SearchIndex;
use acc_storage::{AccountStore, GroupStore, SafeId, StorageResult};
use parking_lot::Mutex;

use crate::dto::{KindReport, ReindexReport};
use crate::error::ServiceResult;
use crate::password::{PasswordHasherService, PasswordPolicy};

/// Account and group directory.
pub struct Directory {
    pub(crate) accounts: Arc<dyn AccountStore>,
    pub(crate) groups: Arc<dyn GroupStore>,
    pub(crate) index: Arc<SearchIndex>,
    pub(crate) hasher: PasswordHasherService,
    /// Held across every load, modify, save cycle on a stored entity.
    pub(crate) edits: Mutex<()>,
}

impl Directory {
    /// Creates a directory over the given stores and index.
    #[must_use]
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        groups: Arc<dyn GroupStore>,
        index: Arc<SearchIndex>,
    ) -> Self {
        Self {
            accounts,
            groups,
            index,
            hasher: PasswordHasherService::default(),
            edits: Mutex::new(()),
        }
    }

    /// Replaces the password hashing policy.
    #[must_use]
    pub fn with_password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.hasher = PasswordHasherService::new(policy);
        self
    }

    /// The search index.
    #[must_use]
    pub fn index(&self) -> &SearchIndex {
        &self.index
    }

    /// Rebuilds the index from the stores.
    ///
    /// Entities that cannot be loaded or indexed are logged and counted as
    /// skipped; they do not abort the rebuild.
    ///
    /// ## Errors
    ///
    /// Returns an error if the index cannot be cleared or a collection
    /// cannot be enumerated.
    pub fn reindex(&self) -> ServiceResult<ReindexReport> {
        self.index.clear()?;

        let accounts = reindex_kind(
            EntityKind::Account,
            self.accounts.list_ids()?,
            |id| self.accounts.load(id).map_err(Into::into),
            |account| self.index.index_account(account).map_err(Into::into),
        );
        let groups = reindex_kind(
            EntityKind::Group,
            self.groups.list_ids()?,
            |id| self.groups.load(id).map_err(Into::into),
            |group| self.index.index_group(group).map_err(Into::into),
        );

        let report = ReindexReport { accounts, groups };
        tracing::info!(
            accounts = report.accounts.indexed,
            groups = report.groups.indexed,
            skipped = report.accounts.skipped + report.groups.skipped,
            "Rebuilt search index"
        );
        Ok(report)
    }
}

fn reindex_kind<T>(
    kind: EntityKind,
    ids: Vec<SafeId>,
    load: impl Fn(&SafeId) -> ServiceResult<T>,
    index: impl Fn(&T) -> ServiceResult<()>,
) -> KindReport {
    let mut report = KindReport::default();
    for id in ids {
        match load(&id).and_then(|entity| index(&entity)) {
            Ok(()) => report.indexed += 1,
            Err(err) => {
                tracing::warn!(%kind, %id, error = %err, "Skipping entity during reindex");
                report.skipped += 1;
            }
        }
    }
    report
}

/// Loads every id that can be loaded, in order. Unusable ids and load
/// failures are logged and skipped.
pub(crate) fn hydrate<T>(
    kind: EntityKind,
    ids: impl IntoIterator<Item = String>,
    load: impl Fn(&SafeId) -> StorageResult<T>,
) -> Vec<T> {
    ids.into_iter()
        .filter_map(|raw| match SafeId::parse(&raw).and_then(|id| load(&id)) {
            Ok(entity) => Some(entity),
            Err(err) => {
                tracing::warn!(%kind, id = %raw, error = %err, "Skipping unloadable entity");
                None
            }
        })
        .collect()
}

impl std::fmt::Debug for Directory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directory")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
