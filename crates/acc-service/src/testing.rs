//! Test fixtures.

use std::sync::Arc;

use acc_core::config::MIN_INDEX_WRITER_MEMORY;
use acc_model::{Account, EntityKind, Group};
use acc_search::SearchIndex;
use acc_storage::{AccountStore, GroupStore, SafeId, StorageError, StorageResult};
use acc_storage_fs::FsDirectory;
use tempfile::TempDir;

use crate::directory::Directory;
use crate::dto::{CreateAccountRequest, CreateGroupRequest};
use crate::password::PasswordPolicy;

pub(crate) fn directory() -> (TempDir, Directory) {
    let (dir, directory, _store) = directory_with_store();
    (dir, directory)
}

pub(crate) fn directory_with_store() -> (TempDir, Directory, Arc<FsDirectory>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(FsDirectory::open(dir.path()).unwrap());
    let index = Arc::new(SearchIndex::open(MIN_INDEX_WRITER_MEMORY).unwrap());
    let directory = Directory::new(store.clone(), store.clone(), index)
        .with_password_policy(PasswordPolicy::for_testing());
    (dir, directory, store)
}

/// A directory whose stores fail every call with an I/O error.
pub(crate) fn offline_directory() -> Directory {
    let store = Arc::new(OfflineStore);
    let index = Arc::new(SearchIndex::open(MIN_INDEX_WRITER_MEMORY).unwrap());
    Directory::new(store.clone(), store, index)
        .with_password_policy(PasswordPolicy::for_testing())
}

struct OfflineStore;

fn offline(kind: EntityKind, id: &SafeId) -> StorageError {
    StorageError::Io {
        kind,
        id: id.as_str().to_string(),
        source: std::io::Error::other("store offline"),
    }
}

impl AccountStore for OfflineStore {
    fn load(&self, id: &SafeId) -> StorageResult<Account> {
        Err(offline(EntityKind::Account, id))
    }

    fn save(&self, account: &Account) -> StorageResult<()> {
        Err(offline(EntityKind::Account, &SafeId::parse(&account.id)?))
    }

    fn delete(&self, id: &SafeId) -> StorageResult<()> {
        Err(offline(EntityKind::Account, id))
    }

    fn exists(&self, id: &SafeId) -> StorageResult<bool> {
        Err(offline(EntityKind::Account, id))
    }

    fn list_ids(&self) -> StorageResult<Vec<SafeId>> {
        Ok(Vec::new())
    }
}

impl GroupStore for OfflineStore {
    fn load(&self, id: &SafeId) -> StorageResult<Group> {
        Err(offline(EntityKind::Group, id))
    }

    fn save(&self, group: &Group) -> StorageResult<()> {
        Err(offline(EntityKind::Group, &SafeId::parse(&group.id)?))
    }

    fn delete(&self, id: &SafeId) -> StorageResult<()> {
        Err(offline(EntityKind::Group, id))
    }

    fn exists(&self, id: &SafeId) -> StorageResult<bool> {
        Err(offline(EntityKind::Group, id))
    }

    fn list_ids(&self) -> StorageResult<Vec<SafeId>> {
        Ok(Vec::new())
    }
}

fn capitalized(id: &str) -> String {
    let mut chars = id.chars();
    chars
        .next()
        .map(|first| first.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

impl Directory {
    pub(crate) fn seed_account(&self, id: &str) -> Account {
        self.create_account(CreateAccountRequest {
            account: Some(
                Account::new(id)
                    .with_display_name(capitalized(id))
                    .with_login(id),
            ),
        })
        .unwrap()
    }

    pub(crate) fn seed_group(&self, id: &str) -> Group {
        self.create_group(CreateGroupRequest {
            group: Some(Group::new(id).with_display_name(capitalized(id))),
        })
        .unwrap()
    }

    pub(crate) fn stored_account(&self, id: &str) -> Account {
        self.accounts.load(&SafeId::parse(id).unwrap()).unwrap()
    }

    pub(crate) fn stored_group(&self, id: &str) -> Group {
        self.groups.load(&SafeId::parse(id).unwrap()).unwrap()
    }
}
