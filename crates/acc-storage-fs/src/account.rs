//! Filesystem implementation of the account store.

use acc_model::{Account, deflate_all};
use acc_storage::{AccountStore, SafeId, StorageResult};

use crate::FsDirectory;

impl AccountStore for FsDirectory {
    fn load(&self, id: &SafeId) -> StorageResult<Account> {
        self.accounts.load(id)
    }

    fn save(&self, account: &Account) -> StorageResult<()> {
        let id = SafeId::parse(&account.id)?;

        let mut persisted = account.clone();
        let deflation = deflate_all(std::mem::take(&mut persisted.member_of));
        if deflation.dropped > 0 {
            tracing::warn!(
                account_id = %id,
                dropped = deflation.dropped,
                "Dropping group references without id"
            );
        }
        persisted.member_of = deflation.kept;

        self.accounts.save(&id, &persisted)
    }

    fn delete(&self, id: &SafeId) -> StorageResult<()> {
        self.accounts.delete(id)
    }

    fn exists(&self, id: &SafeId) -> StorageResult<bool> {
        self.accounts.exists(id)
    }

    fn list_ids(&self) -> StorageResult<Vec<SafeId>> {
        self.accounts.list_ids()
    }
}
