//! Filesystem implementation of the group store.

use acc_model::{Group, deflate_all};
use acc_storage::{GroupStore, SafeId, StorageResult};

use crate::FsDirectory;

impl GroupStore for FsDirectory {
    fn load(&self, id: &SafeId) -> StorageResult<Group> {
        self.groups.load(id)
    }

    fn save(&self, group: &Group) -> StorageResult<()> {
        let id = SafeId::parse(&group.id)?;

        let mut persisted = group.clone();
        let deflation = deflate_all(std::mem::take(&mut persisted.members));
        if deflation.dropped > 0 {
            tracing::warn!(
                group_id = %id,
                dropped = deflation.dropped,
                "Dropping member references without id"
            );
        }
        persisted.members = deflation.kept;

        self.groups.save(&id, &persisted)
    }

    fn delete(&self, id: &SafeId) -> StorageResult<()> {
        self.groups.delete(id)
    }

    fn exists(&self, id: &SafeId) -> StorageResult<bool> {
        self.groups.exists(id)
    }

    fn list_ids(&self) -> StorageResult<Vec<SafeId>> {
        self.groups.list_ids()
    }
}

#[cfg(test)]
mod tests {
    use acc_model::{Account, Reference};
    use acc_storage::AccountStore;

    use super::*;

    fn id(raw: &str) -> SafeId {
        SafeId::parse(raw).unwrap()
    }

    #[test]
    fn round_trip_with_expanded_members() {
        let root = tempfile::tempdir().unwrap();
        let store = FsDirectory::open(root.path()).unwrap();
        let mut group = Group::new("physicists").with_display_name("Physicists");
        group.members = vec![
            Reference::expanded(Account::new("einstein").with_password("secret")),
            Reference::deflated("curie"),
        ];

        GroupStore::save(&store, &group).unwrap();

        let raw = std::fs::read_to_string(store.groups_dir().join("physicists")).unwrap();
        assert!(!raw.contains("secret"));

        let loaded = GroupStore::load(&store, &id("physicists")).unwrap();
        assert_eq!(loaded.display_name.as_deref(), Some("Physicists"));
        assert_eq!(
            loaded.members,
            vec![Reference::deflated("einstein"), Reference::deflated("curie")]
        );
    }

    #[test]
    fn collections_are_separate() {
        let root = tempfile::tempdir().unwrap();
        let store = FsDirectory::open(root.path()).unwrap();

        GroupStore::save(&store, &Group::new("shared")).unwrap();

        assert!(GroupStore::exists(&store, &id("shared")).unwrap());
        assert!(!AccountStore::exists(&store, &id("shared")).unwrap());
        assert!(AccountStore::list_ids(&store).unwrap().is_empty());
        assert_eq!(GroupStore::list_ids(&store).unwrap(), vec![id("shared")]);
    }
}
