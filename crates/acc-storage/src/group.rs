//! Group storage trait.

use acc_model::Group;

use crate::error::StorageResult;
use crate::id::SafeId;

/// Store for group entities.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait GroupStore: Send + Sync {
    /// Loads a group. Member references are always deflated.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the group doesn't exist and
    /// `StorageError::Decode` if the stored document is unreadable.
    fn load(&self, id: &SafeId) -> StorageResult<Group>;

    /// Creates or replaces a group, deflating its member references.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::InvalidIdentifier` if the group id is not
    /// safe, `StorageError::Encode` or `StorageError::Io` otherwise.
    fn save(&self, group: &Group) -> StorageResult<()>;

    /// Deletes a group. Member accounts are not touched.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the group doesn't exist.
    fn delete(&self, id: &SafeId) -> StorageResult<()>;

    /// Checks if a group exists.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Io` if the check itself fails.
    fn exists(&self, id: &SafeId) -> StorageResult<bool>;

    /// Lists the ids of every stored group.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Io` if the collection cannot be read.
    fn list_ids(&self) -> StorageResult<Vec<SafeId>>;
}
