//! Account storage trait.

use acc_model::Account;

use crate::error::StorageResult;
use crate::id::SafeId;

/// Store for account entities.
///
/// Implementations must be thread-safe and support concurrent access.
pub trait AccountStore: Send + Sync {
    /// Loads an account.
    ///
    /// References in the returned account are always deflated.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the account doesn't exist and
    /// `StorageError::Decode` if the stored document is unreadable.
    fn load(&self, id: &SafeId) -> StorageResult<Account>;

    /// Creates or replaces an account.
    ///
    /// Group references are deflated before encoding; references without
    /// an id are dropped.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::InvalidIdentifier` if the account id is not
    /// safe, `StorageError::Encode` or `StorageError::Io` otherwise.
    fn save(&self, account: &Account) -> StorageResult<()>;

    /// Deletes an account.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::NotFound` if the account doesn't exist.
    fn delete(&self, id: &SafeId) -> StorageResult<()>;

    /// Checks if an account exists.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Io` if the check itself fails.
    fn exists(&self, id: &SafeId) -> StorageResult<bool>;

    /// Lists the ids of every stored account.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Io` if the collection cannot be read.
    fn list_ids(&self) -> StorageResult<Vec<SafeId>>;
}
