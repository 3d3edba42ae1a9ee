//! Async inbound interfaces.
//!
//! Transports talk to the directory through [`AccountsService`] and
//! [`GroupsService`]. [`DirectoryHandle`] implements both by running every
//! call on tokio's blocking pool. Calls are independent: an abandoned
//! caller does not cancel the worker.

use std::sync::Arc;

use acc_model::{Account, Group};
use async_trait::async_trait;

use crate::directory::Directory;
use crate::dto::{
    AuthenticateRequest, CreateAccountRequest, CreateGroupRequest, ListAccountsRequest,
    ListAccountsResponse, ListGroupsRequest, ListGroupsResponse, ListMembersResponse,
    MemberRequest, ReindexReport, UpdateAccountRequest, UpdateGroupRequest,
};
use crate::error::{ServiceError, ServiceResult};

// ============================================================================
// Interfaces
// ============================================================================

/// Account operations.
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Creates an account.
    async fn create_account(&self, request: CreateAccountRequest) -> ServiceResult<Account>;

    /// Gets an account by id.
    async fn get_account(&self, id: &str) -> ServiceResult<Account>;

    /// Updates the masked properties of an account.
    async fn update_account(&self, request: UpdateAccountRequest) -> ServiceResult<Account>;

    /// Deletes an account.
    async fn delete_account(&self, id: &str) -> ServiceResult<()>;

    /// Lists accounts matching a filter.
    async fn list_accounts(&self, request: ListAccountsRequest) -> ServiceResult<ListAccountsResponse>;

    /// Checks a login and password.
    async fn authenticate(&self, request: AuthenticateRequest) -> ServiceResult<Account>;
}

/// Group operations.
#[async_trait]
pub trait GroupsService: Send + Sync {
    /// Creates a group.
    async fn create_group(&self, request: CreateGroupRequest) -> ServiceResult<Group>;

    /// Gets a group by id.
    async fn get_group(&self, id: &str) -> ServiceResult<Group>;

    /// Updates the masked properties of a group.
    async fn update_group(&self, request: UpdateGroupRequest) -> ServiceResult<Group>;

    /// Deletes a group and removes it from its members.
    async fn delete_group(&self, id: &str) -> ServiceResult<()>;

    /// Lists groups matching a filter.
    async fn list_groups(&self, request: ListGroupsRequest) -> ServiceResult<ListGroupsResponse>;

    /// Adds an account to a group.
    async fn add_member(&self, request: MemberRequest) -> ServiceResult<Group>;

    /// Removes an account from a group.
    async fn remove_member(&self, request: MemberRequest) -> ServiceResult<Group>;

    /// Lists the members of a group.
    async fn list_members(&self, group_id: &str) -> ServiceResult<ListMembersResponse>;
}

// ============================================================================
// Handle
// ============================================================================

/// Cloneable async handle to a [`Directory`].
#[derive(Debug, Clone)]
pub struct DirectoryHandle {
    directory: Arc<Directory>,
}

impl DirectoryHandle {
    /// Wraps a directory.
    #[must_use]
    pub fn new(directory: Directory) -> Self {
        Self {
            directory: Arc::new(directory),
        }
    }

    /// The wrapped directory.
    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Rebuilds the search index from the stores.
    ///
    /// ## Errors
    ///
    /// See [`Directory::reindex`].
    pub async fn reindex(&self) -> ServiceResult<ReindexReport> {
        self.run("reindex", Directory::reindex).await
    }

    async fn run<T, F>(&self, operation: &'static str, call: F) -> ServiceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Directory) -> ServiceResult<T> + Send + 'static,
    {
        let directory = Arc::clone(&self.directory);
        let result = tokio::task::spawn_blocking(move || call(&directory))
            .await
            .map_err(|e| ServiceError::Internal(format!("{operation} worker failed: {e}")))?;

        if let Err(err) = &result {
            if err.kind().is_server_error() {
                tracing::error!(operation, error = %err, "Directory operation failed");
            } else {
                tracing::debug!(operation, error = %err, code = err.error_code(), "Directory operation rejected");
            }
        }
        result
    }
}

#[async_trait]
impl AccountsService for DirectoryHandle {
    async fn create_account(&self, request: CreateAccountRequest) -> ServiceResult<Account> {
        self.run("create_account", move |d| d.create_account(request))
            .await
    }

    async fn get_account(&self, id: &str) -> ServiceResult<Account> {
        let id = id.to_string();
        self.run("get_account", move |d| d.get_account(&id)).await
    }

    async fn update_account(&self, request: UpdateAccountRequest) -> ServiceResult<Account> {
        self.run("update_account", move |d| d.update_account(request))
            .await
    }

    async fn delete_account(&self, id: &str) -> ServiceResult<()> {
        let id = id.to_string();
        self.run("delete_account", move |d| d.delete_account(&id))
            .await
    }

    async fn list_accounts(&self, request: ListAccountsRequest) -> ServiceResult<ListAccountsResponse> {
        self.run("list_accounts", move |d| d.list_accounts(&request))
            .await
    }

    async fn authenticate(&self, request: AuthenticateRequest) -> ServiceResult<Account> {
        self.run("authenticate", move |d| {
            d.authenticate(&request.login, &request.password)
        })
        .await
    }
}

#[async_trait]
impl GroupsService for DirectoryHandle {
    async fn create_group(&self, request: CreateGroupRequest) -> ServiceResult<Group> {
        self.run("create_group", move |d| d.create_group(request))
            .await
    }

    async fn get_group(&self, id: &str) -> ServiceResult<Group> {
        let id = id.to_string();
        self.run("get_group", move |d| d.get_group(&id)).await
    }

    async fn update_group(&self, request: UpdateGroupRequest) -> ServiceResult<Group> {
        self.run("update_group", move |d| d.update_group(request))
            .await
    }

    async fn delete_group(&self, id: &str) -> ServiceResult<()> {
        let id = id.to_string();
        self.run("delete_group", move |d| d.delete_group(&id)).await
    }

    async fn list_groups(&self, request: ListGroupsRequest) -> ServiceResult<ListGroupsResponse> {
        self.run("list_groups", move |d| d.list_groups(&request))
            .await
    }

    async fn add_member(&self, request: MemberRequest) -> ServiceResult<Group> {
        self.run("add_member", move |d| {
            d.add_member(&request.account_id, &request.group_id)
        })
        .await
    }

    async fn remove_member(&self, request: MemberRequest) -> ServiceResult<Group> {
        self.run("remove_member", move |d| {
            d.remove_member(&request.account_id, &request.group_id)
        })
        .await
    }

    async fn list_members(&self, group_id: &str) -> ServiceResult<ListMembersResponse> {
        let group_id = group_id.to_string();
        self.run("list_members", move |d| d.list_members(&group_id))
            .await
    }
}
