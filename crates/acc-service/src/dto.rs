//! Request and response types of the inbound service interfaces.

use acc_model::{Account, Group};
use serde::{Deserialize, Serialize};

// ============================================================================
// Accounts
// ============================================================================

/// Request to create an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// The account. An empty id is replaced with a random one.
    pub account: Option<Account>,
}

/// Request to update an account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// The account carrying the new values. Its id selects the target.
    pub account: Option<Account>,
    /// Property paths to copy onto the stored account.
    #[serde(default)]
    pub update_mask: Vec<String>,
}

/// Request to list accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsRequest {
    /// Filter expression; empty lists every account.
    #[serde(default)]
    pub query: String,
}

/// Listed accounts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAccountsResponse {
    /// Accounts in index order.
    pub accounts: Vec<Account>,
}

/// Request to check a login and password.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    /// Login name, matched against `onPremisesSamAccountName`.
    pub login: String,
    /// Plaintext password.
    pub password: String,
}

// ============================================================================
// Groups
// ============================================================================

/// Request to create a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    /// The group. An empty id is replaced with a random one.
    pub group: Option<Group>,
}

/// Request to update a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupRequest {
    /// The group carrying the new values. Its id selects the target.
    pub group: Option<Group>,
    /// Property paths to copy onto the stored group.
    #[serde(default)]
    pub update_mask: Vec<String>,
}

/// Request to list groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsRequest {
    /// Filter expression; empty lists every group.
    #[serde(default)]
    pub query: String,
}

/// Listed groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListGroupsResponse {
    /// Groups in index order.
    pub groups: Vec<Group>,
}

/// Request to add or remove a membership edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRequest {
    /// Group side of the edge.
    pub group_id: String,
    /// Account side of the edge.
    pub account_id: String,
}

impl MemberRequest {
    /// Creates a membership request.
    #[must_use]
    pub fn new(group_id: impl Into<String>, account_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            account_id: account_id.into(),
        }
    }
}

/// Members of a group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembersResponse {
    /// Member accounts, in membership order.
    pub members: Vec<Account>,
}

// ============================================================================
// Maintenance
// ============================================================================

/// Counts for one entity kind after a full reindex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindReport {
    /// Entities written to the index.
    pub indexed: usize,
    /// Entities that could not be loaded or indexed.
    pub skipped: usize,
}

/// Outcome of a full reindex.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReindexReport {
    /// Account counts.
    pub accounts: KindReport,
    /// Group counts.
    pub groups: KindReport,
}
