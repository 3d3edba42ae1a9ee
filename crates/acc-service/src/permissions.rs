//! Capability descriptors published to the policy service.
//!
//! The directory declares two permissions, one per entity kind, and binds
//! both to the admin role bundle at startup. Registration is best effort:
//! the directory serves requests whether or not the policy service accepted
//! the descriptors.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// Role bundle the permissions are attached to.
pub const BUNDLE_ROLE_ADMIN: &str = "71881883-1768-46bd-a24d-a356a2afdf7f";

/// Resource a permission governs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    /// Accounts.
    User,
    /// Groups.
    Group,
}

/// Operations a permission grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Read only.
    Read,
    /// Read and write.
    ReadWrite,
}

/// Scope of a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    /// Only the caller's own entities.
    Own,
    /// Every entity.
    All,
}

/// A permission setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Permission {
    /// Setting name.
    pub name: &'static str,
    /// Stable setting id.
    pub id: &'static str,
    /// Governed resource.
    pub resource: ResourceType,
    /// Resource id, `all` for the whole collection.
    pub resource_id: &'static str,
    /// Granted operation.
    pub operation: Operation,
    /// Scope.
    pub constraint: Constraint,
}

/// The permissions declared by the directory.
pub static PERMISSIONS: [Permission; 2] = [
    Permission {
        name: "account-management",
        id: "8e587774-d929-4215-910b-a317b1e80f73",
        resource: ResourceType::User,
        resource_id: "all",
        operation: Operation::ReadWrite,
        constraint: Constraint::All,
    },
    Permission {
        name: "group-management",
        id: "522adfbe-5908-45b4-b135-41979de73245",
        resource: ResourceType::Group,
        resource_id: "all",
        operation: Operation::ReadWrite,
        constraint: Constraint::All,
    },
];

/// Failure reported by the policy service.
#[derive(Debug, Error)]
#[error("policy service rejected '{setting}': {message}")]
pub struct PolicyError {
    /// Setting that was rejected.
    pub setting: String,
    /// Reason given by the service.
    pub message: String,
}

impl PolicyError {
    /// Creates a policy error.
    #[must_use]
    pub fn new(setting: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            setting: setting.into(),
            message: message.into(),
        }
    }
}

/// Outbound interface to the policy service.
#[async_trait]
pub trait PolicyService: Send + Sync {
    /// Attaches a permission setting to a role bundle.
    async fn add_setting_to_bundle(
        &self,
        bundle_id: &str,
        permission: &Permission,
    ) -> Result<(), PolicyError>;
}

/// Registers every permission with the admin bundle.
///
/// Failures are logged and skipped. Returns the number of permissions the
/// service accepted.
pub async fn register_permissions(service: &dyn PolicyService) -> usize {
    let mut registered = 0;
    for permission in &PERMISSIONS {
        match service
            .add_setting_to_bundle(BUNDLE_ROLE_ADMIN, permission)
            .await
        {
            Ok(()) => {
                tracing::debug!(setting = permission.name, "Registered permission");
                registered += 1;
            }
            Err(err) => {
                tracing::warn!(setting = permission.name, error = %err, "Could not register permission");
            }
        }
    }
    tracing::info!(registered, total = PERMISSIONS.len(), "Registered permissions");
    registered
}
