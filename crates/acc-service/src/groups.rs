//! Group operations.

use acc_model::{EntityKind, Group, Reference};
use acc_storage::SafeId;
use chrono::Utc;

use crate::directory::Directory;
use crate::dto::{CreateGroupRequest, ListMembersResponse, UpdateGroupRequest};
use crate::error::{ServiceError, ServiceResult};
use crate::mask;

impl Directory {
    /// Creates a group.
    ///
    /// An empty id is replaced with a random UUID. Member references are
    /// stored as given, reduced to their ids; the member accounts are not
    /// touched.
    ///
    /// ## Errors
    ///
    /// - `BadRequest` if the request carries no group
    /// - `InvalidIdentifier` if the id is not usable as a file name
    /// - `AlreadyExists` if a group with the id exists
    pub fn create_group(&self, request: CreateGroupRequest) -> ServiceResult<Group> {
        let Some(mut group) = request.group else {
            return Err(ServiceError::bad_request("group is required"));
        };
        let id = SafeId::parse(group.ensure_id())?;
        if self.groups.exists(&id)? {
            return Err(ServiceError::already_exists(EntityKind::Group, id.as_str()));
        }

        self.deflate_members(&mut group);
        let now = Utc::now();
        group.created_date_time = Some(now);
        group.last_modified_date_time = Some(now);

        self.groups.save(&group)?;
        self.index.index_group(&group)?;

        tracing::info!(group_id = %id, "Created group");
        Ok(group)
    }

    /// Loads a group with its members expanded.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidIdentifier` or `NotFound`.
    pub fn get_group(&self, id: &str) -> ServiceResult<Group> {
        let id = SafeId::parse(id)?;
        let mut group = self.groups.load(&id)?;
        self.expand_members(&mut group);
        Ok(group)
    }

    /// Copies the masked properties of the request onto the stored group.
    ///
    /// ## Errors
    ///
    /// - `BadRequest` if the group is missing or the mask is empty, names
    ///   `members` or an unknown property
    /// - `InvalidIdentifier` or `NotFound` for the target id
    pub fn update_group(&self, request: UpdateGroupRequest) -> ServiceResult<Group> {
        let Some(mut source) = request.group else {
            return Err(ServiceError::bad_request("group is required"));
        };
        let paths = mask::group_paths(&request.update_mask)?;
        let id = SafeId::parse(&source.id)?;

        let guard = self.edits.lock();
        let mut group = self.groups.load(&id)?;
        mask::apply_group(&mut group, &mut source, &paths);
        group.last_modified_date_time = Some(Utc::now());

        self.groups.save(&group)?;
        self.index.index_group(&group)?;
        drop(guard);

        tracing::info!(group_id = %id, fields = paths.len(), "Updated group");
        self.expand_members(&mut group);
        Ok(group)
    }

    /// Deletes a group after removing it from every member account.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidIdentifier` or `NotFound`. Failures of the cascade
    /// are logged and do not stop the deletion.
    pub fn delete_group(&self, id: &str) -> ServiceResult<()> {
        let id = SafeId::parse(id)?;
        let group = self.groups.load(&id)?;

        let removed = self.cascade_group_deletion(&group);
        self.groups.delete(&id)?;
        self.index.remove(EntityKind::Group, id.as_str())?;

        tracing::info!(group_id = %id, memberships = removed, "Deleted group");
        Ok(())
    }

    /// Lists the member accounts of a group.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidIdentifier` or `NotFound`.
    pub fn list_members(&self, id: &str) -> ServiceResult<ListMembersResponse> {
        let mut group = self.get_group(id)?;
        let members = std::mem::take(&mut group.members)
            .into_iter()
            .filter_map(|member| match member {
                Reference::Expanded(account) => Some(*account),
                Reference::Deflated { .. } => None,
            })
            .collect();
        Ok(ListMembersResponse { members })
    }
}
