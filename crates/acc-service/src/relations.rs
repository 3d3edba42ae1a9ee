//! Membership edges between accounts and groups.
//!
//! An edge is stored twice: as a group reference in the account's
//! `member_of` and as an account reference in the group's `members`. Edits
//! persist the account first and the group second, under the directory's
//! edit lock so concurrent edits of the same group or account cannot lose
//! each other's writes. There is no rollback: if the group write fails the
//! edge is left one-sided until the next edit of the same pair.

use acc_model::{Account, EntityKind, Group, Reference, deflate_all};
use acc_storage::SafeId;

use crate::directory::{Directory, hydrate};
use crate::error::ServiceResult;

#[derive(Debug, Clone, Copy)]
enum Edit {
    Add,
    Remove,
}

impl Directory {
    /// Makes an account a member of a group.
    ///
    /// Adding an existing edge is a no-op. Returns the group as stored.
    ///
    /// ## Errors
    ///
    /// Returns `InvalidIdentifier` or `NotFound` for either side, and
    /// storage or index errors from the writes.
    pub fn add_member(&self, account_id: &str, group_id: &str) -> ServiceResult<Group> {
        self.edit_membership(account_id, group_id, Edit::Add)
    }

    /// Removes an account from a group.
    ///
    /// Removing a missing edge is a no-op. Returns the group as stored.
    ///
    /// ## Errors
    ///
    /// Same as [`Directory::add_member`].
    pub fn remove_member(&self, account_id: &str, group_id: &str) -> ServiceResult<Group> {
        self.edit_membership(account_id, group_id, Edit::Remove)
    }

    fn edit_membership(&self, account_id: &str, group_id: &str, edit: Edit) -> ServiceResult<Group> {
        let account_id = SafeId::parse(account_id)?;
        let group_id = SafeId::parse(group_id)?;

        let _guard = self.edits.lock();
        let mut account = self.accounts.load(&account_id)?;
        let mut group = self.groups.load(&group_id)?;

        let (account_changed, group_changed) = match edit {
            Edit::Add => (
                account.add_member_of(&group.id),
                group.add_member(&account.id),
            ),
            Edit::Remove => (
                account.remove_member_of(&group.id),
                group.remove_member(&account.id),
            ),
        };
        if !account_changed && !group_changed {
            tracing::debug!(?edit, %account_id, %group_id, "Membership unchanged");
            return Ok(group);
        }

        self.accounts.save(&account)?;
        if let Err(err) = self.groups.save(&group) {
            tracing::error!(
                ?edit,
                %account_id,
                %group_id,
                error = %err,
                "Membership persisted on the account only"
            );
            return Err(err.into());
        }

        self.index.index_account(&account)?;
        self.index.index_group(&group)?;

        tracing::info!(?edit, %account_id, %group_id, "Updated membership");
        Ok(group)
    }

    /// Replaces every member reference with the loaded account.
    ///
    /// Expanded accounts have their password cleared and keep their own
    /// group references deflated. Members that cannot be loaded are dropped
    /// and logged.
    pub fn expand_members(&self, group: &mut Group) {
        let ids: Vec<String> = group.member_ids().map(str::to_string).collect();
        group.members = hydrate(EntityKind::Account, ids, |id| self.accounts.load(id))
            .into_iter()
            .map(|mut account| {
                account.redact_password();
                Reference::expanded(account)
            })
            .collect();
    }

    /// Replaces every group reference with the loaded group.
    ///
    /// Expanded groups keep their own member references deflated. Groups
    /// that cannot be loaded are dropped and logged.
    pub fn expand_member_of(&self, account: &mut Account) {
        let ids: Vec<String> = account.group_ids().map(str::to_string).collect();
        account.member_of = hydrate(EntityKind::Group, ids, |id| self.groups.load(id))
            .into_iter()
            .map(Reference::expanded)
            .collect();
    }

    /// Reduces every member reference to its id, dropping members without
    /// an id.
    pub fn deflate_members(&self, group: &mut Group) {
        let deflation = deflate_all(std::mem::take(&mut group.members));
        if deflation.dropped > 0 {
            tracing::warn!(
                group_id = %group.id,
                dropped = deflation.dropped,
                "Resolving members without id is not supported"
            );
        }
        group.members = deflation.kept;
    }

    /// Reduces every group reference to its id, dropping groups without
    /// an id.
    pub fn deflate_member_of(&self, account: &mut Account) {
        let deflation = deflate_all(std::mem::take(&mut account.member_of));
        if deflation.dropped > 0 {
            tracing::warn!(
                account_id = %account.id,
                dropped = deflation.dropped,
                "Resolving groups without id is not supported"
            );
        }
        account.member_of = deflation.kept;
    }

    /// Removes the group from every member account ahead of its deletion.
    ///
    /// Failures are logged and do not stop the cascade. Returns the number
    /// of edges removed.
    pub fn cascade_group_deletion(&self, group: &Group) -> usize {
        let mut removed = 0;
        for account_id in group.member_ids() {
            match self.remove_member(account_id, &group.id) {
                Ok(_) => removed += 1,
                Err(err) => tracing::warn!(
                    group_id = %group.id,
                    account_id,
                    error = %err,
                    "Could not remove membership, skipping"
                ),
            }
        }
        removed
    }
}
