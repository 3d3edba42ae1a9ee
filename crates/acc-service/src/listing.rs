//! Filtered listing.
//!
//! The index only selects ids. Every hit is loaded from the store, so a
//! listing never returns data that exists only in the index; hits whose
//! file is gone are skipped.

use acc_model::EntityKind;

use crate::directory::{Directory, hydrate};
use crate::dto::{ListAccountsRequest, ListAccountsResponse, ListGroupsRequest, ListGroupsResponse};
use crate::error::ServiceResult;

impl Directory {
    /// Lists the accounts matching the request filter, in index order.
    ///
    /// ## Errors
    ///
    /// Returns `BadRequest` for a malformed filter, `UnknownField` or
    /// `UnsupportedQuery` for filters the index cannot answer.
    pub fn list_accounts(&self, request: &ListAccountsRequest) -> ServiceResult<ListAccountsResponse> {
        let ids = self.matching_ids(EntityKind::Account, &request.query)?;
        let accounts = hydrate(EntityKind::Account, ids, |id| self.accounts.load(id))
            .into_iter()
            .map(|mut account| {
                self.expand_member_of(&mut account);
                account.redact_password();
                account
            })
            .collect();
        Ok(ListAccountsResponse { accounts })
    }

    /// Lists the groups matching the request filter, in index order.
    ///
    /// ## Errors
    ///
    /// Same as [`Directory::list_accounts`].
    pub fn list_groups(&self, request: &ListGroupsRequest) -> ServiceResult<ListGroupsResponse> {
        let ids = self.matching_ids(EntityKind::Group, &request.query)?;
        let groups = hydrate(EntityKind::Group, ids, |id| self.groups.load(id))
            .into_iter()
            .map(|mut group| {
                self.expand_members(&mut group);
                group
            })
            .collect();
        Ok(ListGroupsResponse { groups })
    }

    fn matching_ids(&self, kind: EntityKind, filter: &str) -> ServiceResult<Vec<String>> {
        let query = self.index.list_query(kind, Some(filter))?;
        let ids = self.index.search(query.as_ref())?;
        tracing::debug!(%kind, filter, hits = ids.len(), "Listed entities");
        Ok(ids)
    }
}
