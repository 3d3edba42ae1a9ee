//! Group domain model.
//!
//! Groups collect accounts. The membership list is mirrored by each
//! account's `member_of` list; keeping the two sides in step is the job of
//! the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::Account;
use crate::kind::{Entity, EntityKind};
use crate::reference::Reference;

/// A directory group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    // === Identity ===
    /// Unique identifier, immutable once assigned.
    pub id: String,
    /// Group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Group description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Group name synced from an on-premises directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_premises_sam_account_name: Option<String>,
    /// Numeric group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid_number: Option<i64>,

    // === Relations ===
    /// Accounts in this group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Reference<Account>>,

    // === Timestamps ===
    /// When the group was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,
    /// When the group was last modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Group {
    /// Creates an empty group with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Assigns a random id if none is set yet and returns the id.
    pub fn ensure_id(&mut self) -> &str {
        if self.id.is_empty() {
            self.id = Uuid::new_v4().to_string();
        }
        &self.id
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Sets the numeric group id.
    #[must_use]
    pub const fn with_gid_number(mut self, gid: i64) -> Self {
        self.gid_number = Some(gid);
        self
    }

    /// Checks if the group references the given account.
    #[must_use]
    pub fn has_member(&self, account_id: &str) -> bool {
        self.members.iter().any(|m| m.id() == account_id)
    }

    /// Appends a deflated member reference unless already present.
    ///
    /// Returns `true` if the reference was added.
    pub fn add_member(&mut self, account_id: &str) -> bool {
        if self.has_member(account_id) {
            return false;
        }
        self.members.push(Reference::deflated(account_id));
        true
    }

    /// Removes every reference to the given account.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_member(&mut self, account_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m.id() != account_id);
        self.members.len() != before
    }

    /// Ids of the member accounts.
    pub fn member_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(Reference::id)
    }
}

impl Entity for Group {
    const KIND: EntityKind = EntityKind::Group;

    fn id(&self) -> &str {
        &self.id
    }
}
