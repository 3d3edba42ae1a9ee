//! Account domain model.
//!
//! Accounts are the primary identity entities of the directory. They carry
//! profile data, an optional password profile and the list of groups they
//! are a member of.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::group::Group;
use crate::kind::{Entity, EntityKind};
use crate::reference::Reference;

/// Password settings of an account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordProfile {
    /// Password. Plaintext on the way in, a PHC hash once persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Force a password change on the next sign-in.
    pub force_change_password_next_sign_in: bool,
    /// Force a password change on the next sign-in, with MFA.
    pub force_change_password_next_sign_in_with_mfa: bool,
}

/// A directory account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    // === Identity ===
    /// Unique identifier, immutable once assigned.
    pub id: String,
    /// Whether the account may sign in.
    pub account_enabled: bool,

    // === Profile ===
    /// Name shown in user interfaces.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Preferred user name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_name: Option<String>,
    /// Login name synced from an on-premises directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_premises_sam_account_name: Option<String>,
    /// Numeric user id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid_number: Option<i64>,
    /// Numeric primary group id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid_number: Option<i64>,
    /// Mail address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Free text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    // === Security ===
    /// Password settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_profile: Option<PasswordProfile>,

    // === Relations ===
    /// Groups this account belongs to.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub member_of: Vec<Reference<Group>>,

    // === Timestamps ===
    /// When the account was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,
    /// When the account was last modified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

impl Account {
    /// Creates an enabled account with the given id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            account_enabled: true,
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

    /// Sets the preferred name.
    #[must_use]
    pub fn with_preferred_name(mut self, name: impl Into<String>) -> Self {
        self.preferred_name = Some(name.into());
        self
    }

    /// Sets the on-premises login name.
    #[must_use]
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.on_premises_sam_account_name = Some(login.into());
        self
    }

    /// Sets the mail address.
    #[must_use]
    pub fn with_mail(mut self, mail: impl Into<String>) -> Self {
        self.mail = Some(mail.into());
        self
    }

    /// Sets the numeric uid and gid.
    #[must_use]
    pub const fn with_numbers(mut self, uid: i64, gid: i64) -> Self {
        self.uid_number = Some(uid);
        self.gid_number = Some(gid);
        self
    }

    /// Sets whether the account is enabled.
    #[must_use]
    pub const fn with_enabled(mut self, enabled: bool) -> Self {
        self.account_enabled = enabled;
        self
    }

    /// Sets a plaintext password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password_profile
            .get_or_insert_with(PasswordProfile::default)
            .password = Some(password.into());
        self
    }

    /// Returns the stored password, if any.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        self.password_profile
            .as_ref()
            .and_then(|p| p.password.as_deref())
    }

    /// Clears the password while keeping the other password settings.
    pub fn redact_password(&mut self) {
        if let Some(profile) = self.password_profile.as_mut() {
            profile.password = None;
        }
    }

    /// Checks if the account references the given group.
    #[must_use]
    pub fn is_member_of(&self, group_id: &str) -> bool {
        self.member_of.iter().any(|g| g.id() == group_id)
    }

    /// Appends a deflated group reference unless already present.
    ///
    /// Returns `true` if the reference was added.
    pub fn add_member_of(&mut self, group_id: &str) -> bool {
        if self.is_member_of(group_id) {
            return false;
        }
        self.member_of.push(Reference::deflated(group_id));
        true
    }

    /// Removes every reference to the given group.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove_member_of(&mut self, group_id: &str) -> bool {
        let before = self.member_of.len();
        self.member_of.retain(|g| g.id() != group_id);
        self.member_of.len() != before
    }

    /// Ids of the groups this account belongs to.
    pub fn group_ids(&self) -> impl Iterator<Item = &str> {
        self.member_of.iter().map(Reference::id)
    }
}

impl Entity for Account {
    const KIND: EntityKind = EntityKind::Account;

    fn id(&self) -> &str {
        &self.id
    }
}
