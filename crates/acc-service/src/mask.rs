//! Update masks.
//!
//! An update names the properties it changes. Paths may be written in
//! camelCase or snake_case. Identity, membership and timestamps cannot be
//! set through an update.

use acc_model::{Account, Group, PasswordProfile};

use crate::error::{ServiceError, ServiceResult};

const IMMUTABLE: [&str; 5] = [
    "id",
    "memberOf",
    "members",
    "createdDateTime",
    "lastModifiedDateTime",
];

/// Updatable account properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AccountPath {
    DisplayName,
    PreferredName,
    OnPremisesSamAccountName,
    UidNumber,
    GidNumber,
    Mail,
    Description,
    AccountEnabled,
    PasswordProfile,
}

/// Updatable group properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GroupPath {
    DisplayName,
    Description,
    OnPremisesSamAccountName,
    GidNumber,
}

pub(crate) fn account_paths(mask: &[String]) -> ServiceResult<Vec<AccountPath>> {
    parse(mask, |path| {
        Some(match path {
            "displayName" => AccountPath::DisplayName,
            "preferredName" => AccountPath::PreferredName,
            "onPremisesSamAccountName" => AccountPath::OnPremisesSamAccountName,
            "uidNumber" => AccountPath::UidNumber,
            "gidNumber" => AccountPath::GidNumber,
            "mail" => AccountPath::Mail,
            "description" => AccountPath::Description,
            "accountEnabled" => AccountPath::AccountEnabled,
            "passwordProfile" => AccountPath::PasswordProfile,
            _ => return None,
        })
    })
}

pub(crate) fn group_paths(mask: &[String]) -> ServiceResult<Vec<GroupPath>> {
    parse(mask, |path| {
        Some(match path {
            "displayName" => GroupPath::DisplayName,
            "description" => GroupPath::Description,
            "onPremisesSamAccountName" => GroupPath::OnPremisesSamAccountName,
            "gidNumber" => GroupPath::GidNumber,
            _ => return None,
        })
    })
}

fn parse<P>(mask: &[String], lookup: impl Fn(&str) -> Option<P>) -> ServiceResult<Vec<P>> {
    if mask.is_empty() {
        return Err(ServiceError::bad_request("update mask must not be empty"));
    }

    mask.iter()
        .map(|raw| {
            let path = camel_case(raw);
            if IMMUTABLE.contains(&path.as_str()) {
                return Err(ServiceError::bad_request(format!(
                    "'{raw}' cannot be updated"
                )));
            }
            lookup(path.as_str())
                .ok_or_else(|| ServiceError::bad_request(format!("unknown update path '{raw}'")))
        })
        .collect()
}

fn camel_case(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut upper = false;
    for ch in path.trim().chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Moves the masked properties from `source` onto `target`.
///
/// Returns the new plaintext password when the mask includes the password
/// profile and the source carries a non-empty password. The stored hash is
/// left untouched otherwise.
pub(crate) fn apply_account(
    target: &mut Account,
    source: &mut Account,
    paths: &[AccountPath],
) -> Option<String> {
    let mut password = None;
    for path in paths {
        match path {
            AccountPath::DisplayName => target.display_name = source.display_name.take(),
            AccountPath::PreferredName => target.preferred_name = source.preferred_name.take(),
            AccountPath::OnPremisesSamAccountName => {
                target.on_premises_sam_account_name = source.on_premises_sam_account_name.take();
            }
            AccountPath::UidNumber => target.uid_number = source.uid_number,
            AccountPath::GidNumber => target.gid_number = source.gid_number,
            AccountPath::Mail => target.mail = source.mail.take(),
            AccountPath::Description => target.description = source.description.take(),
            AccountPath::AccountEnabled => target.account_enabled = source.account_enabled,
            AccountPath::PasswordProfile => {
                let incoming = source.password_profile.take().unwrap_or_default();
                let profile = target
                    .password_profile
                    .get_or_insert_with(PasswordProfile::default);
                profile.force_change_password_next_sign_in =
                    incoming.force_change_password_next_sign_in;
                profile.force_change_password_next_sign_in_with_mfa =
                    incoming.force_change_password_next_sign_in_with_mfa;
                password = incoming.password.filter(|p| !p.is_empty());
            }
        }
    }
    password
}

/// Moves the masked properties from `source` onto `target`.
pub(crate) fn apply_group(target: &mut Group, source: &mut Group, paths: &[GroupPath]) {
    for path in paths {
        match path {
            GroupPath::DisplayName => target.display_name = source.display_name.take(),
            GroupPath::Description => target.description = source.description.take(),
            GroupPath::OnPremisesSamAccountName => {
                target.on_premises_sam_account_name = source.on_premises_sam_account_name.take();
            }
            GroupPath::GidNumber => target.gid_number = source.gid_number,
        }
    }
}
