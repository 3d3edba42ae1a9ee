//! Entity kinds.

use std::fmt;

/// The two kinds of entity held by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// A user account.
    Account,
    /// A group of accounts.
    Group,
}

impl EntityKind {
    /// All kinds, in reindex order.
    pub const ALL: [Self; 2] = [Self::Account, Self::Group];

    /// Discriminator value stored in the search index.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Group => "group",
        }
    }

    /// Name of the collection holding entities of this kind.
    #[must_use]
    pub const fn collection(self) -> &'static str {
        match self {
            Self::Account => "accounts",
            Self::Group => "groups",
        }
    }

    /// Human readable label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An identified directory entity.
pub trait Entity {
    /// Kind of this entity.
    const KIND: EntityKind;

    /// The entity id. Empty until assigned on create.
    fn id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminators_are_distinct() {
        assert_ne!(EntityKind::Account.as_str(), EntityKind::Group.as_str());
        assert_eq!(EntityKind::Group.collection(), "groups");
        assert_eq!(EntityKind::Account.to_string(), "account");
    }
}
