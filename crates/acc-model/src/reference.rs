//! Relationship edges between accounts and groups.
//!
//! A [`Reference`] is either *deflated* (the target id only) or *expanded*
//! (the full target entity). Only the deflated form is persisted:
//!
//! - serializing a deflated reference writes `{"id": "..."}`, an expanded one
//!   writes the whole entity;
//! - deserializing always produces a deflated reference, whatever else the
//!   JSON object carries.
//!
//! Expanded references only exist in memory while building a response.

use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use crate::kind::Entity;

/// One side of a membership edge.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference<T> {
    /// The id of the referenced entity.
    Deflated {
        /// Referenced entity id.
        id: String,
    },
    /// The referenced entity itself.
    Expanded(Box<T>),
}

impl<T: Entity> Reference<T> {
    /// Creates a deflated reference.
    #[must_use]
    pub fn deflated(id: impl Into<String>) -> Self {
        Self::Deflated { id: id.into() }
    }

    /// Creates an expanded reference.
    #[must_use]
    pub fn expanded(entity: T) -> Self {
        Self::Expanded(Box::new(entity))
    }

    /// Id of the referenced entity.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Deflated { id } => id,
            Self::Expanded(entity) => entity.id(),
        }
    }

    /// Checks if the reference carries the full entity.
    #[must_use]
    pub const fn is_expanded(&self) -> bool {
        matches!(self, Self::Expanded(_))
    }

    /// Returns the entity of an expanded reference.
    #[must_use]
    pub fn as_expanded(&self) -> Option<&T> {
        match self {
            Self::Deflated { .. } => None,
            Self::Expanded(entity) => Some(entity),
        }
    }

    /// Reduces the reference to its id.
    #[must_use]
    pub fn deflate(self) -> Self {
        match self {
            Self::Deflated { .. } => self,
            Self::Expanded(entity) => Self::Deflated {
                id: entity.id().to_string(),
            },
        }
    }
}

/// Outcome of [`deflate_all`].
#[derive(Debug)]
pub struct Deflation<T> {
    /// Deflated references, in their original order.
    pub kept: Vec<Reference<T>>,
    /// References dropped because they had no id.
    pub dropped: usize,
}

/// Deflates every reference, dropping the ones with an empty id.
///
/// A reference without an id cannot be resolved later, and resolving a
/// target by any other attribute is not supported.
#[must_use]
pub fn deflate_all<T: Entity>(refs: Vec<Reference<T>>) -> Deflation<T> {
    let total = refs.len();
    let kept: Vec<Reference<T>> = refs
        .into_iter()
        .map(Reference::deflate)
        .filter(|r| !r.id().is_empty())
        .collect();

    Deflation {
        dropped: total - kept.len(),
        kept,
    }
}

impl<T: Serialize> Serialize for Reference<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Deflated { id } => {
                let mut state = serializer.serialize_struct("Reference", 1)?;
                state.serialize_field("id", id)?;
                state.end()
            }
            Self::Expanded(entity) => entity.serialize(serializer),
        }
    }
}

impl<'de, T> Deserialize<'de> for Reference<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct IdOnly {
            #[serde(default)]
            id: String,
        }

        let wire = IdOnly::deserialize(deserializer)?;
        Ok(Self::Deflated { id: wire.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Account, Group};

    #[test]
    fn deflated_serializes_as_id_only() {
        let reference: Reference<Account> = Reference::deflated("u1");
        let json = serde_json::to_string(&reference).unwrap();
        assert_eq!(json, r#"{"id":"u1"}"#);
    }

    #[test]
    fn expanded_serializes_full_entity() {
        let account = Account::new("u1").with_display_name("Alice");
        let reference = Reference::expanded(account);
        let json = serde_json::to_value(&reference).unwrap();

        assert_eq!(json["id"], "u1");
        assert_eq!(json["displayName"], "Alice");
    }

    #[test]
    fn decoding_always_yields_deflated() {
        let json = r#"{"id":"g1","displayName":"Admins","members":[{"id":"u1"}]}"#;
        let reference: Reference<Group> = serde_json::from_str(json).unwrap();

        assert!(!reference.is_expanded());
        assert_eq!(reference.id(), "g1");
    }

    #[test]
    fn decoding_without_id_yields_empty_id() {
        let reference: Reference<Account> =
            serde_json::from_str(r#"{"displayName":"nobody"}"#).unwrap();
        assert_eq!(reference.id(), "");
    }

    #[test]
    fn deflate_all_keeps_order_and_drops_empty_ids() {
        let refs = vec![
            Reference::expanded(Account::new("u1")),
            Reference::deflated(""),
            Reference::deflated("u2"),
            Reference::expanded(Account::default()),
        ];

        let deflation = deflate_all(refs);

        assert_eq!(deflation.dropped, 2);
        let ids: Vec<&str> = deflation.kept.iter().map(Reference::id).collect();
        assert_eq!(ids, vec!["u1", "u2"]);
        assert!(deflation.kept.iter().all(|r| !r.is_expanded()));
    }
}
