//! Identifier sanitizing.
//!
//! Every entity id becomes a file name in the store, so an id must never be
//! able to name anything but a direct child of the entity directory.
//! [`SafeId`] is the only way to get from a raw id to a path.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{StorageError, StorageResult};

/// Longest accepted id, in bytes. Matches common file name limits.
pub const MAX_ID_LEN: usize = 255;

/// An id that is safe to use as a single path component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SafeId(String);

impl SafeId {
    /// Validates a raw id.
    ///
    /// Accepted ids are kept as-is; nothing is rewritten.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::InvalidIdentifier` for empty ids, `.` and `..`,
    /// ids containing a path separator or a control character, ids starting
    /// with `.` and ids longer than [`MAX_ID_LEN`] bytes.
    pub fn parse(raw: &str) -> StorageResult<Self> {
        if let Some(reason) = rejection(raw) {
            return Err(StorageError::InvalidIdentifier(format!(
                "{:?}: {reason}",
                truncate(raw)
            )));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of this id inside `dir`.
    #[must_use]
    pub fn resolve(&self, dir: &Path) -> PathBuf {
        dir.join(&self.0)
    }

    /// Consumes the id, returning the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn rejection(raw: &str) -> Option<&'static str> {
    if raw.is_empty() {
        return Some("empty");
    }
    if raw.len() > MAX_ID_LEN {
        return Some("too long");
    }
    if raw.starts_with('.') {
        return Some("leading dot");
    }
    if raw.contains(['/', '\\']) {
        return Some("path separator");
    }
    if raw.chars().any(char::is_control) {
        return Some("control character");
    }
    None
}

// Keeps hostile input from flooding the logs.
fn truncate(raw: &str) -> &str {
    match raw.char_indices().nth(64) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}

impl fmt::Display for SafeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SafeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for SafeId {
    type Error = StorageError;

    fn try_from(raw: &str) -> StorageResult<Self> {
        Self::parse(raw)
    }
}
