//! Storage error types.

use acc_core::ErrorKind;
use acc_model::EntityKind;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Entity not found.
    #[error("{} not found: {id}", .kind.label())]
    NotFound {
        /// Kind of the missing entity.
        kind: EntityKind,
        /// Entity id.
        id: String,
    },

    /// The identifier cannot be used as a file name.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// The entity could not be encoded.
    #[error("failed to encode {kind} {id}: {message}")]
    Encode {
        /// Kind of the entity.
        kind: EntityKind,
        /// Entity id.
        id: String,
        /// Encoder message.
        message: String,
    },

    /// A stored entity could not be decoded.
    #[error("failed to decode {kind} {id}: {message}")]
    Decode {
        /// Kind of the entity.
        kind: EntityKind,
        /// Entity id.
        id: String,
        /// Decoder message.
        message: String,
    },

    /// Filesystem failure.
    #[error("I/O error on {kind} {id}: {source}")]
    Io {
        /// Kind of the entity.
        kind: EntityKind,
        /// Entity id, empty for collection-wide operations.
        id: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    /// Creates a not found error for an entity.
    #[must_use]
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            Self::Encode { .. } => ErrorKind::Encode,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
