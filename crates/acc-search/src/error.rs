//! Search error types.

use acc_core::ErrorKind;
use thiserror::Error;

/// Errors raised while parsing filters or using the index.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The filter is not well-formed.
    #[error("invalid filter at position {position}: {message}")]
    InvalidFilter {
        /// Byte offset in the filter where parsing failed.
        position: usize,
        /// What went wrong.
        message: String,
    },

    /// The filter is well-formed but uses a construct that cannot be
    /// translated to an index query.
    #[error("unsupported query: {0}")]
    UnsupportedQuery(String),

    /// The filter names a property that is not indexed.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The index itself failed.
    #[error("index error: {0}")]
    Index(#[from] tantivy::TantivyError),
}

impl SearchError {
    /// Creates an invalid filter error.
    #[must_use]
    pub fn invalid(position: usize, message: impl Into<String>) -> Self {
        Self::InvalidFilter {
            position,
            message: message.into(),
        }
    }

    /// Creates an unsupported query error.
    #[must_use]
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedQuery(message.into())
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFilter { .. } => ErrorKind::BadRequest,
            Self::UnsupportedQuery(_) => ErrorKind::UnsupportedQuery,
            Self::UnknownField(_) => ErrorKind::UnknownField,
            Self::Index(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for search operations.
pub type SearchResult<T> = Result<T, SearchError>;
