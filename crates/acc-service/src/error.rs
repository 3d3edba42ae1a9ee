//! Service error types.
//!
//! Every failure a directory operation can report, classified with the
//! shared [`ErrorKind`] so transports can map caller mistakes and server
//! faults without inspecting the source.

use acc_core::ErrorKind;
use acc_model::EntityKind;
use acc_search::SearchError;
use acc_storage::StorageError;
use thiserror::Error;

/// Errors that can occur in directory operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// An entity with the same id already exists.
    #[error("{} already exists: {id}", .kind.label())]
    AlreadyExists {
        /// Kind of the entity.
        kind: EntityKind,
        /// Conflicting id.
        id: String,
    },

    /// Invalid request data.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Login or password did not match an enabled account.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Storage layer error.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Search layer error.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Creates a bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Creates an already exists error.
    #[must_use]
    pub fn already_exists(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::Storage(err) => err.kind(),
            Self::Search(err) => err.kind(),
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Returns the error code for responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Checks if this is a not found error.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotFound)
    }
}

/// Result type for directory operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_mapping() {
        let err = ServiceError::from(StorageError::not_found(EntityKind::Group, "g1"));

        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "not_found");
        assert_eq!(err.to_string(), "Group not found: g1");
    }

    #[test]
    fn search_error_mapping() {
        let err = ServiceError::from(SearchError::invalid(0, "empty filter"));
        assert_eq!(err.kind(), ErrorKind::BadRequest);

        let err = ServiceError::from(SearchError::UnknownField("shoeSize".to_string()));
        assert_eq!(err.kind(), ErrorKind::UnknownField);
    }

    #[test]
    fn conflict_error() {
        let err = ServiceError::already_exists(EntityKind::Account, "einstein");
        assert_eq!(err.error_code(), "already_exists");
        assert_eq!(err.to_string(), "Account already exists: einstein");
    }

    #[test]
    fn internal_is_server_error() {
        assert!(ServiceError::Internal("boom".to_string()).kind().is_server_error());
        assert!(ServiceError::InvalidCredentials.kind().is_client_error());
    }
}
