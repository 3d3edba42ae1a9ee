//! Error handling for the accounts directory.
//!
//! Error messages are meant for operators. They name the entity and id that
//! failed but never include payloads such as password hashes.

use thiserror::Error;

/// Result type alias using the core error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing the directory (configuration, startup).
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Classification shared by every error type in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The addressed entity does not exist.
    NotFound,
    /// An entity with the same id already exists.
    AlreadyExists,
    /// The identifier cannot be used as a file name.
    InvalidIdentifier,
    /// The request is malformed or incomplete.
    BadRequest,
    /// Login or password did not match an enabled account.
    InvalidCredentials,
    /// An entity could not be encoded for persistence.
    Encode,
    /// A persisted entity could not be decoded.
    Decode,
    /// Filesystem failure.
    Io,
    /// The filter uses a construct the translator does not support.
    UnsupportedQuery,
    /// The filter names a property that is not indexed.
    UnknownField,
    /// Index failure or unexpected fault.
    Internal,
}

impl ErrorKind {
    /// Returns whether the caller caused this error.
    #[must_use]
    pub const fn is_client_error(self) -> bool {
        matches!(
            self,
            Self::NotFound
                | Self::AlreadyExists
                | Self::InvalidIdentifier
                | Self::BadRequest
                | Self::InvalidCredentials
                | Self::UnsupportedQuery
                | Self::UnknownField
        )
    }

    /// Returns whether this error should be logged at error level.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        !self.is_client_error()
    }

    /// Stable snake_case code for responses and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidIdentifier => "invalid_identifier",
            Self::BadRequest => "bad_request",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Encode => "encode_error",
            Self::Decode => "decode_error",
            Self::Io => "io_error",
            Self::UnsupportedQuery => "unsupported_query",
            Self::UnknownField => "unknown_field",
            Self::Internal => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
