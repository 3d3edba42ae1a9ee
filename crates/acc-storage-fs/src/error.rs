//! Filesystem error conversion.

use std::io;

use acc_model::EntityKind;
use acc_storage::StorageError;

/// Converts an I/O error on a single entity to a storage error.
pub fn from_io_error(kind: EntityKind, id: &str, err: io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::NotFound => StorageError::not_found(kind, id),
        _ => StorageError::Io {
            kind,
            id: id.to_string(),
            source: err,
        },
    }
}

/// Converts an I/O error on a whole collection to a storage error.
///
/// Missing files are not translated to `NotFound` here: a collection
/// directory that vanished is a server fault.
pub fn from_collection_error(kind: EntityKind, err: io::Error) -> StorageError {
    StorageError::Io {
        kind,
        id: String::new(),
        source: err,
    }
}

/// Creates an encode error.
#[allow(clippy::needless_pass_by_value)]
pub fn encode_error(kind: EntityKind, id: &str, err: serde_json::Error) -> StorageError {
    StorageError::Encode {
        kind,
        id: id.to_string(),
        message: err.to_string(),
    }
}

/// Creates a decode error.
#[allow(clippy::needless_pass_by_value)]
pub fn decode_error(kind: EntityKind, id: &str, err: serde_json::Error) -> StorageError {
    StorageError::Decode {
        kind,
        id: id.to_string(),
        message: err.to_string(),
    }
}
