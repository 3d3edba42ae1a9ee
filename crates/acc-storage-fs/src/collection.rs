//! One directory of JSON documents, one document per entity.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use acc_model::EntityKind;
use acc_storage::{SafeId, StorageResult};
use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{decode_error, encode_error, from_collection_error, from_io_error};

#[cfg(unix)]
const FILE_MODE: u32 = 0o600;
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// A directory holding every entity of one kind.
///
/// All file operations on the directory are serialized by a single lock.
#[derive(Debug)]
pub struct Collection {
    kind: EntityKind,
    dir: PathBuf,
    lock: Mutex<()>,
}

impl Collection {
    /// Opens the collection under `root`, creating its directory if needed.
    ///
    /// ## Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(root: &Path, kind: EntityKind) -> StorageResult<Self> {
        let dir = root.join(kind.collection());
        create_dir(&dir).map_err(|e| from_collection_error(kind, e))?;

        Ok(Self {
            kind,
            dir,
            lock: Mutex::new(()),
        })
    }

    /// Directory of this collection.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Reads and decodes one document.
    pub fn load<T: DeserializeOwned>(&self, id: &SafeId) -> StorageResult<T> {
        let path = id.resolve(&self.dir);
        let bytes = {
            let _guard = self.lock.lock();
            fs::read(&path).map_err(|e| from_io_error(self.kind, id.as_str(), e))?
        };

        serde_json::from_slice(&bytes).map_err(|e| decode_error(self.kind, id.as_str(), e))
    }

    /// Encodes and writes one document, replacing any previous version.
    ///
    /// The document is written to a hidden temporary file first and renamed
    /// over the target.
    pub fn save<T: Serialize>(&self, id: &SafeId, entity: &T) -> StorageResult<()> {
        let bytes =
            serde_json::to_vec(entity).map_err(|e| encode_error(self.kind, id.as_str(), e))?;
        let target = id.resolve(&self.dir);
        let tmp = self.dir.join(format!(".{id}.tmp"));

        let _guard = self.lock.lock();
        let written = write_file(&tmp, &bytes).and_then(|()| fs::rename(&tmp, &target));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(from_io_error(self.kind, id.as_str(), e));
        }

        tracing::debug!(kind = %self.kind, id = %id, bytes = bytes.len(), "Saved entity");
        Ok(())
    }

    /// Removes one document.
    pub fn delete(&self, id: &SafeId) -> StorageResult<()> {
        let path = id.resolve(&self.dir);
        let _guard = self.lock.lock();
        fs::remove_file(&path).map_err(|e| from_io_error(self.kind, id.as_str(), e))?;

        tracing::debug!(kind = %self.kind, id = %id, "Deleted entity");
        Ok(())
    }

    /// Checks if a document exists.
    pub fn exists(&self, id: &SafeId) -> StorageResult<bool> {
        let path = id.resolve(&self.dir);
        let _guard = self.lock.lock();
        path.try_exists()
            .map_err(|e| from_io_error(self.kind, id.as_str(), e))
    }

    /// Lists the ids of every document, sorted.
    ///
    /// Entries whose names are not valid ids (temporary files) are skipped.
    pub fn list_ids(&self) -> StorageResult<Vec<SafeId>> {
        let entries = {
            let _guard = self.lock.lock();
            fs::read_dir(&self.dir)
                .and_then(|dir| dir.collect::<io::Result<Vec<_>>>())
                .map_err(|e| from_collection_error(self.kind, e))?
        };

        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::warn!(kind = %self.kind, entry = ?name, "Skipping non UTF-8 entry");
                continue;
            };
            if let Ok(id) = SafeId::parse(name) {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = open_for_write(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(unix)]
fn open_for_write(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(FILE_MODE)
        .open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path) -> io::Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

#[cfg(unix)]
fn create_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new()
        .recursive(true)
        .mode(DIR_MODE)
        .create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
