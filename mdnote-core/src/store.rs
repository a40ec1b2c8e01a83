//! Content-addressed persistence of annotation records.
//!
//! One JSON file per annotated document, named by the SHA-256 of the
//! document's absolute path. Writes go to a temporary file in the same
//! directory and are renamed over the canonical path, so an interrupted
//! save leaves the previous record intact.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};
use crate::types::AnnotationFile;

/// Extension of record files inside the store root.
pub const RECORD_EXTENSION: &str = "json";

/// Store root used when nothing else is configured: `<tmp>/mdnote`.
pub fn default_root() -> PathBuf {
    std::env::temp_dir().join("mdnote")
}

/// Hex SHA-256 of `bytes`.
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Hex SHA-256 of the file's current contents.
///
/// # Errors
///
/// Returns [`StoreError::Io`] if the file cannot be read.
pub fn content_hash(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| StoreError::io("read", path, e))?;
    Ok(hash_bytes(&bytes))
}

/// Reads and writes [`AnnotationFile`]s under one root directory.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    root: PathBuf,
}

impl Default for AnnotationStore {
    fn default() -> Self {
        Self::new(default_root())
    }
}

impl AnnotationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record path for `document`: `<root>/<hex sha256(path)>.json`.
    ///
    /// A pure function of the path's raw bytes, so paths that are not valid
    /// UTF-8 still get distinct records. Callers pass absolute paths;
    /// relative paths are hashed as given.
    pub fn store_path(&self, document: &Path) -> PathBuf {
        let digest = hash_bytes(document.as_os_str().as_encoded_bytes());
        self.root.join(format!("{digest}.{RECORD_EXTENSION}"))
    }

    /// Loads the record for `document`.
    ///
    /// With no record on disk, returns an empty [`AnnotationFile`] stamped
    /// with the document's current hash.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Io`] if the document (first run) or record cannot be read.
    /// - [`StoreError::Corrupt`] if the record is not valid JSON or holds a
    ///   comment with an impossible line range.
    pub fn load(&self, document: &Path) -> Result<AnnotationFile> {
        let document = absolute(document)?;
        let record = self.store_path(&document);

        let data = match fs::read(&record) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let hash = content_hash(&document)?;
                tracing::debug!(document = %document.display(), "no annotation record, starting empty");
                return Ok(AnnotationFile::new(document, hash));
            }
            Err(e) => return Err(StoreError::io("read", record, e)),
        };

        let file: AnnotationFile = serde_json::from_slice(&data).map_err(|e| StoreError::Corrupt {
            path: record.clone(),
            reason: e.to_string(),
        })?;

        if let Some(bad) = file.comments.iter().find(|c| !c.range.is_well_formed()) {
            return Err(StoreError::Corrupt {
                path: record,
                reason: format!(
                    "comment {} has invalid range {}..{}",
                    bad.id, bad.range.start, bad.range.end
                ),
            });
        }

        tracing::info!(
            record = %record.display(),
            comments = file.comments.len(),
            "loaded annotations"
        );
        Ok(file)
    }

    /// Writes `file` to its record path atomically, creating the root
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the directory, temporary file, or rename
    /// fails, or the record cannot be serialized.
    pub fn save(&self, file: &AnnotationFile) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io("create directory", &self.root, e))?;
        let record = self.store_path(&file.file);

        let mut json = serde_json::to_vec_pretty(file).map_err(|e| StoreError::Serialize {
            path: record.clone(),
            source: e,
        })?;
        json.push(b'\n');

        let mut tmp = NamedTempFile::new_in(&self.root)
            .map_err(|e| StoreError::io("create temporary file in", &self.root, e))?;
        tmp.write_all(&json)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StoreError::io("write", tmp.path().to_path_buf(), e))?;
        tmp.persist(&record).map_err(|e| StoreError::Persist {
            path: record.clone(),
            source: e,
        })?;

        tracing::info!(
            record = %record.display(),
            comments = file.comments.len(),
            "saved annotations"
        );
        Ok(())
    }

    /// Whether `file`'s recorded hash no longer matches its document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the document cannot be read.
    pub fn is_stale(&self, file: &AnnotationFile) -> Result<bool> {
        Ok(file.is_stale(&content_hash(&file.file)?))
    }
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).map_err(|e| StoreError::io("resolve", path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_path_is_deterministic() {
        let store = AnnotationStore::new("/var/notes");
        let a = store.store_path(Path::new("/a/file.md"));
        assert_eq!(a, store.store_path(Path::new("/a/file.md")));
        assert_ne!(a, store.store_path(Path::new("/a/other.md")));
        assert!(a.starts_with("/var/notes"));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("json"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_paths_get_distinct_records() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let store = AnnotationStore::new("/r");
        let a = store.store_path(Path::new(OsStr::from_bytes(b"/a/\xff.md")));
        let b = store.store_path(Path::new(OsStr::from_bytes(b"/a/\xfe.md")));
        assert_ne!(a, b);
        assert_eq!(
            store.store_path(Path::new("/a/file.md")),
            store.store_path(Path::new(OsStr::from_bytes(b"/a/file.md")))
        );
    }

    #[test]
    fn store_path_is_hex_sha256() {
        let store = AnnotationStore::new("/r");
        let name = store.store_path(Path::new("/x.md"));
        let stem = name.file_stem().unwrap().to_str().unwrap();
        assert_eq!(stem.len(), 64);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hash_of_known_input() {
        assert_eq!(
            hash_bytes(b"hello\n"),
            "5891b5b522d5df086d0ff0b110fbd9d21bb4fc7163af34d08286a2e846f6be03"
        );
    }
}
