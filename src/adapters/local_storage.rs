// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local disk file storage adapter.

use crate::domain::{PliteError, Result};
use crate::ports::storage::{stored_form, FileStorage, Metadata, StoredObject};
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Metadata key holding the entry's size in bytes.
pub const CONTENT_LENGTH_KEY: &str = "content-length";

/// Metadata key holding the entry's modification time, in seconds since the epoch.
pub const LAST_MODIFIED_KEY: &str = "last-modified";

/// File storage rooted at a local directory.
///
/// Paths are relative to the root. A listing prefix behaves like an object store
/// key prefix: its last segment filters entry names in the directory named by
/// the segments before it, and is stripped from the returned names.
///
/// User metadata passed to [`write`](FileStorage::write) is not persisted; reads
/// report the entry's size and modification time instead.
///
/// # Examples
///
/// ```rust
/// use plite::adapters::LocalFileStorage;
/// use plite::ports::FileStorage;
///
/// let dir = tempfile::tempdir().unwrap();
/// let storage = LocalFileStorage::new(dir.path());
///
/// assert!(storage.write("reports/2024.txt", "  totals  ", None));
/// assert_eq!(storage.read("reports/2024.txt").unwrap(), "totals\n");
/// assert_eq!(storage.list(None).unwrap(), vec!["reports/"]);
/// assert_eq!(storage.list(Some("reports/")).unwrap(), vec!["2024.txt"]);
/// ```
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Creates a storage handle rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a relative storage path against the root.
    ///
    /// Rejects absolute paths and any path that could leave the root.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || path.is_empty() {
            return Err(PliteError::InvalidPath {
                path: path.to_string(),
            });
        }
        Ok(self.root.join(relative))
    }

    fn try_write(&self, path: &str, data: &str) -> Result<PathBuf> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full, stored_form(data))?;
        Ok(full)
    }
}

fn storage_error(path: &str, err: io::Error) -> PliteError {
    PliteError::Storage {
        path: path.to_string(),
        message: err.to_string(),
        source: Some(Box::new(err)),
    }
}

impl FileStorage for LocalFileStorage {
    fn name(&self) -> &str {
        "local"
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let prefix = prefix.unwrap_or("");
        let (dir, stem) = match prefix.rfind('/') {
            Some(i) => (&prefix[..i], &prefix[i + 1..]),
            None => ("", prefix),
        };
        let dir_path = if dir.is_empty() {
            self.root.clone()
        } else {
            self.resolve(dir)?
        };

        let entries = match fs::read_dir(&dir_path) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("Listing missing directory {}", dir_path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(storage_error(prefix, e)),
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| storage_error(prefix, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::debug!("Skipping non-UTF-8 entry in {}", dir_path.display());
                continue;
            };
            let Some(rest) = name.strip_prefix(stem) else {
                continue;
            };
            let is_dir = entry
                .file_type()
                .map_err(|e| storage_error(prefix, e))?
                .is_dir();
            if is_dir {
                dirs.push(format!("{}/", rest));
            } else if !rest.is_empty() {
                files.push(rest.to_string());
            }
        }

        dirs.sort();
        files.sort();
        dirs.extend(files);
        Ok(dirs)
    }

    fn write(&self, path: &str, data: &str, metadata: Option<&Metadata>) -> bool {
        if metadata.is_some_and(|m| !m.is_empty()) {
            tracing::debug!("Local storage does not persist metadata for {}", path);
        }
        match self.try_write(path, data) {
            Ok(full) => {
                tracing::debug!("Wrote {}", full.display());
                true
            }
            Err(e) => {
                tracing::error!("Could not write [{}] under {}: {}", path, self.root.display(), e);
                false
            }
        }
    }

    fn read_with_metadata(&self, path: &str) -> Result<StoredObject> {
        let full = self.resolve(path)?;
        let bytes = fs::read(&full).map_err(|e| storage_error(path, e))?;
        let data = String::from_utf8(bytes).map_err(|e| PliteError::Storage {
            path: path.to_string(),
            message: "content is not valid UTF-8".to_string(),
            source: Some(Box::new(e)),
        })?;

        let mut metadata = Metadata::new();
        metadata.insert(CONTENT_LENGTH_KEY.to_string(), data.len().to_string());
        let modified = fs::metadata(&full)
            .and_then(|m| m.modified())
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok());
        if let Some(modified) = modified {
            metadata.insert(LAST_MODIFIED_KEY.to_string(), modified.as_secs().to_string());
        }

        Ok(StoredObject { data, metadata })
    }
}
