// SPDX-License-Identifier: MIT OR Apache-2.0

//! File storage capability trait definition.
//!
//! A file storage handle is what the provider selector returns for the `file`
//! capability. Local and remote backends implement the same contract, so callers
//! never need to know which one is active.

use crate::domain::Result;
use std::collections::BTreeMap;

/// User metadata attached to a stored entry.
pub type Metadata = BTreeMap<String, String>;

/// The data and metadata of a stored entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredObject {
    /// The entry's content
    pub data: String,
    /// Metadata reported by the backend
    pub metadata: Metadata,
}

/// Returns the form in which entries are stored: trimmed, newline-terminated.
///
/// # Examples
///
/// ```
/// use plite::ports::storage::stored_form;
///
/// assert_eq!(stored_form("  hello \n\n"), "hello\n");
/// ```
pub fn stored_form(data: &str) -> String {
    let mut stored = data.trim().to_string();
    stored.push('\n');
    stored
}

/// A file storage backend.
///
/// Paths are `/`-separated and relative to the backend's root. Listing has
/// one-level "ls" semantics: directories are reported with a trailing `/`, entry
/// names are stripped of the prefix, there are no duplicates, and the prefix
/// itself is never listed.
///
/// # Failure semantics
///
/// [`write`] reports failure as `false` and logs the cause; callers must check
/// the return value. [`read`] and [`read_with_metadata`] propagate errors.
///
/// [`write`]: FileStorage::write
/// [`read`]: FileStorage::read
/// [`read_with_metadata`]: FileStorage::read_with_metadata
pub trait FileStorage: Send + Sync {
    /// Returns the name of the backend, used in log messages.
    fn name(&self) -> &str;

    /// Lists directories (with a trailing `/`) and files one level below `prefix`.
    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>>;

    /// Lists only the files one level below `prefix`.
    fn list_files(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        Ok(self
            .list(prefix)?
            .into_iter()
            .filter(|entry| !entry.ends_with('/'))
            .collect())
    }

    /// Lists only the directories one level below `prefix`, without the trailing `/`.
    fn list_directories(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        Ok(self
            .list(prefix)?
            .into_iter()
            .filter_map(|entry| entry.strip_suffix('/').map(str::to_string))
            .collect())
    }

    /// Stores `data` (in its [`stored_form`]) at `path`. Returns `true` on success.
    fn write(&self, path: &str, data: &str, metadata: Option<&Metadata>) -> bool;

    /// Reads the data stored at `path`.
    fn read(&self, path: &str) -> Result<String> {
        Ok(self.read_with_metadata(path)?.data)
    }

    /// Reads the data and metadata stored at `path`.
    fn read_with_metadata(&self, path: &str) -> Result<StoredObject>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedListing(Vec<&'static str>);

    impl FileStorage for FixedListing {
        fn name(&self) -> &str {
            "fixed"
        }

        fn list(&self, _prefix: Option<&str>) -> Result<Vec<String>> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }

        fn write(&self, _path: &str, _data: &str, _metadata: Option<&Metadata>) -> bool {
            false
        }

        fn read_with_metadata(&self, path: &str) -> Result<StoredObject> {
            Ok(StoredObject {
                data: format!("content of {}", path),
                metadata: Metadata::new(),
            })
        }
    }

    #[test]
    fn test_stored_form() {
        assert_eq!(stored_form("abc"), "abc\n");
        assert_eq!(stored_form(""), "\n");
        assert_eq!(stored_form("\tline one\nline two\n\n"), "line one\nline two\n");
    }

    #[test]
    fn test_list_views() {
        let storage = FixedListing(vec!["a/", "b.txt", "c/", "d.json"]);
        assert_eq!(storage.list_files(None).unwrap(), vec!["b.txt", "d.json"]);
        assert_eq!(storage.list_directories(None).unwrap(), vec!["a", "c"]);
    }

    #[test]
    fn test_read_defaults_to_read_with_metadata() {
        let storage = FixedListing(vec![]);
        assert_eq!(storage.read("x").unwrap(), "content of x");
    }
}
