// SPDX-License-Identifier: MIT OR Apache-2.0

//! Object store file storage adapter.
//!
//! Exposes a bucket on a remote object store through the [`FileStorage`]
//! contract, using `/` as the directory delimiter.

use crate::domain::{PliteError, Result};
use crate::ports::storage::{stored_form, FileStorage, Metadata, StoredObject};
use crate::ports::ObjectStoreClient;
use std::sync::Arc;

const DELIMITER: &str = "/";

/// File storage over a bucket in a remote object store.
pub struct ObjectStorage {
    client: Arc<dyn ObjectStoreClient>,
    bucket: String,
}

impl ObjectStorage {
    /// Creates a storage handle for `bucket` using `client`.
    pub fn new(client: Arc<dyn ObjectStoreClient>, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Returns the bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

impl std::fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl FileStorage for ObjectStorage {
    fn name(&self) -> &str {
        "object-store"
    }

    fn list(&self, prefix: Option<&str>) -> Result<Vec<String>> {
        let output = self
            .client
            .list_objects(&self.bucket, prefix, Some(DELIMITER))
            .map_err(|e| PliteError::storage(prefix.unwrap_or(""), e))?;

        let strip = |key: &str| -> Option<String> {
            if prefix == Some(key) {
                return None;
            }
            let rest = prefix.and_then(|p| key.strip_prefix(p)).unwrap_or(key);
            (!rest.is_empty()).then(|| rest.to_string())
        };

        let mut entries: Vec<String> = Vec::new();
        let keys = output.common_prefixes.iter().chain(output.contents.iter());
        for entry in keys.filter_map(|key| strip(key)) {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }

        tracing::debug!(
            "Listed {} entries in bucket {} under {:?}",
            entries.len(),
            self.bucket,
            prefix
        );
        Ok(entries)
    }

    fn write(&self, path: &str, data: &str, metadata: Option<&Metadata>) -> bool {
        let body = stored_form(data);
        let empty = Metadata::new();
        let metadata = metadata.unwrap_or(&empty);

        tracing::debug!("Putting object [{}] in bucket [{}]", path, self.bucket);
        match self
            .client
            .put_object(&self.bucket, path, body.as_bytes(), metadata)
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    "Could not put object [{}] in bucket [{}]: {}",
                    path,
                    self.bucket,
                    e
                );
                false
            }
        }
    }

    fn read_with_metadata(&self, path: &str) -> Result<StoredObject> {
        let output = self
            .client
            .get_object(&self.bucket, path)
            .map_err(|e| PliteError::storage(path, e))?;

        let data = String::from_utf8(output.body).map_err(|e| PliteError::Storage {
            path: path.to_string(),
            message: "content is not valid UTF-8".to_string(),
            source: Some(Box::new(e)),
        })?;

        Ok(StoredObject {
            data,
            metadata: output.metadata,
        })
    }
}
