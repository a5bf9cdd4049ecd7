//! Object store seam and the filesystem implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StorageError;

/// Read-only access to remote document objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the full body of an object.
    ///
    /// An object that exists but has no body fails with
    /// [`StorageError::EmptyBody`].
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError>;
}

/// Object store that maps bucket/key pairs under a root directory.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    /// Create a store rooted at the given directory.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.root.join(bucket).join(key);
        debug!("fetching object {}/{} from {}", bucket, key, path.display());

        let body = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                StorageError::Io(e)
            }
        })?;

        if body.is_empty() {
            return Err(StorageError::EmptyBody {
                bucket: bucket.to_string(),
                key: key.to_string(),
            });
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_reads_object_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tickets")).unwrap();
        std::fs::write(dir.path().join("tickets/doc.pdf"), b"content").unwrap();

        let store = FsObjectStore::new(dir.path().to_path_buf());
        let body = store.get("tickets", "doc.pdf").await.unwrap();
        assert_eq!(body, b"content");
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path().to_path_buf());

        let err = store.get("tickets", "missing.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_object_fails_with_empty_body() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("tickets")).unwrap();
        std::fs::write(dir.path().join("tickets/empty.pdf"), b"").unwrap();

        let store = FsObjectStore::new(dir.path().to_path_buf());
        let err = store.get("tickets", "empty.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::EmptyBody { .. }));
    }
}
