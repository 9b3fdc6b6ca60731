//! Filesystem-backed image storage for menu items.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use slug::slugify;
use tokio::fs;
use uuid::Uuid;

use crate::application::repos::{ImageStore, ImageStoreError, StoredImage};

/// Stores image blobs under a root directory, keyed by date-partitioned
/// uuid-prefixed paths.
#[derive(Debug)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    /// Initialise storage rooted at the provided directory, creating it if
    /// necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Resolve the absolute filesystem path for a stored image.
    fn resolve(&self, key: &str) -> Result<PathBuf, ImageStoreError> {
        let relative = Path::new(key);
        if relative.is_absolute()
            || relative
                .components()
                .any(|component| matches!(component, Component::ParentDir | Component::Prefix(_)))
        {
            return Err(ImageStoreError::InvalidKey);
        }

        Ok(self.root.join(relative))
    }

    fn build_key(&self, original_name: &str) -> String {
        let (year, month, day) = time::OffsetDateTime::now_utc().to_calendar_date();
        let directory = format!("{year}/{:02}/{:02}", month as u8, day);
        let identifier = Uuid::new_v4();
        let filename = sanitize_filename(original_name);
        format!("{directory}/{identifier}-{filename}")
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn store(
        &self,
        original_name: &str,
        data: Bytes,
    ) -> Result<StoredImage, ImageStoreError> {
        if data.is_empty() {
            return Err(ImageStoreError::EmptyPayload);
        }

        let key = self.build_key(original_name);
        let absolute = self.resolve(&key)?;

        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size_bytes = i64::try_from(data.len()).unwrap_or(i64::MAX);
        let checksum = hex::encode(Sha256::digest(&data));
        fs::write(&absolute, &data).await?;

        Ok(StoredImage {
            key,
            checksum,
            size_bytes,
        })
    }

    async fn read(&self, key: &str) -> Result<Bytes, ImageStoreError> {
        let absolute = self.resolve(key)?;
        match fs::read(absolute).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(ImageStoreError::NotFound)
            }
            Err(err) => Err(ImageStoreError::Io(err)),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), ImageStoreError> {
        let absolute = self.resolve(key)?;
        match fs::remove_file(&absolute).await {
            Ok(_) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ImageStoreError::Io(err)),
        }
    }
}

fn sanitize_filename(original: &str) -> String {
    let path = Path::new(original);
    let stem = path
        .file_stem()
        .and_then(|value| value.to_str())
        .unwrap_or("image");
    let mut base = slugify(stem);
    if base.is_empty() {
        base = "image".to_string();
    }

    let extension = path
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| value.trim_matches('.').to_ascii_lowercase())
        .filter(|value| !value.is_empty());

    match extension {
        Some(ext) => format!("{base}.{ext}"),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsImageStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsImageStore::new(dir.path().to_path_buf()).expect("store");
        (dir, store)
    }

    #[tokio::test]
    async fn store_and_read_roundtrip() {
        let (_dir, store) = store();

        let stored = store
            .store("Paneer Tikka.JPG", Bytes::from_static(b"fake image bytes"))
            .await
            .expect("stored");

        assert!(stored.key.ends_with("paneer-tikka.jpg"));
        assert_eq!(stored.size_bytes, 16);

        let read = store.read(&stored.key).await.expect("read back");
        assert_eq!(read, Bytes::from_static(b"fake image bytes"));
    }

    #[tokio::test]
    async fn empty_payload_is_rejected() {
        let (_dir, store) = store();

        let result = store.store("empty.png", Bytes::new()).await;
        assert!(matches!(result, Err(ImageStoreError::EmptyPayload)));
    }

    #[tokio::test]
    async fn delete_removes_the_blob() {
        let (_dir, store) = store();

        let stored = store
            .store("chai.png", Bytes::from_static(b"chai"))
            .await
            .expect("stored");

        store.delete(&stored.key).await.expect("deleted");
        assert!(matches!(
            store.read(&stored.key).await,
            Err(ImageStoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn deleting_a_missing_blob_succeeds() {
        let (_dir, store) = store();
        store
            .delete("2026/01/01/nope.png")
            .await
            .expect("missing delete is ok");
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let (_dir, store) = store();

        assert!(matches!(
            store.read("../outside.png").await,
            Err(ImageStoreError::InvalidKey)
        ));
        assert!(matches!(
            store.delete("/etc/passwd").await,
            Err(ImageStoreError::InvalidKey)
        ));
    }
}
