//! Collaborator seams: persistence and image-blob storage.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::menu::{MenuItemRecord, NewMenuItem};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Persistence adapter for menu items.
///
/// The application layer owns this contract; `infra::db` provides the
/// Postgres implementation and tests substitute in-memory fakes.
#[async_trait]
pub trait MenuRepo: Send + Sync {
    async fn find_all(&self) -> Result<Vec<MenuItemRecord>, RepoError>;

    async fn distinct_categories(&self) -> Result<Vec<String>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MenuItemRecord>, RepoError>;

    async fn insert(&self, item: NewMenuItem) -> Result<MenuItemRecord, RepoError>;

    /// Full replace of the mutable fields; the id is preserved. Returns
    /// `None` when no record matched.
    async fn update_by_id(
        &self,
        id: Uuid,
        item: NewMenuItem,
    ) -> Result<Option<MenuItemRecord>, RepoError>;

    /// Returns the removed record so callers can release resources it
    /// referenced (its image blob), or `None` when no record matched.
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<MenuItemRecord>, RepoError>;
}

#[derive(Debug, Error)]
pub enum ImageStoreError {
    #[error("invalid image key")]
    InvalidKey,
    #[error("image not found")]
    NotFound,
    #[error("image payload is empty")]
    EmptyPayload,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result of storing an image payload.
#[derive(Debug, Clone, Serialize)]
pub struct StoredImage {
    pub key: String,
    pub checksum: String,
    pub size_bytes: i64,
}

/// Blob storage for menu-item images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn store(
        &self,
        original_name: &str,
        data: Bytes,
    ) -> Result<StoredImage, ImageStoreError>;

    async fn read(&self, key: &str) -> Result<Bytes, ImageStoreError>;

    /// Remove the stored payload. Deleting a missing blob is a success.
    async fn delete(&self, key: &str) -> Result<(), ImageStoreError>;
}
