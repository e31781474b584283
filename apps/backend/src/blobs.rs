//! Opaque storage for end-of-turn drawing snapshots.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use uuid::Uuid;

use crate::error::AppError;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Persist `bytes` and return an opaque reference.
    async fn store(&self, bytes: Bytes) -> Result<String, AppError>;
    /// Public URL for a reference returned by `store`.
    fn url(&self, blob_ref: &str) -> String;
    async fn delete(&self, blob_ref: &str) -> Result<(), AppError>;
}

/// References are bare file names; anything else is refused so a stored
/// reference can never point outside the blob directory.
fn is_valid_ref(blob_ref: &str) -> bool {
    !blob_ref.is_empty()
        && blob_ref
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !blob_ref.starts_with('.')
}

/// Blobs as files under a directory, served from `base_url`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn store(&self, bytes: Bytes) -> Result<String, AppError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::internal(format!("blob dir unavailable: {e}")))?;
        let blob_ref = format!("{}.png", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&blob_ref), &bytes)
            .await
            .map_err(|e| AppError::internal(format!("blob write failed: {e}")))?;
        Ok(blob_ref)
    }

    fn url(&self, blob_ref: &str) -> String {
        format!("{}/{}", self.base_url, blob_ref)
    }

    async fn delete(&self, blob_ref: &str) -> Result<(), AppError> {
        if !is_valid_ref(blob_ref) {
            return Err(AppError::internal(format!("refusing blob ref {blob_ref:?}")));
        }
        match tokio::fs::remove_file(self.dir.join(blob_ref)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::internal(format!("blob delete failed: {e}"))),
        }
    }
}

/// In-process blob store for tests.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: DashMap<String, Bytes>,
    writes: AtomicUsize,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, blob_ref: &str) -> Option<Bytes> {
        self.blobs.get(blob_ref).map(|b| b.value().clone())
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    /// Every successful `store`, including blobs deleted since.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn store(&self, bytes: Bytes) -> Result<String, AppError> {
        let blob_ref = format!("{}.png", Uuid::new_v4());
        self.blobs.insert(blob_ref.clone(), bytes);
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(blob_ref)
    }

    fn url(&self, blob_ref: &str) -> String {
        format!("memory://{blob_ref}")
    }

    async fn delete(&self, blob_ref: &str) -> Result<(), AppError> {
        self.blobs.remove(blob_ref);
        Ok(())
    }
}
