//! Certificate document storage.
//!
//! Only the reference returned by [`DocumentStore::store`] is kept in the
//! database; the bytes live wherever the store puts them.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

/// Persists rendered documents and hands back an opaque reference.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn store(&self, bytes: &[u8]) -> Result<String, std::io::Error>;
}

/// Writes each document to `<root>/<uuid v7>.txt`.
///
/// The reference is the file name relative to `root`. UUID v7 keeps names
/// roughly time-ordered on disk.
#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn store(&self, bytes: &[u8]) -> Result<String, std::io::Error> {
        tokio::fs::create_dir_all(&self.root).await?;
        let reference = format!("{}.txt", Uuid::now_v7());
        tokio::fs::write(self.root.join(&reference), bytes).await?;
        Ok(reference)
    }
}
