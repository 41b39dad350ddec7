//! Local-disk store for uploaded book files.
//!
//! Files live under `<root>/images` and `<root>/pdf`; the database only keeps
//! the stored file name.

use std::io;
use std::path::{Path, PathBuf};

use librairie_core::upload::{is_safe_file_name, unique_file_name, UploadKind};

/// Stores cover images and PDFs below a root directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the per-kind directories if they do not exist yet.
    pub async fn ensure_dirs(&self) -> io::Result<()> {
        for kind in [UploadKind::Image, UploadKind::Pdf] {
            tokio::fs::create_dir_all(self.root.join(kind.directory())).await?;
        }
        Ok(())
    }

    /// Path of a stored file, or `None` if the name could escape the directory.
    pub fn path(&self, kind: UploadKind, file_name: &str) -> Option<PathBuf> {
        is_safe_file_name(file_name).then(|| self.root.join(kind.directory()).join(file_name))
    }

    /// Write `bytes` under a fresh unique name and return that name.
    pub async fn save(&self, kind: UploadKind, extension: &str, bytes: &[u8]) -> io::Result<String> {
        let file_name = unique_file_name(extension);
        let dir = self.root.join(kind.directory());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;
        tracing::debug!(kind = kind.field_name(), file = %file_name, "Stored upload");
        Ok(file_name)
    }

    /// Read a stored file. Unsafe names are reported as not found.
    pub async fn read(&self, kind: UploadKind, file_name: &str) -> io::Result<Vec<u8>> {
        let path = self
            .path(kind, file_name)
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))?;
        tokio::fs::read(path).await
    }

    /// Remove a stored file. Failures are logged, not returned: the row that
    /// referenced the file is already gone.
    pub async fn remove(&self, kind: UploadKind, file_name: &str) {
        let Some(path) = self.path(kind, file_name) else {
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove stored file");
            }
        }
    }
}
