use std::io::ErrorKind as IoErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{AudioFileStore, DomainError, DomainResult};

/// Filesystem-backed audio store. Every path is resolved under `root`.
#[derive(Debug, Clone)]
pub struct FsAudioFileStore {
    root: PathBuf,
}

impl FsAudioFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Rejects absolute paths and parent traversal.
    fn resolve(&self, path: &str) -> DomainResult<PathBuf> {
        let relative = Path::new(path);
        let confined = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !confined {
            return Err(DomainError::FileStorage(format!(
                "path escapes storage root: {}",
                path
            )));
        }
        Ok(self.root.join(relative))
    }
}

fn io_err(path: &str, e: std::io::Error) -> DomainError {
    DomainError::FileStorage(format!("{}: {}", path, e))
}

#[async_trait]
impl AudioFileStore for FsAudioFileStore {
    async fn write(&self, path: &str, content: &[u8]) -> DomainResult<()> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err(path, e))?;
        }
        tokio::fs::write(&full, content)
            .await
            .map_err(|e| io_err(path, e))?;
        debug!(path = %full.display(), bytes = content.len(), "Audio file written");
        Ok(())
    }

    async fn read(&self, path: &str) -> DomainResult<Option<Vec<u8>>> {
        let full = self.resolve(path)?;
        match tokio::fs::read(&full).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_err(path, e)),
        }
    }

    async fn delete(&self, path: &str) -> DomainResult<()> {
        let full = self.resolve(path)?;
        match tokio::fs::remove_file(&full).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == IoErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_err(path, e)),
        }
    }
}
