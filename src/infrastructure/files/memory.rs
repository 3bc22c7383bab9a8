use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::{AudioFileStore, DomainError, DomainResult};

/// Audio store kept in memory. Writes can be made to fail for exercising
/// compensation paths.
#[derive(Debug, Default)]
pub struct InMemoryAudioFileStore {
    files: DashMap<String, Vec<u8>>,
    fail_writes: AtomicBool,
}

impl InMemoryAudioFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[async_trait]
impl AudioFileStore for InMemoryAudioFileStore {
    async fn write(&self, path: &str, content: &[u8]) -> DomainResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::FileStorage(format!("write refused: {}", path)));
        }
        self.files.insert(path.to_string(), content.to_vec());
        Ok(())
    }

    async fn read(&self, path: &str) -> DomainResult<Option<Vec<u8>>> {
        Ok(self.files.get(path).map(|f| f.clone()))
    }

    async fn delete(&self, path: &str) -> DomainResult<()> {
        self.files.remove(path);
        Ok(())
    }
}
