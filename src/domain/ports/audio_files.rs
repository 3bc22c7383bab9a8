//! Audio binary storage port

use async_trait::async_trait;

use crate::shared::DomainResult;

/// Storage for audiotrack binaries, addressed by a relative path.
#[async_trait]
pub trait AudioFileStore: Send + Sync {
    async fn write(&self, path: &str, content: &[u8]) -> DomainResult<()>;
    /// `None` when nothing is stored under `path`.
    async fn read(&self, path: &str) -> DomainResult<Option<Vec<u8>>>;
    async fn delete(&self, path: &str) -> DomainResult<()>;
}
