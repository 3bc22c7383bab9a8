use async_trait::async_trait;
use uuid::Uuid;

use super::Commentary;
use crate::domain::DomainResult;

#[async_trait]
pub trait CommentaryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Commentary>>;
    async fn insert(&self, commentary: &Commentary) -> DomainResult<()>;
    async fn update(&self, commentary: &Commentary) -> DomainResult<()>;
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
    /// Commentaries for an audiotrack in store insertion order.
    async fn find_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Commentary>>;
    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()>;
}
