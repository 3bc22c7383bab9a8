use async_trait::async_trait;
use uuid::Uuid;

use super::Score;
use crate::domain::DomainResult;

#[async_trait]
pub trait ScoreRepository: Send + Sync {
    async fn find(&self, audiotrack_id: Uuid, author_id: Uuid) -> DomainResult<Option<Score>>;
    async fn insert(&self, score: &Score) -> DomainResult<()>;
    async fn update(&self, score: &Score) -> DomainResult<()>;
    async fn find_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<Vec<Score>>;
    async fn delete_by_audiotrack(&self, audiotrack_id: Uuid) -> DomainResult<()>;
}
