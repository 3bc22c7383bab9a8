use async_trait::async_trait;
use uuid::Uuid;

use super::Audiotrack;
use crate::domain::DomainResult;

#[async_trait]
pub trait AudiotrackRepository: Send + Sync {
    async fn insert(&self, audiotrack: &Audiotrack) -> DomainResult<()>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Audiotrack>>;
    async fn find_all(&self) -> DomainResult<Vec<Audiotrack>>;
    /// Case-insensitive substring match on the title.
    async fn find_by_title(&self, title: &str) -> DomainResult<Vec<Audiotrack>>;
    async fn update(&self, audiotrack: &Audiotrack) -> DomainResult<()>;
    async fn delete(&self, id: Uuid) -> DomainResult<()>;
}
